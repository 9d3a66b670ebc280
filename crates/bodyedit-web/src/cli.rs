//! Command line front end: replay an action script and print the result.

use crate::session::{Session, SessionError};
use crate::shortcuts::ShortcutRegistry;
use std::path::{Path, PathBuf};
use thiserror::Error;

const USAGE: &str = "usage: bodyedit <script.json> [--config <config.json>] [--output json|code|both|events]\n       bodyedit --shortcuts";

/// CLI errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}\n{usage}", usage = USAGE)]
    Usage(String),
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// What to print after the script ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Output {
    Json,
    Code,
    #[default]
    Both,
    /// Every event the script produced, as JSON.
    Events,
}

impl Output {
    fn parse(s: &str) -> Result<Self, CliError> {
        match s {
            "json" => Ok(Output::Json),
            "code" => Ok(Output::Code),
            "both" => Ok(Output::Both),
            "events" => Ok(Output::Events),
            other => Err(CliError::Usage(format!("Unknown output: {}", other))),
        }
    }
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run {
        script: PathBuf,
        config: Option<PathBuf>,
        output: Output,
    },
    Shortcuts,
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self, CliError> {
        let mut script = None;
        let mut config = None;
        let mut output = Output::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--shortcuts" => return Ok(Command::Shortcuts),
                "--config" => {
                    let path = iter
                        .next()
                        .ok_or_else(|| CliError::Usage("--config needs a path".to_string()))?;
                    config = Some(PathBuf::from(path));
                }
                "--output" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| CliError::Usage("--output needs a value".to_string()))?;
                    output = Output::parse(value)?;
                }
                flag if flag.starts_with("--") => {
                    return Err(CliError::Usage(format!("Unknown flag: {}", flag)));
                }
                path if script.is_none() => script = Some(PathBuf::from(path)),
                extra => return Err(CliError::Usage(format!("Unexpected argument: {}", extra))),
            }
        }
        let script = script.ok_or_else(|| CliError::Usage("Missing script".to_string()))?;
        Ok(Command::Run {
            script,
            config,
            output,
        })
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Replay `script` in a fresh session and render `output`.
pub fn replay(script: &str, config: Option<&str>, output: Output) -> Result<String, CliError> {
    let mut session = Session::from_config_json(config)?;
    let events = session.run_script(script)?;
    log::info!(
        "Replayed script: {} events, {} shapes",
        events.len(),
        session.editor().scene().len()
    );
    let rendered = match output {
        Output::Events => serde_json::to_string_pretty(&events).map_err(SessionError::from)?,
        Output::Json => session.export()?.json,
        Output::Code => session.export()?.code,
        Output::Both => {
            let bundle = session.export()?;
            format!("{}\n\n{}", bundle.json, bundle.code)
        }
    };
    Ok(rendered)
}

/// Run the CLI. Returns the text to print.
pub fn run(args: &[String]) -> Result<String, CliError> {
    match Command::parse(args)? {
        Command::Shortcuts => {
            ShortcutRegistry::print_all();
            Ok(String::new())
        }
        Command::Run {
            script,
            config,
            output,
        } => {
            let script = read(&script)?;
            let config = config.as_deref().map(read).transpose()?;
            replay(&script, config.as_deref(), output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    const SCRIPT: &str = r#"[
        { "action": "select_tool", "tool": "circle" },
        { "action": "pointer_down", "position": { "x": 10, "y": 20 }, "target": { "kind": "stage" } }
    ]"#;

    #[test]
    fn test_parse_command() {
        assert_eq!(
            Command::parse(&args(&["body.json", "--output", "code"])).unwrap(),
            Command::Run {
                script: PathBuf::from("body.json"),
                config: None,
                output: Output::Code,
            }
        );
        assert_eq!(Command::parse(&args(&["--shortcuts"])).unwrap(), Command::Shortcuts);
        assert!(matches!(Command::parse(&args(&[])), Err(CliError::Usage(_))));
        assert!(matches!(Command::parse(&args(&["a", "b"])), Err(CliError::Usage(_))));
        assert!(matches!(Command::parse(&args(&["a", "--output", "svg"])), Err(CliError::Usage(_))));
        assert!(matches!(Command::parse(&args(&["a", "--config"])), Err(CliError::Usage(_))));
    }

    #[test]
    fn test_replay_outputs() {
        let code = replay(SCRIPT, None, Output::Code).unwrap();
        assert!(code.contains("Bodies.circle(10, 20, 50, { angle: 0 })"));

        let json = replay(SCRIPT, None, Output::Json).unwrap();
        assert!(json.contains("\"type\": \"circle\""));

        let both = replay(SCRIPT, None, Output::Both).unwrap();
        assert!(both.starts_with('{'));
        assert!(both.contains("\n\nconst { Bodies, Body, Vertices } = Matter;"));

        let events: serde_json::Value =
            serde_json::from_str(&replay(SCRIPT, None, Output::Events).unwrap()).unwrap();
        assert_eq!(events[0]["event"], "tool_changed");
        assert_eq!(events[0]["data"], "circle");
    }

    #[test]
    fn test_missing_script_file() {
        let err = run(&args(&["/nonexistent/bodyedit-script.json"])).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }
}
