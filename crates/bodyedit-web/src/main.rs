//! Command line entry point (native).

#[cfg(feature = "native")]
fn main() {
    env_logger::init();
    log::info!("Starting BodyEdit");

    let args: Vec<String> = std::env::args().skip(1).collect();
    match bodyedit_web::cli::run(&args) {
        Ok(output) if output.is_empty() => {}
        Ok(output) => println!("{}", output),
        Err(err) => {
            eprintln!("bodyedit: {}", err);
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
