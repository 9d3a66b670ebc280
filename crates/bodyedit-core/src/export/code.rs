//! Matter.js construction code.

use super::fmt_num;
use crate::shapes::{ChamferRadius, ScaledParams, ShapeModel};
use kurbo::Point;

/// Two scales closer than this count as equal.
const SCALE_EPSILON: f64 = 1e-4;

const HEADER: &str = "const { Bodies, Body, Vertices } = Matter;";

fn fmt_radius(radius: &ChamferRadius) -> String {
    match radius {
        ChamferRadius::Uniform(r) => fmt_num(*r),
        ChamferRadius::PerVertex(radii) => {
            let items: Vec<String> = radii.iter().map(|r| fmt_num(*r)).collect();
            format!("[{}]", items.join(", "))
        }
    }
}

fn fmt_vertex(p: &Point) -> String {
    format!("  {{ x: {}, y: {} }}", fmt_num(p.x), fmt_num(p.y))
}

/// Accumulates emitted lines and compound parts.
struct CodeWriter {
    lines: Vec<String>,
    parts: Vec<String>,
    next_part: usize,
}

impl CodeWriter {
    fn new() -> Self {
        Self {
            lines: vec![HEADER.to_string()],
            parts: Vec::new(),
            next_part: 1,
        }
    }

    fn part_name(&mut self) -> String {
        let name = format!("part{}", self.next_part);
        self.next_part += 1;
        name
    }

    fn scale_line(name: &str, model: &ShapeModel) -> String {
        format!(
            "Body.scale({}, {}, {});",
            name,
            fmt_num(model.scale_x),
            fmt_num(model.scale_y)
        )
    }

    fn write_shape(&mut self, model: &ShapeModel) {
        let x = fmt_num(model.position.x);
        let y = fmt_num(model.position.y);
        let angle = fmt_num(model.angle);
        let chamfer = model.effective_chamfer();
        let options = match &chamfer {
            Some(radius) => format!(
                "{{ chamfer: {{ radius: {} }}, angle: {} }}",
                fmt_radius(radius),
                angle
            ),
            None => format!("{{ angle: {} }}", angle),
        };
        let uniform = (model.scale_x - model.scale_y).abs() < SCALE_EPSILON;

        match model.scaled_params() {
            ScaledParams::Rectangle { width, height } => {
                self.parts.push(format!(
                    "Bodies.rectangle({}, {}, {}, {}, {})",
                    x,
                    y,
                    fmt_num(width),
                    fmt_num(height),
                    options
                ));
            }
            ScaledParams::Circle {
                radius, radius_x, ..
            } => {
                if uniform {
                    self.parts.push(format!(
                        "Bodies.circle({}, {}, {}, {{ angle: {} }})",
                        x,
                        y,
                        fmt_num(radius_x),
                        angle
                    ));
                } else {
                    let name = self.part_name();
                    self.lines.push(format!(
                        "const {} = Bodies.circle({}, {}, {}, {{ angle: {} }});",
                        name,
                        x,
                        y,
                        fmt_num(radius),
                        angle
                    ));
                    self.lines.push(Self::scale_line(&name, model));
                    self.parts.push(name);
                }
            }
            ScaledParams::Polygon {
                sides,
                radius,
                radius_x,
                ..
            } => {
                if uniform {
                    self.parts.push(format!(
                        "Bodies.polygon({}, {}, {}, {}, {})",
                        x,
                        y,
                        sides,
                        fmt_num(radius_x),
                        options
                    ));
                } else {
                    let name = self.part_name();
                    self.lines.push(format!(
                        "const {} = Bodies.polygon({}, {}, {}, {}, {});",
                        name,
                        x,
                        y,
                        sides,
                        fmt_num(radius),
                        options
                    ));
                    self.lines.push(Self::scale_line(&name, model));
                    self.parts.push(name);
                }
            }
            ScaledParams::Vertices { vertices } => {
                let name = self.part_name();
                let verts: Vec<String> = vertices.iter().map(fmt_vertex).collect();
                let verts = verts.join(",\n");
                match &chamfer {
                    Some(radius) => {
                        self.lines.push(format!("const {}Verts = [", name));
                        self.lines.push(verts);
                        self.lines.push("];".to_string());
                        self.lines.push(format!(
                            "const {n}Chamfer = Vertices.chamfer({n}Verts, {});",
                            fmt_radius(radius),
                            n = name
                        ));
                        self.lines.push(format!(
                            "const {n} = Bodies.fromVertices({}, {}, [{n}Chamfer], {{ angle: {} }});",
                            x,
                            y,
                            angle,
                            n = name
                        ));
                    }
                    None => {
                        self.lines.push(format!(
                            "const {} = Bodies.fromVertices({}, {}, [",
                            name, x, y
                        ));
                        self.lines.push(verts);
                        self.lines.push(format!("], {{ angle: {} }});", angle));
                    }
                }
                if (model.scale_x - 1.0).abs() > SCALE_EPSILON
                    || (model.scale_y - 1.0).abs() > SCALE_EPSILON
                {
                    self.lines.push(Self::scale_line(&name, model));
                }
                self.parts.push(name);
            }
        }
    }

    fn finish(mut self) -> String {
        self.lines.push("const compound = Body.create({".to_string());
        self.lines.push("  parts: [".to_string());
        let last = self.parts.len().saturating_sub(1);
        for (index, part) in self.parts.iter().enumerate() {
            let suffix = if index == last { "" } else { "," };
            self.lines.push(format!("    {}{}", part, suffix));
        }
        self.lines.push("  ]".to_string());
        self.lines.push("});".to_string());
        self.lines.join("\n")
    }
}

/// Generate source that rebuilds the compound body with Matter.js.
pub fn export_body_code(shapes: &[ShapeModel]) -> String {
    let mut writer = CodeWriter::new();
    for model in shapes {
        writer.write_shape(model);
    }
    writer.finish()
}
