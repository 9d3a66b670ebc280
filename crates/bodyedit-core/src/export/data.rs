//! Versioned JSON body data.

use super::{BODY_DATA_VERSION, ExportError, ExportResult, Num};
use crate::shapes::{
    Chamfer, CircleParams, IdGenerator, PolygonParams, RectangleParams, ShapeKind, ShapeModel,
    ShapeParams, ShapeTemplate, VerticesParams,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Top-level export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyData {
    pub version: String,
    pub parts: Vec<PartData>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointData {
    pub x: Num,
    pub y: Num,
}

impl From<Point> for PointData {
    fn from(p: Point) -> Self {
        Self {
            x: Num::rounded(p.x),
            y: Num::rounded(p.y),
        }
    }
}

impl From<PointData> for Point {
    fn from(p: PointData) -> Self {
        Point::new(p.x.get(), p.y.get())
    }
}

/// One shape in the export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartData {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub position: PointData,
    #[serde(default)]
    pub angle: Num,
    #[serde(default = "unit")]
    pub scale_x: Num,
    #[serde(default = "unit")]
    pub scale_y: Num,
    pub params: PartParams,
}

fn unit() -> Num {
    Num(1.0)
}

/// Type-normalized params.
///
/// Circle and polygon radii are written scaled. Rectangle sizes and chain
/// vertices are written raw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PartParams {
    Rectangle {
        width: Num,
        height: Num,
        #[serde(default)]
        chamfer: Num,
        #[serde(default, rename = "vertexChamfers")]
        vertex_chamfers: Vec<Num>,
        #[serde(default, rename = "usePerVertex")]
        use_per_vertex: bool,
    },
    Polygon {
        sides: u32,
        #[serde(rename = "radiusX")]
        radius_x: Num,
        #[serde(rename = "radiusY")]
        radius_y: Num,
        #[serde(default)]
        chamfer: Num,
        #[serde(default, rename = "vertexChamfers")]
        vertex_chamfers: Vec<Num>,
        #[serde(default, rename = "usePerVertex")]
        use_per_vertex: bool,
    },
    Vertices {
        vertices: Vec<PointData>,
        #[serde(default)]
        chamfer: Num,
        #[serde(default, rename = "vertexChamfers")]
        vertex_chamfers: Vec<Num>,
        #[serde(default, rename = "usePerVertex")]
        use_per_vertex: bool,
    },
    Circle {
        #[serde(rename = "radiusX")]
        radius_x: Num,
        #[serde(rename = "radiusY")]
        radius_y: Num,
    },
}

impl PartParams {
    pub fn kind(&self) -> ShapeKind {
        match self {
            PartParams::Rectangle { .. } => ShapeKind::Rectangle,
            PartParams::Polygon { .. } => ShapeKind::Polygon,
            PartParams::Vertices { .. } => ShapeKind::Vertices,
            PartParams::Circle { .. } => ShapeKind::Circle,
        }
    }
}

fn rounded_radii(chamfer: &Chamfer) -> Vec<Num> {
    chamfer.vertex_radii.iter().copied().map(Num::rounded).collect()
}

fn chamfer_from(radius: Num, radii: &[Num], use_per_vertex: bool) -> Chamfer {
    Chamfer {
        radius: radius.get(),
        vertex_radii: radii.iter().map(|r| r.get()).collect(),
        use_per_vertex,
    }
}

/// Undo export-time scaling of a radius.
fn unscale(value: Num, scale: Num) -> f64 {
    if scale.get() == 0.0 {
        value.get()
    } else {
        value.get() / scale.get()
    }
}

impl PartData {
    pub fn from_shape(model: &ShapeModel) -> Self {
        let (sx, sy) = (model.scale_x, model.scale_y);
        let params = match &model.params {
            ShapeParams::Rectangle(p) => PartParams::Rectangle {
                width: Num::rounded(p.width),
                height: Num::rounded(p.height),
                chamfer: Num::rounded(p.chamfer.radius),
                vertex_chamfers: rounded_radii(&p.chamfer),
                use_per_vertex: p.chamfer.use_per_vertex,
            },
            ShapeParams::Circle(p) => PartParams::Circle {
                radius_x: Num::rounded(p.radius * sx),
                radius_y: Num::rounded(p.radius * sy),
            },
            ShapeParams::Polygon(p) => PartParams::Polygon {
                sides: p.sides,
                radius_x: Num::rounded(p.radius * sx),
                radius_y: Num::rounded(p.radius * sy),
                chamfer: Num::rounded(p.chamfer.radius),
                vertex_chamfers: rounded_radii(&p.chamfer),
                use_per_vertex: p.chamfer.use_per_vertex,
            },
            ShapeParams::Vertices(p) => PartParams::Vertices {
                vertices: p.vertices.iter().copied().map(PointData::from).collect(),
                chamfer: Num::rounded(p.chamfer.radius),
                vertex_chamfers: rounded_radii(&p.chamfer),
                use_per_vertex: p.chamfer.use_per_vertex,
            },
        };

        Self {
            id: model.id().to_string(),
            kind: model.kind(),
            position: model.position.into(),
            angle: Num::rounded(model.angle),
            scale_x: Num::rounded(model.scale_x),
            scale_y: Num::rounded(model.scale_y),
            params,
        }
    }

    /// Rebuild the shape template this part was exported from.
    pub fn to_template(&self) -> ExportResult<ShapeTemplate> {
        if self.params.kind() != self.kind {
            return Err(ExportError::KindMismatch {
                id: self.id.clone(),
                kind: self.kind,
                found: self.params.kind(),
            });
        }

        let params = match &self.params {
            PartParams::Rectangle {
                width,
                height,
                chamfer,
                vertex_chamfers,
                use_per_vertex,
            } => ShapeParams::Rectangle(RectangleParams {
                width: width.get(),
                height: height.get(),
                chamfer: chamfer_from(*chamfer, vertex_chamfers, *use_per_vertex),
            }),
            PartParams::Circle { radius_x, .. } => {
                ShapeParams::Circle(CircleParams::new(unscale(*radius_x, self.scale_x)))
            }
            PartParams::Polygon {
                sides,
                radius_x,
                chamfer,
                vertex_chamfers,
                use_per_vertex,
                ..
            } => ShapeParams::Polygon(PolygonParams {
                sides: PolygonParams::clamp_sides(*sides as f64),
                radius: unscale(*radius_x, self.scale_x),
                chamfer: chamfer_from(*chamfer, vertex_chamfers, *use_per_vertex),
            }),
            PartParams::Vertices {
                vertices,
                chamfer,
                vertex_chamfers,
                use_per_vertex,
            } => ShapeParams::Vertices(VerticesParams {
                vertices: vertices.iter().copied().map(Point::from).collect(),
                chamfer: chamfer_from(*chamfer, vertex_chamfers, *use_per_vertex),
            }),
        };

        Ok(ShapeTemplate {
            params,
            angle: self.angle.get(),
            scale_x: self.scale_x.get(),
            scale_y: self.scale_y.get(),
            render_color: None,
        })
    }
}

impl BodyData {
    pub fn from_shapes(shapes: &[ShapeModel]) -> Self {
        Self {
            version: BODY_DATA_VERSION.to_string(),
            parts: shapes.iter().map(PartData::from_shape).collect(),
        }
    }

    pub fn to_json(&self) -> ExportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse an export. Only version 1 documents are accepted.
    pub fn from_json(json: &str) -> ExportResult<Self> {
        let data: BodyData = serde_json::from_str(json)?;
        if data.version.split('.').next() != Some("1") {
            return Err(ExportError::UnsupportedVersion(data.version));
        }
        Ok(data)
    }

    /// Rebuild shape models with fresh ids.
    pub fn into_shapes(self, ids: &mut IdGenerator) -> ExportResult<Vec<ShapeModel>> {
        self.parts
            .iter()
            .map(|part| {
                let template = part.to_template()?;
                Ok(ShapeModel::from_template(ids, &template, part.position.into()))
            })
            .collect()
    }
}

/// Export shapes as pretty-printed body data.
pub fn export_body_data(shapes: &[ShapeModel]) -> ExportResult<String> {
    BodyData::from_shapes(shapes).to_json()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_shapes(ids: &mut IdGenerator) -> Vec<ShapeModel> {
        let mut rect = ShapeModel::create(
            ids,
            &ShapeParams::Rectangle(RectangleParams::new(120.0, 80.0).with_chamfer(4.0)),
            Point::new(100.0, 200.0),
        );
        rect.scale_x = 2.0;
        rect.scale_y = 0.5;
        rect.angle = 0.123456;

        let mut circle = ShapeModel::create(
            ids,
            &ShapeParams::Circle(CircleParams::new(50.0)),
            Point::new(10.5, -3.25),
        );
        circle.scale_x = 1.5;

        let mut polygon = ShapeModel::create(
            ids,
            &ShapeParams::Polygon(PolygonParams::new(6, 40.0)),
            Point::new(300.0, 300.0),
        );
        polygon
            .apply_vertex_chamfers(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
            .unwrap();

        let chain = ShapeModel::create(
            ids,
            &ShapeParams::Vertices(VerticesParams::new(vec![
                Point::new(0.0, 0.0),
                Point::new(30.1234, 0.0),
                Point::new(15.0, 20.0),
            ])),
            Point::new(50.0, 50.0),
        );

        vec![rect, circle, polygon, chain]
    }

    #[test]
    fn test_export_layout() {
        let mut ids = IdGenerator::new();
        let shapes = sample_shapes(&mut ids);
        let json = export_body_data(&shapes).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["version"], "1.0");
        let parts = value["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 4);

        let rect = &parts[0];
        assert_eq!(rect["id"], "shape_1");
        assert_eq!(rect["type"], "rectangle");
        assert_eq!(rect["angle"], 0.123);
        assert_eq!(rect["scaleX"], 2);
        assert_eq!(rect["params"]["width"], 120);
        assert_eq!(rect["params"]["height"], 80);
        assert_eq!(rect["params"]["chamfer"], 4);
        assert_eq!(rect["params"]["usePerVertex"], false);

        let circle = &parts[1];
        assert_eq!(circle["position"]["x"], 10.5);
        assert_eq!(circle["params"]["radiusX"], 75);
        assert_eq!(circle["params"]["radiusY"], 50);

        let polygon = &parts[2];
        assert_eq!(polygon["params"]["sides"], 6);
        assert_eq!(polygon["params"]["vertexChamfers"].as_array().unwrap().len(), 6);
        assert_eq!(polygon["params"]["usePerVertex"], true);

        let chain = &parts[3];
        assert_eq!(chain["params"]["vertices"][1]["x"], 30.123);
    }

    #[test]
    fn test_pretty_printed_with_two_spaces() {
        let mut ids = IdGenerator::new();
        let shapes = sample_shapes(&mut ids);
        let json = export_body_data(&shapes[..1]).unwrap();
        assert!(json.starts_with("{\n  \"version\": \"1.0\",\n  \"parts\": ["));
        assert!(json.contains("\"width\": 120,"));
    }

    #[test]
    fn test_round_trip_keeps_geometry() {
        let mut ids = IdGenerator::new();
        let shapes = sample_shapes(&mut ids);
        let json = export_body_data(&shapes).unwrap();

        let rebuilt = BodyData::from_json(&json).unwrap().into_shapes(&mut ids).unwrap();
        assert_eq!(rebuilt.len(), shapes.len());
        for (before, after) in shapes.iter().zip(&rebuilt) {
            assert_eq!(before.kind(), after.kind());
            assert_ne!(before.id(), after.id());
            assert_eq!(before.corner_count(), after.corner_count());
        }

        match &rebuilt[1].params {
            ShapeParams::Circle(c) => assert!((c.radius - 50.0).abs() < 1e-9),
            other => panic!("Expected circle, got {:?}", other),
        }
        assert_eq!(rebuilt[3].vertices().unwrap()[1], Point::new(30.123, 0.0));

        let again = export_body_data(&rebuilt).unwrap();
        let first: BodyData = serde_json::from_str(&json).unwrap();
        let second: BodyData = serde_json::from_str(&again).unwrap();
        for (a, b) in first.parts.iter().zip(&second.parts) {
            assert_eq!(a.params, b.params);
            assert_eq!(a.position, b.position);
            assert_eq!(a.angle, b.angle);
        }
    }

    #[test]
    fn test_kind_mismatch_is_rejected() {
        let json = r#"{
            "version": "1.0",
            "parts": [{
                "id": "shape_9",
                "type": "polygon",
                "position": { "x": 0, "y": 0 },
                "params": { "radiusX": 4, "radiusY": 4 }
            }]
        }"#;
        let data = BodyData::from_json(json).unwrap();
        let mut ids = IdGenerator::new();
        let err = data.into_shapes(&mut ids).unwrap_err();
        assert!(matches!(err, ExportError::KindMismatch { kind: ShapeKind::Polygon, found: ShapeKind::Circle, .. }));
    }

    #[test]
    fn test_unknown_type_and_version() {
        let unknown = r#"{"version":"1.0","parts":[{"id":"a","type":"star","position":{"x":0,"y":0},"params":{"radiusX":1,"radiusY":1}}]}"#;
        assert!(matches!(BodyData::from_json(unknown), Err(ExportError::Json(_))));

        let future = r#"{"version":"2.0","parts":[]}"#;
        assert!(matches!(BodyData::from_json(future), Err(ExportError::UnsupportedVersion(v)) if v == "2.0"));
    }
}
