//! Body export: structured JSON data and Matter.js construction code.

mod code;
mod data;

pub use code::export_body_code;
pub use data::{BodyData, PartData, PartParams, PointData, export_body_data};

use crate::shapes::{ShapeKind, ShapeModel};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Schema version written to every data export.
pub const BODY_DATA_VERSION: &str = "1.0";

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Part {id} is a {kind} but carries {found} params")]
    KindMismatch {
        id: String,
        kind: ShapeKind,
        found: ShapeKind,
    },
    #[error("Unsupported body data version: {0}")]
    UnsupportedVersion(String),
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Both export outputs for one shape list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportBundle {
    pub json: String,
    pub code: String,
}

impl ExportBundle {
    pub fn from_shapes(shapes: &[ShapeModel]) -> ExportResult<Self> {
        Ok(Self {
            json: export_body_data(shapes)?,
            code: export_body_code(shapes),
        })
    }
}

/// Round to three decimals, half up, without a negative zero.
pub fn round3(value: f64) -> f64 {
    let rounded = (value * 1000.0 + 0.5).floor() / 1000.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Format a number for generated source. Integral values have no `.0`.
pub fn fmt_num(value: f64) -> String {
    format!("{}", round3(value))
}

/// A rounded number that serializes integral values as integers.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Num(pub f64);

impl Num {
    /// Largest magnitude that round-trips through `i64` exactly.
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    pub fn rounded(value: f64) -> Self {
        Self(round3(value))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl From<f64> for Num {
    fn from(value: f64) -> Self {
        Self::rounded(value)
    }
}

impl Serialize for Num {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let v = self.0;
        if v.is_finite() && v.fract() == 0.0 && v.abs() <= Self::MAX_EXACT {
            serializer.serialize_i64(v as i64)
        } else {
            serializer.serialize_f64(v)
        }
    }
}

impl<'de> Deserialize<'de> for Num {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Num)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round3() {
        assert_eq!(round3(1.23456), 1.235);
        // halves round toward positive infinity
        assert_eq!(round3(0.0625), 0.063);
        assert_eq!(round3(-0.0625), -0.062);
        assert_eq!(round3(-0.0001), 0.0);
        assert!(round3(-0.0001).is_sign_positive());
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(240.0), "240");
        assert_eq!(fmt_num(0.1), "0.1");
        assert_eq!(fmt_num(-12.34567), "-12.346");
        assert_eq!(fmt_num(-0.0), "0");
    }

    #[test]
    fn test_num_serializes_integers_plainly() {
        assert_eq!(serde_json::to_string(&Num(5.0)).unwrap(), "5");
        assert_eq!(serde_json::to_string(&Num(-2.5)).unwrap(), "-2.5");
        assert_eq!(serde_json::to_string(&Num::rounded(1.0 / 3.0)).unwrap(), "0.333");
        let parsed: Num = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, Num(7.0));
    }
}
