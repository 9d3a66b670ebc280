//! Corner rounding shared by rectangles, polygons, and vertex chains.

use super::ModelError;
use serde::{Deserialize, Serialize};

/// Chamfer settings for a shape with corners.
///
/// `vertex_radii` holds one radius per corner and is only authoritative
/// while `use_per_vertex` is set and its length matches the corner count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chamfer {
    /// Uniform corner radius.
    pub radius: f64,
    /// Per-corner radii.
    #[serde(default)]
    pub vertex_radii: Vec<f64>,
    /// Use `vertex_radii` instead of `radius`.
    #[serde(default)]
    pub use_per_vertex: bool,
}

/// The radius a consumer should actually apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChamferRadius {
    Uniform(f64),
    PerVertex(Vec<f64>),
}

impl Chamfer {
    /// Uniform chamfer with no per-corner overrides.
    pub fn uniform(radius: f64) -> Self {
        Self {
            radius,
            vertex_radii: Vec::new(),
            use_per_vertex: false,
        }
    }

    /// Re-derive the per-corner list from the scalar radius when its
    /// length no longer matches `count`.
    pub fn sync(&mut self, count: usize) {
        if self.vertex_radii.len() != count {
            self.vertex_radii = vec![self.radius; count];
        }
    }

    /// Like [`Chamfer::sync`], but leaves an untouched chamfer (no list,
    /// per-corner mode off) alone.
    pub fn repair(&mut self, count: usize) {
        if self.use_per_vertex || !self.vertex_radii.is_empty() {
            self.sync(count);
        }
    }

    /// Append a corner using the scalar radius.
    pub(crate) fn push_corner(&mut self, count_before: usize) {
        self.sync(count_before);
        self.vertex_radii.push(self.radius);
    }

    /// Drop the radius of a removed corner.
    pub(crate) fn remove_corner(&mut self, index: usize, count_before: usize) {
        self.sync(count_before);
        if index < self.vertex_radii.len() {
            self.vertex_radii.remove(index);
        }
    }

    /// Set the scalar radius and reset every corner to it.
    pub fn apply_uniform(&mut self, radius: f64, count: usize) {
        self.radius = radius;
        self.vertex_radii = vec![radius; count];
        self.use_per_vertex = false;
    }

    /// Switch to per-corner radii.
    pub fn apply_per_vertex(&mut self, radii: Vec<f64>, count: usize) -> Result<(), ModelError> {
        if radii.len() != count {
            return Err(ModelError::ChamferCountMismatch {
                expected: count,
                actual: radii.len(),
            });
        }
        self.vertex_radii = radii;
        self.use_per_vertex = true;
        Ok(())
    }

    /// Resolve the radius to apply for a shape with `count` corners.
    ///
    /// A per-corner list whose length disagrees with `count` is ignored in
    /// favour of the scalar radius. Returns `None` when nothing rounds.
    pub fn effective(&self, count: usize) -> Option<ChamferRadius> {
        if self.use_per_vertex && count > 0 && self.vertex_radii.len() == count {
            return Some(ChamferRadius::PerVertex(self.vertex_radii.clone()));
        }
        let radius = self.radius.max(0.0);
        (radius > 0.0).then_some(ChamferRadius::Uniform(radius))
    }
}
