//! Pure geometry helpers shared by the model, gizmo, and exporter.

use kurbo::{Affine, Point, Rect, Vec2};
use std::f64::consts::{FRAC_PI_2, TAU};

/// Points of a regular polygon centered on the origin.
///
/// The first point sits at the top (`(0, -radius)`) and the rest follow
/// clockwise on screen, `2π / sides` apart.
pub fn regular_polygon_points(sides: u32, radius: f64) -> Vec<Point> {
    if sides == 0 {
        return Vec::new();
    }
    let step = TAU / sides as f64;
    (0..sides)
        .map(|i| {
            let angle = -FRAC_PI_2 + step * i as f64;
            Point::new(angle.cos() * radius, angle.sin() * radius)
        })
        .collect()
}

/// Map a local point into world space: rotate by `angle`, scale
/// uniformly by `scale`, then translate by `position`.
pub fn apply_transform(point: Point, position: Point, angle: f64, scale: f64) -> Point {
    let affine = Affine::translate(position.to_vec2()) * Affine::scale(scale) * Affine::rotate(angle);
    affine * point
}

/// Express `point` relative to `center` in a frame rotated by `angle`.
///
/// Inverse of the rotation part of [`apply_transform`]. Scale is left to
/// the caller since shapes scale per axis.
pub fn local_delta(point: Point, center: Point, angle: f64) -> Vec2 {
    let d = point - center;
    let (sin, cos) = (-angle).sin_cos();
    Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
}

/// Axis-aligned bounds of a point set, `None` when empty.
pub fn bounds_of(points: &[Point]) -> Option<Rect> {
    let (first, rest) = points.split_first()?;
    Some(
        rest.iter()
            .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p)),
    )
}

/// Even-odd point-in-polygon test.
pub fn polygon_contains(points: &[Point], p: Point) -> bool {
    if points.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}
