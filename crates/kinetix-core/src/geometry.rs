//! Geometric primitives on landmark coordinates.
//!
//! All functions are pure. Angles are returned in degrees.

use std::f64::consts::PI;

use nalgebra::Vector3;

use crate::error::{Error, Result};
use crate::types::Position3D;

/// Calculate angle between two vectors in radians, `None` if either has zero length
pub fn angle_between(v1: &Vector3<f64>, v2: &Vector3<f64>) -> Option<f64> {
    let norms = v1.norm() * v2.norm();
    if norms == 0.0 || !norms.is_finite() {
        return None;
    }
    Some((v1.dot(v2) / norms).clamp(-1.0, 1.0).acos())
}

/// Angle at `vertex` formed by `p1` and `p2`, in degrees [0, 180].
///
/// Uses full 3D vectors (depth included).
pub fn try_angle(p1: &Position3D, vertex: &Position3D, p2: &Position3D) -> Result<f64> {
    let v1 = p1.to_vector() - vertex.to_vector();
    let v2 = p2.to_vector() - vertex.to_vector();
    let radians = angle_between(&v1, &v2).ok_or(Error::DegenerateGeometry)?;
    Ok(radians * 180.0 / PI)
}

/// Same as [`try_angle`] but degenerate inputs yield `None`
pub fn angle(p1: &Position3D, vertex: &Position3D, p2: &Position3D) -> Option<f64> {
    try_angle(p1, vertex, p2).ok()
}

pub fn distance_3d(a: &Position3D, b: &Position3D) -> f64 {
    a.distance_to(b)
}

/// Image-plane distance; depth is ignored
pub fn distance_2d(a: &Position3D, b: &Position3D) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Speed between two positions. A non-positive `dt` yields 0.
pub fn velocity(prev: &Position3D, next: &Position3D, dt: f64) -> f64 {
    if dt <= 0.0 {
        return 0.0;
    }
    distance_3d(prev, next) / dt
}

pub fn midpoint(a: &Position3D, b: &Position3D) -> Position3D {
    Position3D::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0, (a.z + b.z) / 2.0)
}

/// Lean of the segment `base → top` away from vertical, in degrees [0, 90].
/// Direction is not preserved.
pub fn lean_from_vertical(base: &Position3D, top: &Position3D) -> f64 {
    let dx = (top.x - base.x).abs();
    let dy = (top.y - base.y).abs();
    dx.atan2(dy) * 180.0 / PI
}

/// Arithmetic mean of a set of positions
pub fn centroid(points: &[Position3D]) -> Option<Position3D> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy, sz) = points
        .iter()
        .fold((0.0, 0.0, 0.0), |(x, y, z), p| (x + p.x, y + p.y, z + p.z));
    Some(Position3D::new(sx / n, sy / n, sz / n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_right_angle_at_elbow() {
        let shoulder = Position3D::new(0.0, 0.0, 0.0);
        let elbow = Position3D::new(0.0, -1.0, 0.0);
        let wrist = Position3D::new(1.0, -1.0, 0.0);
        let deg = angle(&shoulder, &elbow, &wrist).unwrap();
        assert_relative_eq!(deg, 90.0, epsilon = 1e-12);
    }

    #[test]
    fn test_straight_and_folded() {
        let a = Position3D::new(0.0, 0.0, 0.0);
        let v = Position3D::new(0.5, 0.0, 0.0);
        let b = Position3D::new(1.0, 0.0, 0.0);
        assert_relative_eq!(angle(&a, &v, &b).unwrap(), 180.0, epsilon = 1e-9);
        assert_relative_eq!(angle(&a, &v, &a).unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_angle_uses_depth() {
        let a = Position3D::new(1.0, 0.0, 0.0);
        let v = Position3D::origin();
        let b = Position3D::new(0.0, 0.0, 1.0);
        assert_relative_eq!(angle(&a, &v, &b).unwrap(), 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_coincident_points_are_degenerate() {
        let p = Position3D::new(0.3, 0.3, 0.0);
        let q = Position3D::new(0.4, 0.3, 0.0);
        assert!(matches!(try_angle(&p, &p, &q), Err(Error::DegenerateGeometry)));
        assert!(angle(&q, &p, &p).is_none());
    }

    #[test]
    fn test_distances() {
        let a = Position3D::new(0.0, 0.0, 0.0);
        let b = Position3D::new(3.0, 4.0, 12.0);
        assert_relative_eq!(distance_3d(&a, &b), 13.0);
        assert_relative_eq!(distance_2d(&a, &b), 5.0);
    }

    #[test]
    fn test_velocity_zero_duration_is_zero() {
        let p = Position3D::new(0.5, 0.5, 0.0);
        assert_eq!(velocity(&p, &p, 0.0), 0.0);
        assert_eq!(velocity(&p, &Position3D::origin(), 0.0), 0.0);
    }

    #[test]
    fn test_velocity_wrist_scenario() {
        let prev = Position3D::new(0.5, 0.5, 0.0);
        let next = Position3D::new(0.5, 0.3, 0.0);
        assert_relative_eq!(velocity(&prev, &next, 0.1), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_lean_from_vertical() {
        let hips = Position3D::new(0.5, 0.6, 0.0);
        assert_relative_eq!(
            lean_from_vertical(&hips, &Position3D::new(0.5, 0.3, 0.0)),
            0.0
        );
        assert_relative_eq!(
            lean_from_vertical(&hips, &Position3D::new(0.8, 0.3, 0.0)),
            45.0,
            epsilon = 1e-9
        );
        // Leaning left or right gives the same magnitude
        assert_relative_eq!(
            lean_from_vertical(&hips, &Position3D::new(0.2, 0.3, 0.0)),
            45.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_centroid() {
        assert!(centroid(&[]).is_none());
        let c = centroid(&[
            Position3D::new(0.0, 0.0, 0.0),
            Position3D::new(1.0, 2.0, 3.0),
        ])
        .unwrap();
        assert_eq!(c, Position3D::new(0.5, 1.0, 1.5));
    }
}
