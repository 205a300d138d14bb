//! Curved path geometry on the rolling sphere
//!
//! Entities are stored in surface coordinates:
//! - lateral: position across the path in lane units (-1 = left lane)
//! - path distance: arc length along the rolling direction
//!
//! The sphere is centred at (0, -R, 0) so the hero sits on top at the origin.
//! Ahead of the hero is -Z, the left lane is -X.

use glam::{Vec2, Vec3};

use crate::consts::{LANE_ANGLE, WORLD_RADIUS};

/// Centre of the world sphere
pub const WORLD_CENTER: Vec3 = Vec3::new(0.0, -WORLD_RADIUS, 0.0);

/// World-space point for an entity on (or above) the sphere surface
///
/// `relative_path` is the path distance from the hero (positive = ahead).
#[inline]
pub fn surface_point(lateral: f32, relative_path: f32, height: f32) -> Vec3 {
    let lambda = lateral * LANE_ANGLE;
    let theta = relative_path / WORLD_RADIUS;
    let r = WORLD_RADIUS + height;
    let dir = Vec3::new(
        lambda.sin(),
        lambda.cos() * theta.cos(),
        -lambda.cos() * theta.sin(),
    );
    WORLD_CENTER + dir * r
}

/// Projection of a world point onto the lane plane (x, z)
#[inline]
pub fn lane_plane(p: Vec3) -> Vec2 {
    Vec2::new(p.x, p.z)
}

/// Surface length of one lane unit
#[inline]
pub fn lane_unit_length() -> f32 {
    LANE_ANGLE * WORLD_RADIUS
}

/// Displacement between two surface positions in world units (lateral, path)
#[inline]
pub fn surface_delta(from: (f32, f32), to: (f32, f32)) -> Vec2 {
    Vec2::new((to.0 - from.0) * lane_unit_length(), to.1 - from.1)
}

/// Angle the world has rolled after travelling `distance` along the path
#[inline]
pub fn roll_angle(distance: f32) -> f32 {
    distance / WORLD_RADIUS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hero_origin_sits_on_top() {
        let p = surface_point(0.0, 0.0, 0.0);
        assert!(p.length() < 1e-4);
        let raised = surface_point(0.0, 0.0, 1.0);
        assert!((raised.y - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_ahead_is_negative_z_and_curves_down() {
        let p = surface_point(0.0, 5.0, 0.0);
        assert!(p.z < 0.0);
        assert!(p.y < 0.0);
        // Stays on the sphere
        assert!(((p - WORLD_CENTER).length() - WORLD_RADIUS).abs() < 1e-3);
    }

    #[test]
    fn test_lanes_are_separated_laterally() {
        let left = surface_point(-1.0, 0.0, 0.0);
        let right = surface_point(1.0, 0.0, 0.0);
        assert!(left.x < 0.0 && right.x > 0.0);
        let gap = (surface_point(0.0, 0.0, 0.0) - right).length();
        assert!((gap - lane_unit_length()).abs() < 0.01);
    }

    #[test]
    fn test_surface_delta_scales_lanes() {
        let d = surface_delta((0.0, 0.0), (1.0, 2.0));
        assert!((d.x - lane_unit_length()).abs() < 1e-6);
        assert_eq!(d.y, 2.0);
    }
}
