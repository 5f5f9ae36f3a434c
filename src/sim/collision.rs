//! Circle-circle overlap geometry
//!
//! Every shape in the arena is a circle, so collision detection reduces to
//! center distance against summed radii. Separation is purely positional:
//! each circle gives up half the penetration depth along the line between
//! centers. No velocity, no momentum.

use glam::Vec2;

/// Penetration between two circles, for separation correction
#[derive(Debug, Clone, Copy)]
pub struct Overlap {
    /// Unit vector from the first center toward the second
    pub direction: Vec2,
    /// Half the penetration depth; each circle is pushed this far
    pub push: f32,
}

/// True when two circles are in contact (strict overlap; touching exactly
/// is not contact). Used for merge detection, where coincident centers
/// still count.
pub fn circles_collide(p1: Vec2, r1: f32, p2: Vec2, r2: f32) -> bool {
    p1.distance(p2) < r1 + r2
}

/// Separation overlap between two distinct circles, if any
///
/// Exactly coincident centers report `None`: there is no direction to push
/// along, so the pair is skipped rather than divided by zero.
pub fn circle_overlap(p1: Vec2, r1: f32, p2: Vec2, r2: f32) -> Option<Overlap> {
    let delta = p2 - p1;
    let distance = delta.length();
    let min_dist = r1 + r2;
    if distance <= 0.0 || distance >= min_dist {
        return None;
    }
    Some(Overlap {
        direction: delta / distance,
        push: (min_dist - distance) / 2.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_halves_penetration() {
        // radius 30 each, centers 50 apart: 10 units deep, 5 per side
        let overlap = circle_overlap(
            Vec2::new(100.0, 300.0),
            30.0,
            Vec2::new(150.0, 300.0),
            30.0,
        )
        .expect("overlapping circles");
        assert!((overlap.push - 5.0).abs() < 1e-6);
        assert!((overlap.direction - Vec2::X).length() < 1e-6);
    }

    #[test]
    fn test_separated_circles_do_not_overlap() {
        assert!(circle_overlap(Vec2::ZERO, 30.0, Vec2::new(100.0, 0.0), 30.0).is_none());
    }

    #[test]
    fn test_touching_circles_do_not_overlap() {
        // distance exactly equal to summed radii is contact-free
        assert!(circle_overlap(Vec2::ZERO, 30.0, Vec2::new(60.0, 0.0), 30.0).is_none());
        assert!(!circles_collide(Vec2::ZERO, 30.0, Vec2::new(60.0, 0.0), 30.0));
    }

    #[test]
    fn test_coincident_centers_are_skipped() {
        let p = Vec2::new(200.0, 200.0);
        assert!(circle_overlap(p, 30.0, p, 30.0).is_none());
        // but coincident centers still count as contact for merge purposes
        assert!(circles_collide(p, 30.0, p, 30.0));
    }

    #[test]
    fn test_collide_strict_inequality() {
        assert!(circles_collide(Vec2::ZERO, 30.0, Vec2::new(59.9, 0.0), 30.0));
        assert!(!circles_collide(Vec2::ZERO, 30.0, Vec2::new(60.1, 0.0), 30.0));
    }

    #[test]
    fn test_overlap_direction_is_unit_length() {
        let overlap = circle_overlap(Vec2::new(10.0, 20.0), 30.0, Vec2::new(30.0, 50.0), 30.0)
            .expect("overlapping circles");
        assert!((overlap.direction.length() - 1.0).abs() < 1e-6);
    }
}
