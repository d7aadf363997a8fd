//! Position arithmetic for the ticker, independent of any surface.
//!
//! Both directions keep the position inside `[-W, 0]` where `W` is the width
//! of one copy of the content. Left travels toward `-W` and restarts at `0`;
//! Right travels toward `0` and restarts at `-W`. The two ends render the same
//! frame because the content repeats every `W` pixels.

use super::Direction;

/// Largest time step integrated in one frame, in seconds.
pub const MAX_FRAME_DELTA: f64 = 0.1;

/// Tolerance on the wrap boundary so float error cannot skip a wrap.
pub const WRAP_EPSILON: f64 = 1e-6;

pub fn start_position(direction: Direction, content_width: f64) -> f64 {
    match direction {
        Direction::Left => 0.0,
        Direction::Right => -content_width,
    }
}

/// Integrates one frame and applies the exact wraparound reset.
pub fn step(position: f64, direction: Direction, speed: f64, dt: f64, content_width: f64) -> f64 {
    let next = position + direction.sign() * speed * dt;
    match direction {
        Direction::Left if next <= -content_width + WRAP_EPSILON => 0.0,
        Direction::Right if next >= -WRAP_EPSILON => -content_width,
        _ => next,
    }
}

/// Maps the boundary value the old direction allows onto the one the new
/// direction allows; interior positions are kept.
pub fn normalize_for(position: f64, direction: Direction, content_width: f64) -> f64 {
    match direction {
        Direction::Left if position <= -content_width + WRAP_EPSILON => 0.0,
        Direction::Right if position >= -WRAP_EPSILON => -content_width,
        _ => position,
    }
}

/// Upper bound on clone sets; sub-pixel content would otherwise ask for
/// millions of deep copies.
pub const MAX_CLONE_SETS: usize = 64;

/// Full copies of the content appended after the originals, at most
/// [`MAX_CLONE_SETS`].
pub fn clone_count(viewport_width: f64, items_width: f64) -> usize {
    let fill = (viewport_width / items_width).ceil();
    let fill = if fill > 0.0 { fill.min(MAX_CLONE_SETS as f64) as usize } else { 0 };
    fill.saturating_add(2).min(MAX_CLONE_SETS)
}

/// Whether covering the viewport needs more sets than [`MAX_CLONE_SETS`].
pub fn exceeds_clone_cap(viewport_width: f64, items_width: f64) -> bool {
    (viewport_width / items_width).ceil() + 2.0 > MAX_CLONE_SETS as f64
}

pub fn transform(position: f64) -> String {
    // `+ 0.0` folds -0 into 0.
    format!("translateX({}px)", position + 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_wraps_to_exact_zero() {
        let w = 500.0;
        let mut pos = 0.0;
        // 80 ticks of 62.5 ms at 100 px/s cover exactly W.
        for _ in 0..79 {
            pos = step(pos, Direction::Left, 100.0, 0.0625, w);
        }
        assert_eq!(pos, -493.75);
        pos = step(pos, Direction::Left, 100.0, 0.0625, w);
        assert_eq!(pos, 0.0);
    }

    #[test]
    fn right_wraps_to_exact_minus_width() {
        let w = 500.0;
        let pos = step(-10.0, Direction::Right, 100.0, 0.1, w);
        assert_eq!(pos, -w);
        assert_eq!(step(-w, Direction::Right, 100.0, 0.05, w), -495.0);
    }

    #[test]
    fn overshoot_does_not_carry() {
        assert_eq!(step(-490.0, Direction::Left, 1000.0, 0.1, 500.0), 0.0);
    }

    #[test]
    fn travel_magnitude_is_direction_symmetric() {
        let w = 500.0;
        let left = step(0.0, Direction::Left, 80.0, 0.05, w);
        let right = step(-w, Direction::Right, 80.0, 0.05, w);
        assert_eq!(left.abs(), right - -w);
    }

    #[test]
    fn direction_change_normalizes_only_boundaries() {
        let w = 300.0;
        assert_eq!(normalize_for(0.0, Direction::Right, w), -w);
        assert_eq!(normalize_for(-w, Direction::Left, w), 0.0);
        assert_eq!(normalize_for(-120.0, Direction::Right, w), -120.0);
        assert_eq!(normalize_for(-120.0, Direction::Left, w), -120.0);
    }

    #[test]
    fn clone_count_covers_viewport_plus_two() {
        assert_eq!(clone_count(1000.0, 500.0), 4);
        assert_eq!(clone_count(1001.0, 500.0), 5);
        assert_eq!(clone_count(0.0, 500.0), 2);
    }

    #[test]
    fn clone_count_is_capped_for_tiny_content() {
        assert_eq!(clone_count(1000.0, 0.001), MAX_CLONE_SETS);
        assert_eq!(clone_count(1000.0, 1e-300), MAX_CLONE_SETS);
        assert_eq!(clone_count(1000.0, f64::MIN_POSITIVE), MAX_CLONE_SETS);
        assert!(exceeds_clone_cap(1000.0, 0.001));
        assert!(!exceeds_clone_cap(1000.0, 500.0));
        // ceil(1000 / 16) + 2 = 65
        assert_eq!(clone_count(1000.0, 16.0), MAX_CLONE_SETS);
        // ceil(1000 / 17) + 2 = 61
        assert_eq!(clone_count(1000.0, 17.0), 61);
    }

    #[test]
    fn transform_formatting() {
        assert_eq!(transform(-6.25), "translateX(-6.25px)");
        assert_eq!(transform(-0.0), "translateX(0px)");
        assert_eq!(transform(-200.0), "translateX(-200px)");
    }
}
