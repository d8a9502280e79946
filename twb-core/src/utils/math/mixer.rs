//! Differential-drive mixing for two-wheeled robots.
//!
//! The mixer converts a joystick-style steering intent (rotation `x` and
//! forward speed `y`, both in percent) into signed power values for the
//! left and right wheels. The wheel on the outside of a turn always runs
//! at the full capped magnitude; the inner wheel is reduced linearly with
//! `|x|`, stopping at `|x| = 50` and reversing beyond it, which allows
//! point turns at full rotation intent.
//!
//! # Example
//! ```rust
//! use twb_core::utils::math::mixer::mix;
//! let (left, right) = mix(0.0, 50.0);
//! assert_eq!((left, right), (50.0, 50.0));
//! ```
//!
use libm;

/// Maximum wheel power in percent.
const MAX_POWER: f32 = 100.0;

/// Mix a steering intent into `(left, right)` wheel power.
///
/// `x` is rotation intent (positive turns right, i.e. clockwise) and `y`
/// is forward intent (positive drives forward), both expected in
/// `[-100, 100]`. Callers are responsible for constraining their inputs;
/// the mixer only caps the combined magnitude at 100 so diagonal intents
/// cannot exceed full power.
///
/// Returns signed percents in `[-100, 100]`: positive drives the wheel
/// forward, negative in reverse.
pub fn mix(
    x: f32,
    y: f32,
) -> (f32, f32) {
    // Euclidean magnitude of the intent vector, capped at full power.
    let max_power = libm::sqrtf(x * x + y * y).min(MAX_POWER);

    // Inner-wheel share: full at x = 0, zero at |x| = 50, fully reversed
    // at |x| = 100.
    let variable_power = ((MAX_POWER - 2.0 * x.abs()) / MAX_POWER) * max_power;

    // (left, right) for x >= 0; turning left mirrors the pair below.
    let (left, right) = if y < 0.0 {
        (-variable_power, -max_power)
    } else {
        (max_power, variable_power)
    };

    if x < 0.0 {
        (right, left)
    } else {
        (left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(
        got: (f32, f32),
        want: (f32, f32),
    ) {
        assert!(
            (got.0 - want.0).abs() < 1e-4 && (got.1 - want.1).abs() < 1e-4,
            "{:?} != {:?}",
            got,
            want
        );
    }

    #[test]
    fn zero_intent_stops_both_wheels() {
        assert_eq!(mix(0.0, 0.0), (0.0, 0.0));
    }

    #[test]
    fn straight_line_has_no_differential() {
        assert_close(mix(0.0, 50.0), (50.0, 50.0));
        assert_close(mix(0.0, 100.0), (100.0, 100.0));
        assert_close(mix(0.0, -70.0), (-70.0, -70.0));
    }

    #[test]
    fn full_rotation_spins_in_place() {
        assert_close(mix(100.0, 0.0), (100.0, -100.0));
        assert_close(mix(-100.0, 0.0), (-100.0, 100.0));
    }

    #[test]
    fn inner_wheel_stops_at_half_rotation() {
        let (left, right) = mix(50.0, 0.0);
        assert!((left - 50.0).abs() < 1e-4);
        assert!(right.abs() < 1e-4);
    }

    #[test]
    fn turn_reduces_the_inner_wheel_only() {
        let (left, right) = mix(25.0, 75.0);
        let cap = libm::sqrtf(25.0 * 25.0 + 75.0 * 75.0);
        assert!((left - cap).abs() < 1e-4);
        assert!(right > 0.0 && right < left);
    }

    #[test]
    fn diagonal_intent_is_capped_at_full_power() {
        let (left, right) = mix(100.0, 100.0);
        assert_close((left, right), (100.0, -100.0));
    }

    #[test]
    fn magnitude_never_exceeds_the_capped_intent() {
        for x in (-100..=100).step_by(10) {
            for y in (-100..=100).step_by(10) {
                let (left, right) = mix(x as f32, y as f32);
                let cap = libm::sqrtf((x * x + y * y) as f32).min(100.0);
                assert!(
                    left.abs() <= cap + 1e-3 && right.abs() <= cap + 1e-3,
                    "({}, {}) -> ({}, {}) exceeds cap {}",
                    x,
                    y,
                    left,
                    right,
                    cap
                );
            }
        }
    }

    #[test]
    fn reverse_turn_puts_full_magnitude_on_the_turn_side() {
        // Nose-right in reverse: the right wheel runs the full arc.
        let (left, right) = mix(30.0, -50.0);
        let cap = libm::sqrtf(30.0 * 30.0 + 50.0 * 50.0);
        assert!((right + cap).abs() < 1e-4);
        assert!(left < 0.0 && left.abs() < cap);
    }

    #[test]
    fn mirroring_rotation_swaps_sides() {
        for &(x, y) in &[(30.0, 50.0), (80.0, 20.0), (45.0, -60.0)] {
            let (left, right) = mix(x, y);
            assert_close(mix(-x, y), (right, left));
        }
    }

    #[test]
    fn reversing_forward_intent_negates_and_mirrors() {
        for &(x, y) in &[(30.0, 50.0), (80.0, 20.0), (0.0, 40.0)] {
            let (left, right) = mix(x, y);
            assert_close(mix(x, -y), (-right, -left));
            assert_close(mix(-x, -y), (-left, -right));
        }
    }
}
