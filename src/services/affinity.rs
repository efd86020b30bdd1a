//! Relationship affinity adjustment.
//!
//! A single interaction may shift the affinity between two actors by at
//! most [`MAX_AFFINITY_SHIFT`] in either direction.

/// Maximum magnitude of an affinity change per interaction.
pub const MAX_AFFINITY_SHIFT: f64 = 0.03;

/// Clamp a proposed affinity delta into `[-MAX_AFFINITY_SHIFT, MAX_AFFINITY_SHIFT]`.
///
/// Non-finite input clamps to zero.
pub fn clamp_affinity_delta(delta: f64) -> f64 {
    if !delta.is_finite() {
        return 0.0;
    }
    delta.clamp(-MAX_AFFINITY_SHIFT, MAX_AFFINITY_SHIFT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_identity_inside_band() {
        assert!((clamp_affinity_delta(0.01) - 0.01).abs() < f64::EPSILON);
        assert!((clamp_affinity_delta(-0.03) - (-0.03)).abs() < f64::EPSILON);
        assert!(clamp_affinity_delta(0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_saturates_outside_band() {
        assert!((clamp_affinity_delta(0.05) - 0.03).abs() < f64::EPSILON);
        assert!((clamp_affinity_delta(-0.10) - (-0.03)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_non_finite_clamps_to_zero() {
        assert_eq!(clamp_affinity_delta(f64::NAN), 0.0);
        assert_eq!(clamp_affinity_delta(f64::INFINITY), 0.0);
        assert_eq!(clamp_affinity_delta(f64::NEG_INFINITY), 0.0);
    }

    proptest! {
        #[test]
        fn prop_result_always_in_band(delta in -1000.0f64..1000.0) {
            let clamped = clamp_affinity_delta(delta);
            prop_assert!((-MAX_AFFINITY_SHIFT..=MAX_AFFINITY_SHIFT).contains(&clamped));
        }

        #[test]
        fn prop_identity_when_small(delta in -MAX_AFFINITY_SHIFT..=MAX_AFFINITY_SHIFT) {
            prop_assert_eq!(clamp_affinity_delta(delta), delta);
        }
    }
}
