//! Fixed control thresholds and the two-level speed policy
//!
//! The convergence band is asymmetric: the force may sit at most 0.5 N
//! above or below the target, and never more than 1.0 N above it.

use crate::safety::AbortReason;

/// Control tick cadence in milliseconds
pub const SAMPLE_INTERVAL_MS: u64 = 10;

/// Maximum force error magnitude for convergence, in newtons
pub const CONVERGE_BAND_N: f32 = 0.5;

/// Most negative force error (overshoot) accepted as converged, in newtons
pub const CONVERGE_FLOOR_N: f32 = -1.0;

/// Error magnitude above which the medium speed is used, in newtons
pub const SPEED_TIER_N: f32 = 3.0;

/// Closing speed selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpeedTier {
    Medium,
    Slow,
}

/// Result of one move tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MoveOutcome {
    /// Keep closing (or no decision this pass)
    Continue,
    /// Force is inside the target band
    Converged,
    /// Safety monitor tripped
    Aborted(AbortReason),
}

/// Speed tier for a force error (`target - current`)
pub fn speed_tier(error: f32) -> SpeedTier {
    if error.abs() > SPEED_TIER_N {
        SpeedTier::Medium
    } else {
        SpeedTier::Slow
    }
}

/// Check if a force error is inside the convergence band
pub fn is_converged(error: f32) -> bool {
    error.abs() <= CONVERGE_BAND_N && error >= CONVERGE_FLOOR_N
}

/// Closing speed tier for a fresh force reading, or `None` once converged
pub fn evaluate_force(target_newtons: f32, force_newtons: f32) -> Option<SpeedTier> {
    let error = target_newtons - force_newtons;
    if is_converged(error) {
        return None;
    }
    Some(speed_tier(error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_band_edges() {
        assert!(is_converged(0.5));
        assert!(is_converged(-0.5));
        assert!(is_converged(0.0));
        assert!(!is_converged(0.51));
        assert!(!is_converged(-0.51));
    }

    #[test]
    fn test_tier_boundary() {
        assert_eq!(speed_tier(3.0), SpeedTier::Slow);
        assert_eq!(speed_tier(3.01), SpeedTier::Medium);
        assert_eq!(speed_tier(-3.01), SpeedTier::Medium);
        assert_eq!(speed_tier(1.0), SpeedTier::Slow);
    }

    #[test]
    fn test_evaluate_force() {
        assert_eq!(evaluate_force(12.0, 11.8), None);
        assert_eq!(evaluate_force(12.0, 2.0), Some(SpeedTier::Medium));
        assert_eq!(evaluate_force(12.0, 10.0), Some(SpeedTier::Slow));
        // Overshoot beyond the band keeps the slow closing speed
        assert_eq!(evaluate_force(12.0, 13.0), Some(SpeedTier::Slow));
    }

    proptest! {
        #[test]
        fn prop_converged_implies_band(target in -5.0f32..40.0, force in -5.0f32..40.0) {
            let error = target - force;
            if evaluate_force(target, force).is_none() {
                prop_assert!(error.abs() <= CONVERGE_BAND_N);
                prop_assert!(error >= CONVERGE_FLOOR_N);
            } else {
                prop_assert!(error.abs() > CONVERGE_BAND_N);
            }
        }

        #[test]
        fn prop_far_errors_use_medium(error in 3.001f32..100.0, negative in any::<bool>()) {
            let error = if negative { -error } else { error };
            prop_assert_eq!(speed_tier(error), SpeedTier::Medium);
        }
    }
}
