//! Detector configuration
//!
//! Plain configuration structs with defaults matching the tuned values of
//! the original rig. Every detector validates its configuration when it is
//! constructed; a bad threshold is rejected up front instead of producing
//! an oscillating or stuck detector at runtime.

pub mod types;

pub use types::*;

/// Configuration errors, raised at construction time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A normalized threshold lies outside its allowed range
    ThresholdOutOfRange,
    /// Deactivate threshold is above the activate threshold
    InvertedThresholds,
    /// A distance or size is negative
    NegativeDistance,
    /// A value is NaN or infinite
    NonFiniteValue,
    /// A direction vector has zero length
    ZeroDirection,
    /// A sampling interval of zero
    ZeroInterval,
    /// Logic gate without members
    EmptyGate,
    /// Logic gate with more than [`MAX_GATE_MEMBERS`] members
    TooManyMembers,
}

/// Check a value against an inclusive range
pub(crate) fn check_range(value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFiniteValue);
    }
    if value < min || value > max {
        return Err(ConfigError::ThresholdOutOfRange);
    }
    Ok(())
}

/// Check a normalized threshold in `[0, 1]`
pub(crate) fn check_unit(value: f32) -> Result<(), ConfigError> {
    check_range(value, 0.0, 1.0)
}

/// Check a non-negative distance in meters
pub(crate) fn check_distance(value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFiniteValue);
    }
    if value < 0.0 {
        return Err(ConfigError::NegativeDistance);
    }
    Ok(())
}
