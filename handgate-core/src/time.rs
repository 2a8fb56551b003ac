//! Monotonic tick timestamps

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Monotonic clock reading in milliseconds, supplied by the caller each tick
///
/// The origin is arbitrary; only differences between readings matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Instant {
    ms: u64,
}

impl Instant {
    pub const fn from_millis(ms: u64) -> Self {
        Self { ms }
    }

    pub const fn as_millis(self) -> u64 {
        self.ms
    }

    /// Reading `delta_ms` later than this one
    pub const fn saturating_add_ms(self, delta_ms: u64) -> Self {
        Self {
            ms: self.ms.saturating_add(delta_ms),
        }
    }

    /// Milliseconds elapsed since `earlier` (0 if `earlier` is in the future)
    pub const fn millis_since(self, earlier: Instant) -> u64 {
        self.ms.saturating_sub(earlier.ms)
    }
}
