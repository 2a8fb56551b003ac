//! Boolean detectors
//!
//! Every detector that can feed a logic gate exposes one capability:
//! [`Detector::is_active`]. Gates refer to their members by [`DetectorId`]
//! and read them through a [`DetectorSource`], so a gate never owns or
//! aliases the detectors it combines.

pub mod grab;
pub mod signal;
pub mod stroke;
pub mod touch;
pub mod zone;

pub use grab::{GrabEvents, ProximityGrabDetector};
pub use signal::ExternalSignal;
pub use stroke::StrokeDetector;
pub use touch::TouchDetector;
pub use zone::ZoneDetector;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of a scene object detectors can refer to (grab target,
/// zone anchor)
pub type TargetId = u16;

/// Index of a detector on a [`crate::board::DetectorBoard`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetectorId(pub u8);

impl DetectorId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Boolean query capability shared by all detectors
pub trait Detector {
    /// Current state, as of the last update
    fn is_active(&self) -> bool;
}

/// Lookup of detector states by id
pub trait DetectorSource {
    /// State of detector `id`; unknown ids read as inactive
    fn is_detector_active(&self, id: DetectorId) -> bool;
}

impl<'a> DetectorSource for [&'a dyn Detector] {
    fn is_detector_active(&self, id: DetectorId) -> bool {
        self.get(id.index()).is_some_and(|d| d.is_active())
    }
}

impl DetectorSource for [bool] {
    fn is_detector_active(&self, id: DetectorId) -> bool {
        self.get(id.index()).copied().unwrap_or(false)
    }
}

/// Open/closed boolean set directly by its owner
impl Detector for bool {
    fn is_active(&self) -> bool {
        *self
    }
}
