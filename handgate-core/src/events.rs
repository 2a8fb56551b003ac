//! Events produced by the detectors

use crate::detector::{DetectorId, TargetId};
use crate::frame::HandId;
use crate::math::Vec3;
use crate::swipe::SwipeDirection;

/// A completed swipe
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SwipeEvent {
    pub direction: SwipeDirection,
    pub hand: HandId,
    /// Fingertip where tracking started
    pub start: Vec3,
    /// Fingertip when the distance threshold was crossed
    pub end: Vec3,
}

/// Kind of grab notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GrabEventKind {
    /// Grab strength crossed the activate threshold
    GeneralStart,
    /// Grab released, or the hand was lost
    GeneralEnd,
    /// Grabbing while in reach of the target
    SpecificStart,
    /// No longer grabbing the target
    SpecificEnd,
    /// The target grab stayed released for the whole debounce period
    Lost,
}

impl GrabEventKind {
    pub fn is_start(&self) -> bool {
        matches!(self, GrabEventKind::GeneralStart | GrabEventKind::SpecificStart)
    }

    pub fn is_specific(&self) -> bool {
        matches!(
            self,
            GrabEventKind::SpecificStart | GrabEventKind::SpecificEnd | GrabEventKind::Lost
        )
    }
}

/// Grab notification for one target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GrabEvent {
    pub target: TargetId,
    pub kind: GrabEventKind,
    /// Hand involved; `None` when the hand stopped being tracked
    pub hand: Option<HandId>,
}

/// Logic gate output change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GateTransition {
    Activated,
    Deactivated,
}

impl GateTransition {
    /// Transition into `active`
    pub fn into_state(active: bool) -> Self {
        if active {
            GateTransition::Activated
        } else {
            GateTransition::Deactivated
        }
    }
}

/// Gate output change, tagged with the gate that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GateEvent {
    pub gate: DetectorId,
    pub transition: GateTransition,
}

/// Fingertip touch on an anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchEvent {
    Activated { detector: DetectorId, anchor: TargetId },
    Deactivated { detector: DetectorId, anchor: TargetId },
}
