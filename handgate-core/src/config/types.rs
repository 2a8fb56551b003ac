//! Configuration type definitions

use heapless::Vec;

use super::{check_distance, check_range, check_unit, ConfigError};
use crate::detector::{DetectorId, TargetId};
use crate::frame::{Chirality, HandSample};
use crate::math::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum members of a single logic gate
pub const MAX_GATE_MEMBERS: usize = 8;

/// Two-threshold activate/deactivate band
///
/// Values at or above `activate` switch on, values at or below `deactivate`
/// switch off, anything in between keeps the previous state.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HysteresisConfig {
    pub activate: f32,
    pub deactivate: f32,
}

impl Default for HysteresisConfig {
    fn default() -> Self {
        Self {
            activate: 0.8,
            deactivate: 0.6,
        }
    }
}

impl HysteresisConfig {
    /// Create a validated band
    pub fn new(activate: f32, deactivate: f32) -> Result<Self, ConfigError> {
        let config = Self {
            activate,
            deactivate,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit(self.activate)?;
        check_unit(self.deactivate)?;
        if self.deactivate > self.activate {
            return Err(ConfigError::InvertedThresholds);
        }
        Ok(())
    }
}

/// Swipe tracker tuning
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SwipeConfig {
    /// Minimum fingertip travel for a swipe (m)
    pub distance_threshold_m: f32,
    /// Maximum duration of a swipe (ms)
    pub time_limit_ms: u64,
    /// Global quiet period after any swipe (ms)
    pub cooldown_ms: u64,
    /// Minimum dominant-axis share of the unit displacement, x axis
    pub horizontal_threshold: f32,
    /// Same, y axis
    pub vertical_threshold: f32,
    /// Same, z axis
    pub depth_threshold: f32,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            distance_threshold_m: 0.05,
            time_limit_ms: 500,
            cooldown_ms: 300,
            horizontal_threshold: 0.7,
            vertical_threshold: 0.7,
            depth_threshold: 0.5,
        }
    }
}

impl SwipeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_distance(self.distance_threshold_m)?;
        check_unit(self.horizontal_threshold)?;
        check_unit(self.vertical_threshold)?;
        check_unit(self.depth_threshold)?;
        Ok(())
    }
}

/// Which tracked hand a single-hand detector follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HandSelector {
    Left,
    Right,
    /// Keep following the current hand while it stays tracked, otherwise
    /// take the first hand of the frame
    #[default]
    Any,
}

impl HandSelector {
    pub fn chirality(self) -> Option<Chirality> {
        match self {
            HandSelector::Left => Some(Chirality::Left),
            HandSelector::Right => Some(Chirality::Right),
            HandSelector::Any => None,
        }
    }
}

/// Proximity grab detector tuning
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GrabConfig {
    /// Grab strength band
    pub strength: HysteresisConfig,
    /// Palm-to-target distance below which a grab counts as on target (m)
    pub proximity_m: f32,
    /// Hand to follow
    pub hand: HandSelector,
    /// Delay before reporting a lost grab (ms); `None` disables the signal
    pub lost_debounce_ms: Option<u64>,
}

impl Default for GrabConfig {
    fn default() -> Self {
        Self {
            strength: HysteresisConfig::default(),
            proximity_m: 0.1,
            hand: HandSelector::Any,
            lost_debounce_ms: None,
        }
    }
}

impl GrabConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.strength.validate()?;
        check_distance(self.proximity_m)
    }

    /// Enable the debounced lost signal
    pub fn with_lost_debounce(mut self, ms: u64) -> Self {
        self.lost_debounce_ms = Some(ms);
        self
    }
}

/// Point of a hand used for zone tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HandPoint {
    #[default]
    Palm,
    IndexTip,
}

impl HandPoint {
    /// Position of this point on `hand`, if tracked
    pub fn of(self, hand: &HandSample) -> Option<Vec3> {
        match self {
            HandPoint::Palm => Some(hand.palm_position),
            HandPoint::IndexTip => hand.index_tip,
        }
    }
}

/// Axis-aligned box centered on an anchor target
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ZoneConfig {
    /// Target whose position is the box center
    pub anchor: TargetId,
    /// Full box extent per axis (m)
    #[cfg_attr(feature = "serde", serde(default = "default_zone_size"))]
    pub size: Vec3,
    /// Hand point that must lie inside
    #[cfg_attr(feature = "serde", serde(default))]
    pub point: HandPoint,
}

#[cfg(feature = "serde")]
fn default_zone_size() -> Vec3 {
    ZoneConfig::DEFAULT_SIZE
}

impl ZoneConfig {
    pub const DEFAULT_SIZE: Vec3 = Vec3::new(0.1, 0.05, 0.1);

    pub const fn new(anchor: TargetId) -> Self {
        Self {
            anchor,
            size: Self::DEFAULT_SIZE,
            point: HandPoint::Palm,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_distance(self.size.x)?;
        check_distance(self.size.y)?;
        check_distance(self.size.z)
    }
}

/// Directional stroke detector tuning
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StrokeConfig {
    /// Region the fingertip has to move within
    pub zone: ZoneConfig,
    /// Expected direction of movement (need not be unit length)
    #[cfg_attr(feature = "serde", serde(default = "default_stroke_direction"))]
    pub required_direction: Vec3,
    /// Minimum cosine between actual and expected movement
    #[cfg_attr(feature = "serde", serde(default = "default_stroke_threshold"))]
    pub direction_threshold: f32,
    /// Sampling period (ms)
    #[cfg_attr(feature = "serde", serde(default = "default_stroke_interval"))]
    pub check_interval_ms: u64,
}

#[cfg(feature = "serde")]
fn default_stroke_direction() -> Vec3 {
    Vec3::UP
}

#[cfg(feature = "serde")]
fn default_stroke_threshold() -> f32 {
    0.7
}

#[cfg(feature = "serde")]
fn default_stroke_interval() -> u64 {
    100
}

impl StrokeConfig {
    pub const fn new(anchor: TargetId) -> Self {
        Self {
            zone: ZoneConfig {
                anchor,
                size: ZoneConfig::DEFAULT_SIZE,
                point: HandPoint::IndexTip,
            },
            required_direction: Vec3::UP,
            direction_threshold: 0.7,
            check_interval_ms: 100,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.zone.validate()?;
        if !self.required_direction.is_finite() {
            return Err(ConfigError::NonFiniteValue);
        }
        if self.required_direction.length_squared() == 0.0 {
            return Err(ConfigError::ZeroDirection);
        }
        check_range(self.direction_threshold, -1.0, 1.0)?;
        if self.check_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }
}

/// Fingertip touch detector tuning
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TouchConfig {
    /// Target the fingertip has to touch
    pub anchor: TargetId,
    /// Fingertip-to-anchor distance that counts as a touch (m)
    #[cfg_attr(feature = "serde", serde(default = "default_touch_distance"))]
    pub activation_distance_m: f32,
    /// State is frozen for this long after each activation (ms)
    #[cfg_attr(feature = "serde", serde(default = "default_touch_cooldown"))]
    pub cooldown_ms: u64,
}

#[cfg(feature = "serde")]
fn default_touch_distance() -> f32 {
    0.02
}

#[cfg(feature = "serde")]
fn default_touch_cooldown() -> u64 {
    500
}

impl TouchConfig {
    pub const fn new(anchor: TargetId) -> Self {
        Self {
            anchor,
            activation_distance_m: 0.02,
            cooldown_ms: 500,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_distance(self.activation_distance_m)
    }
}

/// Host-driven boolean signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SignalConfig {
    /// A drop shorter than this (ms) never deactivates the signal
    pub lost_debounce_ms: Option<u64>,
}

/// Fold applied by a logic gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum GateKind {
    #[default]
    And,
    Or,
}

/// Logic gate definition
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GateConfig {
    pub kind: GateKind,
    /// Invert the folded result
    pub negate: bool,
    /// Member detectors, in evaluation order
    pub members: Vec<DetectorId, MAX_GATE_MEMBERS>,
}

impl GateConfig {
    /// Build a gate definition from a member list
    pub fn new(kind: GateKind, negate: bool, members: &[DetectorId]) -> Result<Self, ConfigError> {
        let members = Vec::from_slice(members).map_err(|_| ConfigError::TooManyMembers)?;
        let config = Self {
            kind,
            negate,
            members,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.members.is_empty() {
            return Err(ConfigError::EmptyGate);
        }
        Ok(())
    }
}
