//! On-disk rig layout
//!
//! ```toml
//! [swipe]
//! distance_threshold_m = 0.05
//!
//! [[target]]
//! name = "jar"
//! position = { x = 0.0, y = 1.0, z = 0.4 }
//!
//! [[detector]]
//! name = "jar_grab"
//! kind = "grab"
//! target = "jar"
//! ```
//!
//! Detector tables are decoded in two steps: `name` and `kind` first, then
//! the rest of the table as the body for that kind.

use serde::Deserialize;

use handgate_core::config::{GateKind, HandPoint, HandSelector, HysteresisConfig, SwipeConfig};
use handgate_core::Vec3;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RigFile {
    #[serde(default)]
    pub swipe: SwipeConfig,
    #[serde(default)]
    pub target: Vec<TargetEntry>,
    #[serde(default)]
    pub detector: Vec<toml::Table>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TargetEntry {
    pub name: String,
    /// Initial position; targets without one are out of reach until placed
    pub position: Option<Vec3>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct GrabEntry {
    pub target: String,
    pub strength: Option<HysteresisConfig>,
    pub proximity_m: Option<f32>,
    pub hand: Option<HandSelector>,
    pub lost_debounce_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ZoneEntry {
    pub anchor: String,
    pub size: Option<Vec3>,
    pub point: Option<HandPoint>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct StrokeEntry {
    pub anchor: String,
    pub size: Option<Vec3>,
    pub point: Option<HandPoint>,
    pub required_direction: Option<Vec3>,
    pub direction_threshold: Option<f32>,
    pub check_interval_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TouchEntry {
    pub anchor: String,
    pub activation_distance_m: Option<f32>,
    pub cooldown_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SignalEntry {
    pub lost_debounce_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct GateEntry {
    pub op: GateKind,
    #[serde(default)]
    pub negate: bool,
    pub members: Vec<String>,
}
