//! Rig loader
//!
//! Parses a TOML rig description (swipe tuning, named targets, an ordered
//! list of named detectors) into a ready-to-tick [`GestureHub`]. Names are
//! resolved here; the core only ever sees [`TargetId`]s and
//! [`DetectorId`]s.

mod rig;

use std::collections::BTreeMap;
use std::fmt;

use handgate_core::board::{BoardError, DetectorKind, MAX_TARGETS};
use handgate_core::config::{
    ConfigError, GateConfig, GrabConfig, SignalConfig, StrokeConfig, TouchConfig, ZoneConfig,
};
use handgate_core::detector::{
    ExternalSignal, ProximityGrabDetector, StrokeDetector, TargetId, TouchDetector, ZoneDetector,
};
use handgate_core::{DetectorId, GestureHub, LogicGate};

use rig::{GateEntry, GrabEntry, RigFile, SignalEntry, StrokeEntry, TouchEntry, ZoneEntry};

/// Rig loading errors
#[derive(Debug)]
pub enum LoadError {
    /// Malformed TOML, or a table that does not match its kind
    Toml(toml::de::Error),
    /// A value failed validation
    Config(ConfigError),
    /// The board rejected a detector or target
    Board(BoardError),
    /// Detector table without a required string key
    MissingField(&'static str),
    /// `kind` is not a known detector kind
    UnknownKind(String),
    /// Reference to a target that was not declared
    UnknownTarget(String),
    /// Gate member that is not declared before the gate
    UnknownDetector(String),
    /// Target or detector name used twice
    DuplicateName(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Toml(e) => write!(f, "invalid rig: {e}"),
            LoadError::Config(e) => write!(f, "invalid configuration: {e:?}"),
            LoadError::Board(e) => write!(f, "detector board: {e:?}"),
            LoadError::MissingField(key) => write!(f, "detector without `{key}`"),
            LoadError::UnknownKind(kind) => write!(f, "unknown detector kind `{kind}`"),
            LoadError::UnknownTarget(name) => write!(f, "unknown target `{name}`"),
            LoadError::UnknownDetector(name) => {
                write!(f, "gate member `{name}` is not declared before the gate")
            }
            LoadError::DuplicateName(name) => write!(f, "name `{name}` used twice"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Toml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for LoadError {
    fn from(e: toml::de::Error) -> Self {
        LoadError::Toml(e)
    }
}

impl From<ConfigError> for LoadError {
    fn from(e: ConfigError) -> Self {
        LoadError::Config(e)
    }
}

impl From<BoardError> for LoadError {
    fn from(e: BoardError) -> Self {
        LoadError::Board(e)
    }
}

/// A loaded rig: the hub plus the name tables needed to drive it
#[derive(Debug)]
pub struct Rig {
    pub hub: GestureHub,
    targets: BTreeMap<String, TargetId>,
    detectors: BTreeMap<String, DetectorId>,
}

impl Rig {
    /// Id to use with [`handgate_core::Scene::set`]
    pub fn target(&self, name: &str) -> Option<TargetId> {
        self.targets.get(name).copied()
    }

    /// Id of a named detector, e.g. for [`handgate_core::DetectorBoard::signal_mut`]
    pub fn detector(&self, name: &str) -> Option<DetectorId> {
        self.detectors.get(name).copied()
    }

    /// Reverse lookup, for labelling events
    pub fn detector_name(&self, id: DetectorId) -> Option<&str> {
        self.detectors
            .iter()
            .find(|(_, d)| **d == id)
            .map(|(name, _)| name.as_str())
    }

    pub fn into_hub(self) -> GestureHub {
        self.hub
    }
}

/// Parse a rig description
pub fn load_rig(input: &str) -> Result<Rig, LoadError> {
    let file: RigFile = toml::from_str(input)?;
    let mut hub = GestureHub::new(file.swipe)?;

    let mut targets = BTreeMap::new();
    for (index, entry) in file.target.into_iter().enumerate() {
        if index >= MAX_TARGETS {
            return Err(BoardError::SceneFull.into());
        }
        let id = index as TargetId;
        if let Some(position) = entry.position {
            hub.scene_mut().set(id, position)?;
        }
        if targets.insert(entry.name.clone(), id).is_some() {
            return Err(LoadError::DuplicateName(entry.name));
        }
    }

    let mut detectors = BTreeMap::new();
    for table in file.detector {
        let (name, detector) = build_detector(table, &targets, &detectors)?;
        if detectors.contains_key(&name) {
            return Err(LoadError::DuplicateName(name));
        }
        let id = hub.board_mut().add(detector)?;
        detectors.insert(name, id);
    }

    Ok(Rig {
        hub,
        targets,
        detectors,
    })
}

/// Parse a rig description, dropping the name tables
pub fn load_hub(input: &str) -> Result<GestureHub, LoadError> {
    load_rig(input).map(Rig::into_hub)
}

fn build_detector(
    mut table: toml::Table,
    targets: &BTreeMap<String, TargetId>,
    detectors: &BTreeMap<String, DetectorId>,
) -> Result<(String, DetectorKind), LoadError> {
    let name = take_string(&mut table, "name")?;
    let kind = take_string(&mut table, "kind")?;
    let body = toml::Value::Table(table);
    let target = |name: &str| {
        targets
            .get(name)
            .copied()
            .ok_or_else(|| LoadError::UnknownTarget(name.to_string()))
    };

    let detector = match kind.as_str() {
        "grab" => {
            let entry: GrabEntry = body.try_into()?;
            let mut config = GrabConfig::default();
            if let Some(strength) = entry.strength {
                config.strength = strength;
            }
            if let Some(proximity) = entry.proximity_m {
                config.proximity_m = proximity;
            }
            if let Some(hand) = entry.hand {
                config.hand = hand;
            }
            config.lost_debounce_ms = entry.lost_debounce_ms;
            DetectorKind::Grab(ProximityGrabDetector::new(target(&entry.target)?, config)?)
        }
        "zone" => {
            let entry: ZoneEntry = body.try_into()?;
            let mut config = ZoneConfig::new(target(&entry.anchor)?);
            if let Some(size) = entry.size {
                config.size = size;
            }
            if let Some(point) = entry.point {
                config.point = point;
            }
            DetectorKind::Zone(ZoneDetector::new(config)?)
        }
        "stroke" => {
            let entry: StrokeEntry = body.try_into()?;
            let mut config = StrokeConfig::new(target(&entry.anchor)?);
            if let Some(size) = entry.size {
                config.zone.size = size;
            }
            if let Some(point) = entry.point {
                config.zone.point = point;
            }
            if let Some(direction) = entry.required_direction {
                config.required_direction = direction;
            }
            if let Some(threshold) = entry.direction_threshold {
                config.direction_threshold = threshold;
            }
            if let Some(interval) = entry.check_interval_ms {
                config.check_interval_ms = interval;
            }
            DetectorKind::Stroke(StrokeDetector::new(config)?)
        }
        "touch" => {
            let entry: TouchEntry = body.try_into()?;
            let mut config = TouchConfig::new(target(&entry.anchor)?);
            if let Some(distance) = entry.activation_distance_m {
                config.activation_distance_m = distance;
            }
            if let Some(cooldown) = entry.cooldown_ms {
                config.cooldown_ms = cooldown;
            }
            DetectorKind::Touch(TouchDetector::new(config)?)
        }
        "signal" => {
            let entry: SignalEntry = body.try_into()?;
            DetectorKind::Signal(ExternalSignal::new(SignalConfig {
                lost_debounce_ms: entry.lost_debounce_ms,
            }))
        }
        "gate" => {
            let entry: GateEntry = body.try_into()?;
            let members = entry
                .members
                .iter()
                .map(|member| {
                    detectors
                        .get(member)
                        .copied()
                        .ok_or_else(|| LoadError::UnknownDetector(member.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            let config = GateConfig::new(entry.op, entry.negate, &members)?;
            DetectorKind::Gate(LogicGate::new(config)?)
        }
        _ => return Err(LoadError::UnknownKind(kind)),
    };

    Ok((name, detector))
}

fn take_string(table: &mut toml::Table, key: &'static str) -> Result<String, LoadError> {
    match table.remove(key) {
        Some(toml::Value::String(value)) => Ok(value),
        _ => Err(LoadError::MissingField(key)),
    }
}
