//! Two-threshold activate/deactivate gate
//!
//! Same band logic a bang-bang heater uses: switch on at or above the
//! activate threshold, off at or below the deactivate threshold, and hold
//! the current state in between so a noisy value near one boundary does
//! not chatter.

use crate::config::{ConfigError, HysteresisConfig};

/// State change produced by one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// No change
    None,
    /// Inactive -> active
    Started,
    /// Active -> inactive
    Ended,
}

impl Edge {
    /// Edge between two boolean states
    pub fn between(was_active: bool, is_active: bool) -> Self {
        match (was_active, is_active) {
            (false, true) => Edge::Started,
            (true, false) => Edge::Ended,
            _ => Edge::None,
        }
    }
}

/// Pure band evaluation: `(value, previous) -> (next, edge)`
pub fn evaluate(config: &HysteresisConfig, value: f32, was_active: bool) -> (bool, Edge) {
    let active = if value >= config.activate {
        true
    } else if value <= config.deactivate {
        false
    } else {
        // Dead zone: hold
        was_active
    };
    (active, Edge::between(was_active, active))
}

/// Stateful hysteresis gate
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hysteresis {
    config: HysteresisConfig,
    active: bool,
}

impl Hysteresis {
    /// Create an inactive gate; rejects inverted or out-of-range bands
    pub fn new(config: HysteresisConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            active: false,
        })
    }

    pub fn config(&self) -> &HysteresisConfig {
        &self.config
    }

    /// Feed one value
    pub fn update(&mut self, value: f32) -> Edge {
        let (active, edge) = evaluate(&self.config, value, self.active);
        self.active = active;
        edge
    }

    /// Drop to inactive regardless of thresholds (e.g. input lost)
    pub fn force_inactive(&mut self) -> Edge {
        let edge = Edge::between(self.active, false);
        self.active = false;
        edge
    }

    /// Forget the current state without reporting an edge
    pub fn reset(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
