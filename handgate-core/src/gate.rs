//! Detector logic gate
//!
//! Folds the state of its member detectors with AND or OR, optionally
//! negates the result, and reports a transition only when the combined
//! value changes. A gate is itself a [`Detector`], so gates nest.
//!
//! The combined value starts out `false`. A gate whose first evaluation
//! yields `true` (e.g. a negated OR over idle members) therefore reports an
//! activation on its first update.

use crate::config::{ConfigError, GateConfig, GateKind};
use crate::detector::{Detector, DetectorId, DetectorSource};
use crate::events::GateTransition;

#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LogicGate {
    config: GateConfig,
    active: bool,
}

impl LogicGate {
    /// Create a gate; empty member lists are rejected
    pub fn new(config: GateConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            active: false,
        })
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn members(&self) -> &[DetectorId] {
        &self.config.members
    }

    /// Fold the members' current states, without touching gate state
    pub fn combine<S: DetectorSource + ?Sized>(&self, source: &S) -> bool {
        let mut states = self
            .config
            .members
            .iter()
            .map(|id| source.is_detector_active(*id));

        let folded = match self.config.kind {
            GateKind::And => states.all(|active| active),
            GateKind::Or => states.any(|active| active),
        };
        folded != self.config.negate
    }

    /// Evaluate one tick; returns the transition if the output changed
    pub fn update<S: DetectorSource + ?Sized>(&mut self, source: &S) -> Option<GateTransition> {
        let combined = self.combine(source);
        if combined == self.active {
            return None;
        }
        self.active = combined;
        Some(GateTransition::into_state(combined))
    }

    /// Return to the initial (inactive) output without reporting
    pub fn reset(&mut self) {
        self.active = false;
    }
}

impl Detector for LogicGate {
    fn is_active(&self) -> bool {
        self.active
    }
}
