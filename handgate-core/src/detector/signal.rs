//! Host-driven boolean detector
//!
//! Wraps a condition computed outside the core (a pose recognizer, a UI
//! toggle) so it can take part in logic gates. With a lost-debounce, a drop
//! shorter than the debounce never reaches the gates.

use super::Detector;
use crate::config::SignalConfig;
use crate::hysteresis::Edge;
use crate::time::Instant;

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ExternalSignal {
    config: SignalConfig,
    raw: bool,
    active: bool,
    drop_deadline: Option<Instant>,
}

impl ExternalSignal {
    pub fn new(config: SignalConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Report the raw condition; takes effect on the next update
    pub fn set(&mut self, value: bool) {
        self.raw = value;
    }

    pub fn raw(&self) -> bool {
        self.raw
    }

    pub fn update(&mut self, now: Instant) -> Edge {
        let active = if self.raw {
            self.drop_deadline = None;
            true
        } else if self.active {
            match self.config.lost_debounce_ms {
                None => false,
                Some(delay) => {
                    let deadline = *self
                        .drop_deadline
                        .get_or_insert(now.saturating_add_ms(delay));
                    now < deadline
                }
            }
        } else {
            false
        };

        if !active {
            self.drop_deadline = None;
        }
        let edge = Edge::between(self.active, active);
        self.active = active;
        edge
    }

    pub fn reset(&mut self) {
        self.raw = false;
        self.active = false;
        self.drop_deadline = None;
    }
}

impl Detector for ExternalSignal {
    fn is_active(&self) -> bool {
        self.active
    }
}
