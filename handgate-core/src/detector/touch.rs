//! Fingertip touch detector

use super::Detector;
use crate::config::{ConfigError, TouchConfig};
use crate::frame::Frame;
use crate::hysteresis::Edge;
use crate::math::Vec3;
use crate::time::Instant;

/// Active while any index fingertip is within reach of the anchor
///
/// Each activation freezes the state for `cooldown_ms`, so a fingertip
/// jittering on the boundary produces one press rather than a burst.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchDetector {
    config: TouchConfig,
    active: bool,
    frozen_until: Option<Instant>,
}

impl TouchDetector {
    pub fn new(config: TouchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            active: false,
            frozen_until: None,
        })
    }

    pub fn config(&self) -> &TouchConfig {
        &self.config
    }

    pub fn update(&mut self, frame: &Frame, anchor_position: Option<Vec3>, now: Instant) -> Edge {
        if self.frozen_until.is_some_and(|until| now < until) {
            return Edge::None;
        }

        let touching = anchor_position.is_some_and(|anchor| {
            frame
                .hands()
                .iter()
                .filter_map(|hand| hand.index_tip)
                .any(|tip| tip.within(anchor, self.config.activation_distance_m))
        });

        let edge = Edge::between(self.active, touching);
        self.active = touching;
        if edge == Edge::Started {
            self.frozen_until = Some(now.saturating_add_ms(self.config.cooldown_ms));
        }
        edge
    }

    pub fn reset(&mut self) {
        self.active = false;
        self.frozen_until = None;
    }
}

impl Detector for TouchDetector {
    fn is_active(&self) -> bool {
        self.active
    }
}
