//! Hand-in-zone detector

use super::Detector;
use crate::config::{ConfigError, ZoneConfig};
use crate::frame::Frame;
use crate::hysteresis::Edge;
use crate::math::Vec3;

/// Active while any hand's configured point lies inside a box around the
/// anchor (bounds inclusive)
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ZoneDetector {
    config: ZoneConfig,
    active: bool,
}

impl ZoneDetector {
    pub fn new(config: ZoneConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            active: false,
        })
    }

    pub fn config(&self) -> &ZoneConfig {
        &self.config
    }

    /// True if `point` is inside the zone centered on `center`
    pub fn contains(&self, center: Vec3, point: Vec3) -> bool {
        contains(&self.config, center, point)
    }

    /// Evaluate one tick; a missing anchor means no hand can be inside
    pub fn update(&mut self, frame: &Frame, anchor_position: Option<Vec3>) -> Edge {
        let inside = anchor_position.is_some_and(|center| {
            frame
                .hands()
                .iter()
                .filter_map(|hand| self.config.point.of(hand))
                .any(|point| self.contains(center, point))
        });
        let edge = Edge::between(self.active, inside);
        self.active = inside;
        edge
    }

    pub fn reset(&mut self) {
        self.active = false;
    }
}

/// Box test shared with the stroke detector
pub(crate) fn contains(config: &ZoneConfig, center: Vec3, point: Vec3) -> bool {
    let offset = (point - center).abs();
    offset.x <= config.size.x / 2.0
        && offset.y <= config.size.y / 2.0
        && offset.z <= config.size.z / 2.0
}

impl Detector for ZoneDetector {
    fn is_active(&self) -> bool {
        self.active
    }
}
