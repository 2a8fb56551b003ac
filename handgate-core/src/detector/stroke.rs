//! Directional stroke detector
//!
//! Samples the index fingertip at a fixed interval and reports whether it
//! moved roughly along the required direction while inside a zone, e.g. an
//! upward stroke under the eye.

use super::zone::contains;
use super::Detector;
use crate::config::{ConfigError, StrokeConfig};
use crate::frame::Frame;
use crate::hysteresis::Edge;
use crate::math::Vec3;
use crate::time::Instant;

#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StrokeDetector {
    config: StrokeConfig,
    previous_tip: Option<Vec3>,
    next_sample: Option<Instant>,
    active: bool,
}

impl StrokeDetector {
    pub fn new(config: StrokeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            previous_tip: None,
            next_sample: None,
            active: false,
        })
    }

    pub fn config(&self) -> &StrokeConfig {
        &self.config
    }

    /// Evaluate one tick
    ///
    /// Between sampling instants the state is held. The fingertip followed
    /// is the first one tracked in the frame.
    pub fn update(&mut self, frame: &Frame, anchor_position: Option<Vec3>, now: Instant) -> Edge {
        if self.next_sample.is_some_and(|next| now < next) {
            return Edge::None;
        }
        self.next_sample = Some(now.saturating_add_ms(self.config.check_interval_ms));

        let tip = frame.hands().iter().find_map(|hand| hand.index_tip);
        let stroking = match (tip, anchor_position, self.previous_tip) {
            (Some(tip), Some(center), Some(previous)) if contains(&self.config.zone, center, tip) => {
                aligned(
                    tip - previous,
                    self.config.required_direction,
                    self.config.direction_threshold,
                )
            }
            _ => false,
        };
        self.previous_tip = tip;

        let edge = Edge::between(self.active, stroking);
        self.active = stroking;
        edge
    }

    pub fn reset(&mut self) {
        self.previous_tip = None;
        self.next_sample = None;
        self.active = false;
    }
}

/// cos(movement, required) > threshold, without normalizing
fn aligned(movement: Vec3, required: Vec3, threshold: f32) -> bool {
    let movement_sq = movement.length_squared();
    if movement_sq == 0.0 {
        return false;
    }
    let dot = movement.dot(required);
    let bound = threshold * threshold * movement_sq * required.length_squared();
    if threshold >= 0.0 {
        dot > 0.0 && dot * dot > bound
    } else {
        dot >= 0.0 || dot * dot < bound
    }
}

impl Detector for StrokeDetector {
    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{Chirality, HandSample};

    const CENTER: Vec3 = Vec3::new(0.0, 1.5, 0.2);

    fn tip_at(p: Vec3) -> Frame {
        Frame::from_hands(&[HandSample::new(1, Chirality::Right, Vec3::ZERO).with_index_tip(Some(p))])
            .unwrap()
    }

    fn ms(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_upward_stroke_inside_zone() {
        let mut d = StrokeDetector::new(StrokeConfig::new(0)).unwrap();
        let low = CENTER + Vec3::new(0.0, -0.02, 0.0);
        let high = CENTER + Vec3::new(0.0, 0.02, 0.0);

        // First sample only establishes the previous position
        assert_eq!(d.update(&tip_at(low), Some(CENTER), ms(0)), Edge::None);
        // Held between samples
        assert_eq!(d.update(&tip_at(high), Some(CENTER), ms(50)), Edge::None);
        assert_eq!(d.update(&tip_at(high), Some(CENTER), ms(100)), Edge::Started);
        assert!(d.is_active());

        // Downward: not aligned
        assert_eq!(d.update(&tip_at(low), Some(CENTER), ms(200)), Edge::Ended);
    }

    #[test]
    fn test_stationary_tip_is_inactive() {
        let mut d = StrokeDetector::new(StrokeConfig::new(0)).unwrap();
        d.update(&tip_at(CENTER), Some(CENTER), ms(0));
        assert_eq!(d.update(&tip_at(CENTER), Some(CENTER), ms(100)), Edge::None);
        assert!(!d.is_active());
    }

    #[test]
    fn test_outside_zone_is_inactive() {
        let mut d = StrokeDetector::new(StrokeConfig::new(0)).unwrap();
        let start = CENTER + Vec3::new(0.3, 0.0, 0.0);
        d.update(&tip_at(start), Some(CENTER), ms(0));
        let moved = start + Vec3::new(0.0, 0.02, 0.0);
        assert_eq!(d.update(&tip_at(moved), Some(CENTER), ms(100)), Edge::None);
    }

    #[test]
    fn test_alignment() {
        assert!(aligned(Vec3::new(0.0, 0.01, 0.0), Vec3::UP, 0.7));
        assert!(aligned(Vec3::new(0.005, 0.01, 0.0), Vec3::new(0.0, 2.0, 0.0), 0.7));
        assert!(!aligned(Vec3::new(0.01, 0.01, 0.0), Vec3::UP, 0.75));
        assert!(!aligned(Vec3::new(0.0, -0.01, 0.0), Vec3::UP, 0.7));
        // Negative threshold accepts anything short of strongly opposite
        assert!(aligned(Vec3::RIGHT, Vec3::UP, -0.5));
        assert!(!aligned(-Vec3::UP, Vec3::UP, -0.5));
    }
}
