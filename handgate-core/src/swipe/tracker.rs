//! Per-hand swipe tracker

use heapless::{FnvIndexMap, Vec};

use super::direction::classify;
use crate::config::{ConfigError, SwipeConfig};
use crate::events::SwipeEvent;
use crate::frame::{Frame, HandId, HandSample, MAX_HANDS};
use crate::math::Vec3;
use crate::time::Instant;

/// Tracking state for one hand
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) struct SwipeTrack {
    /// A candidate swipe is in progress
    pub tracking: bool,
    /// Fingertip when the candidate started
    pub start_position: Vec3,
    /// Tick when the candidate started
    pub start_time: Instant,
}

impl SwipeTrack {
    const fn idle() -> Self {
        Self {
            tracking: false,
            start_position: Vec3::ZERO,
            start_time: Instant::from_millis(0),
        }
    }

    fn begin(&mut self, position: Vec3, now: Instant) {
        self.tracking = true;
        self.start_position = position;
        self.start_time = now;
    }
}

/// Swipe tracker
///
/// Keeps one track per hand id present in the latest frame. Entries
/// are removed on the first tick their hand is missing. After any swipe, a
/// global cooldown suppresses evaluation for every hand so one physical
/// movement cannot register on two hands.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    config: SwipeConfig,
    tracks: FnvIndexMap<HandId, SwipeTrack, MAX_HANDS>,
    cooldown_until: Option<Instant>,
}

impl SwipeTracker {
    pub fn new(config: SwipeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            tracks: FnvIndexMap::new(),
            cooldown_until: None,
        })
    }

    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    /// Replace the tuning; clears all per-hand state and the cooldown
    pub fn reconfigure(&mut self, config: SwipeConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.reset();
        Ok(())
    }

    /// Forget every hand and end any cooldown
    pub fn reset(&mut self) {
        self.tracks.clear();
        self.cooldown_until = None;
    }

    /// True while swipe evaluation is suppressed
    pub fn in_cooldown(&self, now: Instant) -> bool {
        self.cooldown_until.is_some_and(|until| now < until)
    }

    /// True if a candidate swipe is in progress for `hand`
    pub fn is_tracking(&self, hand: HandId) -> bool {
        self.tracks.get(&hand).is_some_and(|t| t.tracking)
    }

    /// Number of hands with a state entry
    pub fn tracked_hands(&self) -> usize {
        self.tracks.len()
    }

    /// Process one frame
    pub fn ingest(&mut self, frame: &Frame, now: Instant) -> Vec<SwipeEvent, MAX_HANDS> {
        self.forget_absent(frame);

        let mut events = Vec::new();
        for hand in frame.hands() {
            if !self.tracks.contains_key(&hand.id)
                && self.tracks.insert(hand.id, SwipeTrack::idle()).is_err()
            {
                warn!("swipe: no slot for hand {}", hand.id);
                continue;
            }

            // Re-checked per hand: a swipe earlier in this frame silences the rest
            if self.in_cooldown(now) {
                continue;
            }

            if let Some(event) = self.process_hand(hand, now) {
                self.cooldown_until = Some(now.saturating_add_ms(self.config.cooldown_ms));
                // Every hand starts a fresh candidate once the cooldown ends
                for track in self.tracks.values_mut() {
                    track.tracking = false;
                }
                debug!("swipe: {} on hand {}", event.direction, event.hand);
                // One event per hand at most, cannot overflow
                let _ = events.push(event);
            }
        }
        events
    }

    fn forget_absent(&mut self, frame: &Frame) {
        let stale: Vec<HandId, MAX_HANDS> = self
            .tracks
            .keys()
            .filter(|id| !frame.contains(**id))
            .copied()
            .collect();

        for id in stale {
            self.tracks.remove(&id);
        }
    }

    fn process_hand(&mut self, hand: &HandSample, now: Instant) -> Option<SwipeEvent> {
        let config = self.config;
        let track = self.tracks.get_mut(&hand.id)?;

        let Some(tip) = hand.index_tip else {
            track.tracking = false;
            return None;
        };

        if !track.tracking {
            track.begin(tip, now);
            return None;
        }

        let displacement = tip - track.start_position;
        if displacement.longer_than(config.distance_threshold_m) {
            track.tracking = false;
            let direction = classify(displacement, &config);
            if direction.is_none() {
                debug!("swipe: ambiguous movement on hand {}", hand.id);
            }
            return direction.map(|direction| SwipeEvent {
                direction,
                hand: hand.id,
                start: track.start_position,
                end: tip,
            });
        }

        if now.millis_since(track.start_time) > config.time_limit_ms {
            // Too slow or too small
            debug!("swipe: candidate on hand {} timed out", hand.id);
            track.tracking = false;
        }
        None
    }
}
