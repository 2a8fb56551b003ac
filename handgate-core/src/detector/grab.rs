//! Proximity grab detector
//!
//! Follows one hand. Grab strength drives a hysteresis band ("general"
//! grab); a general grab with the palm within reach of the target is a
//! "specific" grab. Losing the hand ends both immediately. Optionally, a
//! specific grab that stays released for `lost_debounce_ms` is reported as
//! lost.

use heapless::Vec;

use super::{Detector, TargetId};
use crate::config::{ConfigError, GrabConfig};
use crate::events::{GrabEvent, GrabEventKind};
use crate::frame::{Frame, HandId, HandSample};
use crate::hysteresis::{Edge, Hysteresis};
use crate::math::Vec3;
use crate::time::Instant;

/// Events from one grab update (general edge, specific edge, lost)
pub type GrabEvents = Vec<GrabEvent, 4>;

/// Pending "grab lost" report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
struct LostPending {
    deadline: Instant,
    hand: Option<HandId>,
}

/// Grab detector for a single target
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProximityGrabDetector {
    config: GrabConfig,
    target: TargetId,
    general: Hysteresis,
    specific: bool,
    tracked_hand: Option<HandId>,
    lost: Option<LostPending>,
}

impl ProximityGrabDetector {
    pub fn new(target: TargetId, config: GrabConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            general: Hysteresis::new(config.strength)?,
            config,
            target,
            specific: false,
            tracked_hand: None,
            lost: None,
        })
    }

    pub fn config(&self) -> &GrabConfig {
        &self.config
    }

    pub fn target(&self) -> TargetId {
        self.target
    }

    /// General grab (strength only) is active
    pub fn is_grabbing(&self) -> bool {
        self.general.is_active()
    }

    /// Grab on the target is active
    pub fn is_grabbing_target(&self) -> bool {
        self.specific
    }

    /// Hand currently followed
    pub fn tracked_hand(&self) -> Option<HandId> {
        self.tracked_hand
    }

    /// A lost report is armed
    pub fn lost_pending(&self) -> bool {
        self.lost.is_some()
    }

    /// Point the detector at another target; all state is dropped silently
    pub fn retarget(&mut self, target: TargetId) {
        info!("grab: retarget {} -> {}", self.target, target);
        self.target = target;
        self.reset();
    }

    /// Replace the tuning; all state is dropped silently
    pub fn reconfigure(&mut self, config: GrabConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.general = Hysteresis::new(config.strength)?;
        self.config = config;
        self.reset();
        Ok(())
    }

    /// Forget hand, hysteresis and pending lost report
    pub fn reset(&mut self) {
        self.general.reset();
        self.specific = false;
        self.tracked_hand = None;
        self.lost = None;
    }

    /// Evaluate one tick
    ///
    /// `target_position` is the target's current position, or `None` if it
    /// is not in the scene (never in reach).
    pub fn update(
        &mut self,
        frame: &Frame,
        target_position: Option<Vec3>,
        now: Instant,
    ) -> GrabEvents {
        let mut events = GrabEvents::new();

        match self.select_hand(frame) {
            Some(hand) => self.track(hand, target_position, now, &mut events),
            None => self.lose_hand(now, &mut events),
        }
        self.poll_lost(now, &mut events);

        events
    }

    /// Hand to evaluate this tick
    ///
    /// A followed hand that left the frame yields `None` for one tick even
    /// if another candidate is present, so its grab ends before a new hand
    /// is adopted.
    fn select_hand<'f>(&mut self, frame: &'f Frame) -> Option<&'f HandSample> {
        if let Some(id) = self.tracked_hand {
            let hand = frame.hand(id);
            if hand.is_none() {
                debug!("grab: hand {} lost", id);
                self.tracked_hand = None;
            }
            return hand;
        }

        let candidate = match self.config.hand.chirality() {
            Some(chirality) => frame.first_with(chirality),
            None => frame.hands().first(),
        };
        self.tracked_hand = candidate.map(|h| h.id);
        candidate
    }

    fn track(
        &mut self,
        hand: &HandSample,
        target_position: Option<Vec3>,
        now: Instant,
        events: &mut GrabEvents,
    ) {
        match self.general.update(hand.grab_strength) {
            Edge::Started => self.push(events, GrabEventKind::GeneralStart, Some(hand.id)),
            Edge::Ended => self.push(events, GrabEventKind::GeneralEnd, Some(hand.id)),
            Edge::None => {}
        }

        let in_reach = target_position
            .is_some_and(|target| hand.palm_position.within(target, self.config.proximity_m));
        self.set_specific(self.general.is_active() && in_reach, Some(hand.id), now, events);
    }

    fn lose_hand(&mut self, now: Instant, events: &mut GrabEvents) {
        // Tracking loss bypasses hysteresis
        self.set_specific(false, None, now, events);
        if self.general.force_inactive() == Edge::Ended {
            self.push(events, GrabEventKind::GeneralEnd, None);
        }
    }

    fn set_specific(
        &mut self,
        specific: bool,
        hand: Option<HandId>,
        now: Instant,
        events: &mut GrabEvents,
    ) {
        match Edge::between(self.specific, specific) {
            Edge::Started => {
                if self.lost.take().is_some() {
                    debug!("grab: target {} regained, lost report cancelled", self.target);
                }
                self.push(events, GrabEventKind::SpecificStart, hand);
            }
            Edge::Ended => {
                self.push(events, GrabEventKind::SpecificEnd, hand);
                if let Some(delay) = self.config.lost_debounce_ms {
                    self.lost = Some(LostPending {
                        deadline: now.saturating_add_ms(delay),
                        hand,
                    });
                }
            }
            Edge::None => {}
        }
        self.specific = specific;
    }

    fn poll_lost(&mut self, now: Instant, events: &mut GrabEvents) {
        let Some(pending) = self.lost else {
            return;
        };
        if self.specific {
            self.lost = None;
        } else if now >= pending.deadline {
            self.lost = None;
            info!("grab: target {} lost", self.target);
            self.push(events, GrabEventKind::Lost, pending.hand);
        }
    }

    fn push(&self, events: &mut GrabEvents, kind: GrabEventKind, hand: Option<HandId>) {
        debug!("grab: {} on target {}", kind, self.target);
        // At most three events per tick
        let _ = events.push(GrabEvent {
            target: self.target,
            kind,
            hand,
        });
    }
}

impl Detector for ProximityGrabDetector {
    fn is_active(&self) -> bool {
        self.specific
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HandSelector, HysteresisConfig};
    use crate::frame::Chirality;

    const TARGET: TargetId = 3;
    const AT_TARGET: Vec3 = Vec3::new(0.0, 0.2, 0.3);

    fn detector(config: GrabConfig) -> ProximityGrabDetector {
        ProximityGrabDetector::new(TARGET, config).unwrap()
    }

    fn hand(id: HandId, strength: f32, palm: Vec3) -> Frame {
        Frame::from_hands(&[
            HandSample::new(id, Chirality::Right, palm).with_grab_strength(strength)
        ])
        .unwrap()
    }

    fn ms(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    fn kinds(events: &GrabEvents) -> alloc::vec::Vec<GrabEventKind> {
        events.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_general_hysteresis_sequence() {
        let mut d = detector(GrabConfig::default());
        let far = Vec3::new(1.0, 0.0, 0.0);

        assert_eq!(
            kinds(&d.update(&hand(1, 0.9, far), Some(AT_TARGET), ms(0))),
            [GrabEventKind::GeneralStart]
        );
        assert!(d.update(&hand(1, 0.7, far), Some(AT_TARGET), ms(10)).is_empty());
        assert_eq!(
            kinds(&d.update(&hand(1, 0.5, far), Some(AT_TARGET), ms(20))),
            [GrabEventKind::GeneralEnd]
        );
        assert!(!d.is_active());
    }

    #[test]
    fn test_specific_requires_proximity() {
        let mut d = detector(GrabConfig::default());

        let events = d.update(&hand(1, 0.9, AT_TARGET), Some(AT_TARGET), ms(0));
        assert_eq!(
            kinds(&events),
            [GrabEventKind::GeneralStart, GrabEventKind::SpecificStart]
        );
        assert!(events.iter().all(|e| e.target == TARGET && e.hand == Some(1)));
        assert!(d.is_active());

        // Move away while still gripping
        let away = AT_TARGET + Vec3::new(0.2, 0.0, 0.0);
        assert_eq!(
            kinds(&d.update(&hand(1, 0.9, away), Some(AT_TARGET), ms(10))),
            [GrabEventKind::SpecificEnd]
        );
        assert!(d.is_grabbing());
        assert!(!d.is_grabbing_target());
    }

    #[test]
    fn test_missing_target_is_out_of_reach() {
        let mut d = detector(GrabConfig::default());
        assert_eq!(
            kinds(&d.update(&hand(1, 0.9, AT_TARGET), None, ms(0))),
            [GrabEventKind::GeneralStart]
        );
        assert!(!d.is_active());
    }

    #[test]
    fn test_hand_loss_ends_immediately() {
        let mut d = detector(GrabConfig::default().with_lost_debounce(200));
        d.update(&hand(1, 0.9, AT_TARGET), Some(AT_TARGET), ms(0));

        let events = d.update(&Frame::new(), Some(AT_TARGET), ms(10));
        assert_eq!(
            kinds(&events),
            [GrabEventKind::SpecificEnd, GrabEventKind::GeneralEnd]
        );
        assert!(events.iter().all(|e| e.hand.is_none()));
        assert!(!d.is_grabbing());
        assert!(d.lost_pending());
    }

    #[test]
    fn test_lost_fires_after_debounce() {
        let mut d = detector(GrabConfig::default().with_lost_debounce(200));
        d.update(&hand(1, 0.9, AT_TARGET), Some(AT_TARGET), ms(0));
        d.update(&hand(1, 0.1, AT_TARGET), Some(AT_TARGET), ms(100));

        assert!(d.update(&hand(1, 0.1, AT_TARGET), Some(AT_TARGET), ms(299)).is_empty());
        let events = d.update(&hand(1, 0.1, AT_TARGET), Some(AT_TARGET), ms(300));
        assert_eq!(kinds(&events), [GrabEventKind::Lost]);
        assert_eq!(events[0].hand, Some(1));
        assert!(!d.lost_pending());

        // Fires once
        assert!(d.update(&hand(1, 0.1, AT_TARGET), Some(AT_TARGET), ms(600)).is_empty());
    }

    #[test]
    fn test_regrab_cancels_lost() {
        let mut d = detector(GrabConfig::default().with_lost_debounce(200));
        d.update(&hand(1, 0.9, AT_TARGET), Some(AT_TARGET), ms(0));
        d.update(&hand(1, 0.1, AT_TARGET), Some(AT_TARGET), ms(100));
        assert!(d.lost_pending());

        let events = d.update(&hand(1, 0.9, AT_TARGET), Some(AT_TARGET), ms(150));
        assert_eq!(
            kinds(&events),
            [GrabEventKind::GeneralStart, GrabEventKind::SpecificStart]
        );
        assert!(!d.lost_pending());
        assert!(d.update(&hand(1, 0.9, AT_TARGET), Some(AT_TARGET), ms(400)).is_empty());
    }

    #[test]
    fn test_no_lost_without_debounce() {
        let mut d = detector(GrabConfig::default());
        d.update(&hand(1, 0.9, AT_TARGET), Some(AT_TARGET), ms(0));
        d.update(&hand(1, 0.1, AT_TARGET), Some(AT_TARGET), ms(100));
        assert!(!d.lost_pending());
        assert!(d.update(&hand(1, 0.1, AT_TARGET), Some(AT_TARGET), ms(10_000)).is_empty());
    }

    #[test]
    fn test_chirality_selection() {
        let config = GrabConfig {
            hand: HandSelector::Left,
            ..GrabConfig::default()
        };
        let mut d = detector(config);

        // Only a right hand: treated as no hand
        assert!(d.update(&hand(1, 0.9, AT_TARGET), Some(AT_TARGET), ms(0)).is_empty());

        let frame = Frame::from_hands(&[
            HandSample::new(1, Chirality::Right, AT_TARGET).with_grab_strength(0.0),
            HandSample::new(2, Chirality::Left, AT_TARGET).with_grab_strength(0.95),
        ])
        .unwrap();
        let events = d.update(&frame, Some(AT_TARGET), ms(10));
        assert_eq!(events.len(), 2);
        assert_eq!(d.tracked_hand(), Some(2));
    }

    #[test]
    fn test_any_hand_sticks_then_hands_over() {
        let mut d = detector(GrabConfig::default());
        let both = Frame::from_hands(&[
            HandSample::new(5, Chirality::Left, AT_TARGET).with_grab_strength(0.9),
            HandSample::new(6, Chirality::Right, AT_TARGET).with_grab_strength(0.0),
        ])
        .unwrap();
        d.update(&both, Some(AT_TARGET), ms(0));
        assert_eq!(d.tracked_hand(), Some(5));
        assert!(d.is_active());

        // Hand 5 leaves: its grab ends now, hand 6 is adopted next tick
        let only_six = hand(6, 0.9, AT_TARGET);
        let events = d.update(&only_six, Some(AT_TARGET), ms(10));
        assert!(events.iter().all(|e| e.hand.is_none()));
        assert_eq!(d.tracked_hand(), None);

        let events = d.update(&only_six, Some(AT_TARGET), ms(20));
        assert_eq!(
            kinds(&events),
            [GrabEventKind::GeneralStart, GrabEventKind::SpecificStart]
        );
        assert_eq!(d.tracked_hand(), Some(6));
    }

    #[test]
    fn test_retarget_clears_state_silently() {
        let mut d = detector(GrabConfig::default().with_lost_debounce(100));
        d.update(&hand(1, 0.9, AT_TARGET), Some(AT_TARGET), ms(0));
        d.update(&hand(1, 0.1, AT_TARGET), Some(AT_TARGET), ms(10));
        assert!(d.lost_pending());

        d.retarget(9);
        assert_eq!(d.target(), 9);
        assert!(!d.is_grabbing());
        assert!(!d.lost_pending());
        assert!(d.update(&hand(1, 0.1, AT_TARGET), Some(AT_TARGET), ms(500)).is_empty());
    }

    #[test]
    fn test_reconfigure_clears_state_silently() {
        let mut d = detector(GrabConfig::default().with_lost_debounce(100));
        d.update(&hand(1, 0.9, AT_TARGET), Some(AT_TARGET), ms(0));
        d.update(&hand(1, 0.1, AT_TARGET), Some(AT_TARGET), ms(10));
        assert!(d.lost_pending());

        let wider = GrabConfig {
            proximity_m: 0.2,
            ..GrabConfig::default()
        };
        d.reconfigure(wider).unwrap();
        assert_eq!(d.config().proximity_m, 0.2);
        assert!(!d.is_grabbing());
        assert!(!d.lost_pending());
        assert_eq!(d.tracked_hand(), None);
        assert!(d.update(&hand(1, 0.1, AT_TARGET), Some(AT_TARGET), ms(500)).is_empty());

        let inverted = GrabConfig {
            strength: HysteresisConfig {
                activate: 0.5,
                deactivate: 0.7,
            },
            ..GrabConfig::default()
        };
        assert_eq!(d.reconfigure(inverted), Err(ConfigError::InvertedThresholds));
        assert_eq!(d.config().proximity_m, 0.2);
    }

    #[test]
    fn test_stable_input_is_idempotent() {
        let mut d = detector(GrabConfig::default().with_lost_debounce(50));
        let frame = hand(1, 0.9, AT_TARGET);
        d.update(&frame, Some(AT_TARGET), ms(0));
        assert!(d.update(&frame, Some(AT_TARGET), ms(10)).is_empty());
        assert!(d.update(&frame, Some(AT_TARGET), ms(20)).is_empty());
    }

    #[test]
    fn test_rejects_bad_config() {
        let config = GrabConfig {
            strength: HysteresisConfig {
                activate: 0.5,
                deactivate: 0.7,
            },
            ..GrabConfig::default()
        };
        assert_eq!(
            ProximityGrabDetector::new(TARGET, config).err(),
            Some(ConfigError::InvertedThresholds)
        );
    }
}
