//! Gesture hub
//!
//! Top-level object the host drives: one swipe tracker, one detector board,
//! the scene they read target positions from, and a listener registry per
//! event family.

use crate::board::{BoardEvent, DetectorBoard, Scene};
use crate::config::{ConfigError, SwipeConfig};
use crate::events::{GateEvent, GrabEvent, SwipeEvent, TouchEvent};
use crate::frame::Frame;
use crate::listeners::Listeners;
use crate::swipe::SwipeTracker;
use crate::time::Instant;

#[derive(Debug)]
pub struct GestureHub {
    swipes: SwipeTracker,
    board: DetectorBoard,
    scene: Scene,
    swipe_listeners: Listeners<SwipeEvent>,
    grab_listeners: Listeners<GrabEvent>,
    gate_listeners: Listeners<GateEvent>,
    touch_listeners: Listeners<TouchEvent>,
}

impl GestureHub {
    /// Hub with an empty board
    pub fn new(swipe: SwipeConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_board(SwipeTracker::new(swipe)?, DetectorBoard::new()))
    }

    pub fn with_board(swipes: SwipeTracker, board: DetectorBoard) -> Self {
        Self {
            swipes,
            board,
            scene: Scene::new(),
            swipe_listeners: Listeners::new(),
            grab_listeners: Listeners::new(),
            gate_listeners: Listeners::new(),
            touch_listeners: Listeners::new(),
        }
    }

    pub fn swipes(&self) -> &SwipeTracker {
        &self.swipes
    }

    pub fn swipes_mut(&mut self) -> &mut SwipeTracker {
        &mut self.swipes
    }

    pub fn board(&self) -> &DetectorBoard {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut DetectorBoard {
        &mut self.board
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Target positions; update before each tick
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn on_swipe(&mut self) -> &mut Listeners<SwipeEvent> {
        &mut self.swipe_listeners
    }

    pub fn on_grab(&mut self) -> &mut Listeners<GrabEvent> {
        &mut self.grab_listeners
    }

    pub fn on_gate(&mut self) -> &mut Listeners<GateEvent> {
        &mut self.gate_listeners
    }

    pub fn on_touch(&mut self) -> &mut Listeners<TouchEvent> {
        &mut self.touch_listeners
    }

    /// Process one frame and dispatch the resulting events
    ///
    /// Swipes are dispatched first, then board events in detector order.
    /// Returns the number of events dispatched.
    pub fn tick(&mut self, frame: &Frame, now: Instant) -> usize {
        let swipes = self.swipes.ingest(frame, now);
        let board = self.board.tick(frame, &self.scene, now);

        for event in swipes.iter() {
            self.swipe_listeners.emit(event);
        }
        for event in board.iter() {
            match event {
                BoardEvent::Grab(e) => self.grab_listeners.emit(e),
                BoardEvent::Gate(e) => self.gate_listeners.emit(e),
                BoardEvent::Touch(e) => self.touch_listeners.emit(e),
            }
        }

        swipes.len() + board.len()
    }

    /// Drop all tracking state; listeners and scene are kept
    pub fn reset(&mut self) {
        self.swipes.reset();
        self.board.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::DetectorKind;
    use crate::config::{GateConfig, GateKind, GrabConfig, SignalConfig};
    use crate::detector::{ExternalSignal, ProximityGrabDetector};
    use crate::events::{GateTransition, GrabEventKind};
    use crate::frame::{Chirality, HandSample};
    use crate::gate::LogicGate;
    use crate::math::Vec3;
    use crate::swipe::SwipeDirection;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    fn ms(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    fn hand_at(tip: Vec3) -> Frame {
        Frame::from_hands(&[HandSample::new(1, Chirality::Right, tip)]).unwrap()
    }

    #[test]
    fn test_swipe_dispatch() {
        let mut hub = GestureHub::new(SwipeConfig::default()).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        hub.on_swipe().subscribe(move |e: &SwipeEvent| sink.borrow_mut().push(e.direction));

        assert_eq!(hub.tick(&hand_at(Vec3::ZERO), ms(0)), 0);
        assert_eq!(hub.tick(&hand_at(Vec3::new(0.0, 0.0, -0.1)), ms(100)), 1);
        assert_eq!(*seen.borrow(), [SwipeDirection::Backward]);
    }

    #[test]
    fn test_grab_gate_pipeline() {
        let mut hub = GestureHub::new(SwipeConfig::default()).unwrap();
        let board = hub.board_mut();
        let grab = board
            .add(DetectorKind::Grab(
                ProximityGrabDetector::new(3, GrabConfig::default()).unwrap(),
            ))
            .unwrap();
        let pose = board
            .add(DetectorKind::Signal(ExternalSignal::new(SignalConfig::default())))
            .unwrap();
        let gate = board
            .add(DetectorKind::Gate(
                LogicGate::new(GateConfig::new(GateKind::And, false, &[grab, pose]).unwrap())
                    .unwrap(),
            ))
            .unwrap();
        hub.scene_mut().set(3, Vec3::new(0.2, 1.0, 0.0)).unwrap();

        let grabs = Rc::new(RefCell::new(Vec::new()));
        let gates = Rc::new(RefCell::new(Vec::new()));
        let g = grabs.clone();
        hub.on_grab().subscribe(move |e: &GrabEvent| g.borrow_mut().push(e.kind));
        let t = gates.clone();
        hub.on_gate().subscribe(move |e: &GateEvent| t.borrow_mut().push(*e));

        let holding = Frame::from_hands(&[HandSample::new(4, Chirality::Left, Vec3::new(
            0.2, 1.0, 0.05,
        ))
        .with_grab_strength(1.0)])
        .unwrap();

        hub.tick(&holding, ms(0));
        assert_eq!(
            *grabs.borrow(),
            [GrabEventKind::GeneralStart, GrabEventKind::SpecificStart]
        );
        assert!(gates.borrow().is_empty());

        hub.board_mut().signal_mut(pose).unwrap().set(true);
        hub.tick(&holding, ms(16));
        assert_eq!(
            *gates.borrow(),
            [GateEvent {
                gate,
                transition: GateTransition::Activated
            }]
        );

        hub.tick(&Frame::new(), ms(32));
        assert_eq!(grabs.borrow().len(), 4);
        assert_eq!(gates.borrow().len(), 2);
        assert_eq!(gates.borrow()[1].transition, GateTransition::Deactivated);
    }

    #[test]
    fn test_reset_keeps_listeners() {
        let mut hub = GestureHub::new(SwipeConfig::default()).unwrap();
        hub.on_swipe().subscribe(|_| {});
        hub.tick(&hand_at(Vec3::ZERO), ms(0));
        assert!(hub.swipes().is_tracking(1));

        hub.reset();
        assert!(!hub.swipes().is_tracking(1));
        assert_eq!(hub.on_swipe().len(), 1);
    }
}
