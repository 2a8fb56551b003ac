//! Detector board
//!
//! Owns every boolean detector of a rig in registration order. Gates may
//! only refer to detectors registered before them, so one pass in id order
//! evaluates each member before any gate that reads it, and cycles cannot
//! be expressed.

use heapless::{FnvIndexMap, Vec};

use crate::config::ConfigError;
use crate::detector::{
    Detector, DetectorId, DetectorSource, ExternalSignal, ProximityGrabDetector, StrokeDetector,
    TargetId, TouchDetector, ZoneDetector,
};
use crate::events::{GateEvent, GrabEvent, TouchEvent};
use crate::frame::Frame;
use crate::gate::LogicGate;
use crate::hysteresis::Edge;
use crate::math::Vec3;
use crate::time::Instant;

/// Maximum detectors on one board
pub const MAX_DETECTORS: usize = 16;

/// Maximum targets in a scene (power of two)
pub const MAX_TARGETS: usize = 16;

/// Maximum events reported by one board tick
pub const MAX_BOARD_EVENTS: usize = 48;

/// Board errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardError {
    /// No room for another detector
    Full,
    /// No room for another scene target
    SceneFull,
    /// Gate member is not registered before the gate
    ForwardReference(DetectorId),
    /// No detector with this id
    UnknownDetector(DetectorId),
    /// Detector exists but is of another kind
    WrongKind(DetectorId),
    /// Detector configuration rejected
    Config(ConfigError),
}

impl From<ConfigError> for BoardError {
    fn from(e: ConfigError) -> Self {
        BoardError::Config(e)
    }
}

/// Target positions for the current tick
#[derive(Debug, Clone, Default)]
pub struct Scene {
    targets: FnvIndexMap<TargetId, Vec3, MAX_TARGETS>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or move a target
    pub fn set(&mut self, target: TargetId, position: Vec3) -> Result<(), BoardError> {
        self.targets
            .insert(target, position)
            .map(|_| ())
            .map_err(|_| BoardError::SceneFull)
    }

    /// Take a target out of the scene; detectors treat it as unreachable
    pub fn remove(&mut self, target: TargetId) -> Option<Vec3> {
        self.targets.remove(&target)
    }

    pub fn position(&self, target: TargetId) -> Option<Vec3> {
        self.targets.get(&target).copied()
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }
}

/// A detector on the board
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DetectorKind {
    Grab(ProximityGrabDetector),
    Zone(ZoneDetector),
    Stroke(StrokeDetector),
    Touch(TouchDetector),
    Signal(ExternalSignal),
    Gate(LogicGate),
}

impl DetectorKind {
    fn reset(&mut self) {
        match self {
            DetectorKind::Grab(d) => d.reset(),
            DetectorKind::Zone(d) => d.reset(),
            DetectorKind::Stroke(d) => d.reset(),
            DetectorKind::Touch(d) => d.reset(),
            DetectorKind::Signal(d) => d.reset(),
            DetectorKind::Gate(d) => d.reset(),
        }
    }
}

impl Detector for DetectorKind {
    fn is_active(&self) -> bool {
        match self {
            DetectorKind::Grab(d) => d.is_active(),
            DetectorKind::Zone(d) => d.is_active(),
            DetectorKind::Stroke(d) => d.is_active(),
            DetectorKind::Touch(d) => d.is_active(),
            DetectorKind::Signal(d) => d.is_active(),
            DetectorKind::Gate(d) => d.is_active(),
        }
    }
}

impl DetectorSource for [DetectorKind] {
    fn is_detector_active(&self, id: DetectorId) -> bool {
        self.get(id.index()).is_some_and(|d| d.is_active())
    }
}

/// Event from a board tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardEvent {
    Grab(GrabEvent),
    Gate(GateEvent),
    Touch(TouchEvent),
}

/// Events from one board tick, in detector order
pub type BoardEvents = Vec<BoardEvent, MAX_BOARD_EVENTS>;

/// Arena of detectors
#[derive(Debug, Clone, Default)]
pub struct DetectorBoard {
    slots: Vec<DetectorKind, MAX_DETECTORS>,
}

impl DetectorBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a detector and return its id
    pub fn add(&mut self, detector: DetectorKind) -> Result<DetectorId, BoardError> {
        let id = DetectorId(self.slots.len() as u8);

        if let DetectorKind::Gate(gate) = &detector {
            if let Some(member) = gate.members().iter().find(|m| m.index() >= id.index()) {
                return Err(BoardError::ForwardReference(*member));
            }
        }

        self.slots.push(detector).map_err(|_| BoardError::Full)?;
        debug!("board: registered detector {}", id);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, id: DetectorId) -> Option<&DetectorKind> {
        self.slots.get(id.index())
    }

    pub fn get_mut(&mut self, id: DetectorId) -> Option<&mut DetectorKind> {
        self.slots.get_mut(id.index())
    }

    /// Current state of a detector; unknown ids read as inactive
    pub fn is_active(&self, id: DetectorId) -> bool {
        self.slots.is_detector_active(id)
    }

    /// Host-driven signal, for [`ExternalSignal::set`]
    pub fn signal_mut(&mut self, id: DetectorId) -> Result<&mut ExternalSignal, BoardError> {
        match self.slots.get_mut(id.index()) {
            Some(DetectorKind::Signal(signal)) => Ok(signal),
            Some(_) => Err(BoardError::WrongKind(id)),
            None => Err(BoardError::UnknownDetector(id)),
        }
    }

    /// Grab detector, e.g. to retarget it
    pub fn grab_mut(&mut self, id: DetectorId) -> Result<&mut ProximityGrabDetector, BoardError> {
        match self.slots.get_mut(id.index()) {
            Some(DetectorKind::Grab(grab)) => Ok(grab),
            Some(_) => Err(BoardError::WrongKind(id)),
            None => Err(BoardError::UnknownDetector(id)),
        }
    }

    /// Drop all accumulated detector state
    pub fn reset(&mut self) {
        info!("board: reset {} detectors", self.slots.len());
        for slot in self.slots.iter_mut() {
            slot.reset();
        }
    }

    /// Evaluate every detector once, in id order
    pub fn tick(&mut self, frame: &Frame, scene: &Scene, now: Instant) -> BoardEvents {
        let mut events = BoardEvents::new();

        for index in 0..self.slots.len() {
            let id = DetectorId(index as u8);
            let (before, rest) = self.slots.split_at_mut(index);
            let Some((slot, _)) = rest.split_first_mut() else {
                break;
            };

            match slot {
                DetectorKind::Grab(grab) => {
                    let target = scene.position(grab.target());
                    for event in grab.update(frame, target, now) {
                        push(&mut events, BoardEvent::Grab(event));
                    }
                }
                DetectorKind::Zone(zone) => {
                    zone.update(frame, scene.position(zone.config().anchor));
                }
                DetectorKind::Stroke(stroke) => {
                    stroke.update(frame, scene.position(stroke.config().zone.anchor), now);
                }
                DetectorKind::Touch(touch) => {
                    let anchor = touch.config().anchor;
                    let event = match touch.update(frame, scene.position(anchor), now) {
                        Edge::Started => Some(TouchEvent::Activated { detector: id, anchor }),
                        Edge::Ended => Some(TouchEvent::Deactivated { detector: id, anchor }),
                        Edge::None => None,
                    };
                    if let Some(event) = event {
                        push(&mut events, BoardEvent::Touch(event));
                    }
                }
                DetectorKind::Signal(signal) => {
                    signal.update(now);
                }
                DetectorKind::Gate(gate) => {
                    if let Some(transition) = gate.update(&*before) {
                        debug!("board: gate {} {}", id, transition);
                        push(&mut events, BoardEvent::Gate(GateEvent { gate: id, transition }));
                    }
                }
            }
        }

        events
    }
}

fn push(events: &mut BoardEvents, event: BoardEvent) {
    if events.push(event).is_err() {
        warn!("board: event queue full, dropping {}", event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GateConfig, GateKind, GrabConfig, SignalConfig, TouchConfig};
    use crate::events::{GateTransition, GrabEventKind};
    use crate::frame::{Chirality, HandSample};

    const JAR: TargetId = 1;

    fn signal() -> DetectorKind {
        DetectorKind::Signal(ExternalSignal::new(SignalConfig::default()))
    }

    fn gate(kind: GateKind, negate: bool, members: &[DetectorId]) -> DetectorKind {
        DetectorKind::Gate(LogicGate::new(GateConfig::new(kind, negate, members).unwrap()).unwrap())
    }

    fn ms(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_forward_reference_rejected() {
        let mut board = DetectorBoard::new();
        let a = board.add(signal()).unwrap();

        assert_eq!(
            board.add(gate(GateKind::And, false, &[a, DetectorId(1)])),
            Err(BoardError::ForwardReference(DetectorId(1)))
        );
        assert_eq!(board.len(), 1);
        assert_eq!(board.add(gate(GateKind::And, false, &[a])), Ok(DetectorId(1)));
    }

    #[test]
    fn test_capacity() {
        let mut board = DetectorBoard::new();
        for _ in 0..MAX_DETECTORS {
            board.add(signal()).unwrap();
        }
        assert_eq!(board.add(signal()), Err(BoardError::Full));
    }

    #[test]
    fn test_signal_access() {
        let mut board = DetectorBoard::new();
        let s = board.add(signal()).unwrap();
        let g = board.add(gate(GateKind::Or, false, &[s])).unwrap();

        assert!(board.signal_mut(s).is_ok());
        assert_eq!(board.signal_mut(g).err(), Some(BoardError::WrongKind(g)));
        assert_eq!(
            board.grab_mut(DetectorId(9)).err(),
            Some(BoardError::UnknownDetector(DetectorId(9)))
        );
    }

    #[test]
    fn test_grab_and_pose_gate() {
        let mut board = DetectorBoard::new();
        let grab = board
            .add(DetectorKind::Grab(
                ProximityGrabDetector::new(JAR, GrabConfig::default()).unwrap(),
            ))
            .unwrap();
        let pose = board.add(signal()).unwrap();
        let both = board.add(gate(GateKind::And, false, &[grab, pose])).unwrap();

        let mut scene = Scene::new();
        let jar = Vec3::new(0.0, 1.0, 0.4);
        scene.set(JAR, jar).unwrap();

        let gripping = Frame::from_hands(&[
            HandSample::new(1, Chirality::Right, jar).with_grab_strength(0.9)
        ])
        .unwrap();

        let events = board.tick(&gripping, &scene, ms(0));
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[1],
            BoardEvent::Grab(GrabEvent { kind: GrabEventKind::SpecificStart, .. })
        ));
        assert!(!board.is_active(both));

        board.signal_mut(pose).unwrap().set(true);
        let events = board.tick(&gripping, &scene, ms(10));
        assert_eq!(
            events.as_slice(),
            [BoardEvent::Gate(GateEvent {
                gate: both,
                transition: GateTransition::Activated
            })]
        );

        // Same frame again: nothing new
        assert!(board.tick(&gripping, &scene, ms(20)).is_empty());

        // Target leaves the scene: specific grab ends, gate follows in the same tick
        scene.remove(JAR);
        let events = board.tick(&gripping, &scene, ms(30));
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[1],
            BoardEvent::Gate(GateEvent { transition: GateTransition::Deactivated, .. })
        ));
    }

    #[test]
    fn test_nested_gates_settle_in_one_tick() {
        let mut board = DetectorBoard::new();
        let a = board.add(signal()).unwrap();
        let b = board.add(signal()).unwrap();
        let either = board.add(gate(GateKind::Or, false, &[a, b])).unwrap();
        let neither = board.add(gate(GateKind::Or, true, &[either])).unwrap();

        let scene = Scene::new();
        let events = board.tick(&Frame::new(), &scene, ms(0));
        assert_eq!(
            events.as_slice(),
            [BoardEvent::Gate(GateEvent {
                gate: neither,
                transition: GateTransition::Activated
            })]
        );

        board.signal_mut(b).unwrap().set(true);
        let events = board.tick(&Frame::new(), &scene, ms(10));
        assert_eq!(events.len(), 2);
        assert!(board.is_active(either));
        assert!(!board.is_active(neither));
    }

    #[test]
    fn test_touch_events_carry_ids() {
        let mut board = DetectorBoard::new();
        let touch = board
            .add(DetectorKind::Touch(TouchDetector::new(TouchConfig::new(JAR)).unwrap()))
            .unwrap();
        let mut scene = Scene::new();
        scene.set(JAR, Vec3::ZERO).unwrap();

        let frame =
            Frame::from_hands(&[HandSample::new(1, Chirality::Left, Vec3::ZERO)]).unwrap();
        let events = board.tick(&frame, &scene, ms(0));
        assert_eq!(
            events.as_slice(),
            [BoardEvent::Touch(TouchEvent::Activated {
                detector: touch,
                anchor: JAR
            })]
        );
    }

    #[test]
    fn test_reset_clears_state() {
        let mut board = DetectorBoard::new();
        let s = board.add(signal()).unwrap();
        board.signal_mut(s).unwrap().set(true);
        board.tick(&Frame::new(), &Scene::new(), ms(0));
        assert!(board.is_active(s));

        board.reset();
        assert!(!board.is_active(s));
        assert!(board.tick(&Frame::new(), &Scene::new(), ms(10)).is_empty());
    }
}
