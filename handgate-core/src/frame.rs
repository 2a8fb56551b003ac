//! Per-tick hand tracking input
//!
//! A [`Frame`] is everything the frame source knows about the tracked hands
//! at one tick. The core never keeps a frame; it reads it and updates its
//! own state.

use heapless::Vec;

use crate::math::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum hands in a single frame
///
/// Also the capacity of every per-hand map, so it must be a power of two.
pub const MAX_HANDS: usize = 8;

/// Stable hand identifier assigned by the frame source
pub type HandId = u32;

/// Which hand a sample belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Chirality {
    Left,
    Right,
}

/// One tracked hand at one tick
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HandSample {
    /// Stable id for as long as the hand stays tracked
    pub id: HandId,
    /// Palm center (m)
    pub palm_position: Vec3,
    /// Index fingertip (m), if the finger is tracked this tick
    pub index_tip: Option<Vec3>,
    /// 0.0 = open hand, 1.0 = closed fist
    pub grab_strength: f32,
    /// Left or right hand
    pub chirality: Chirality,
}

impl HandSample {
    /// Create a sample with an open hand and a tracked index fingertip at
    /// the palm position
    pub const fn new(id: HandId, chirality: Chirality, palm_position: Vec3) -> Self {
        Self {
            id,
            palm_position,
            index_tip: Some(palm_position),
            grab_strength: 0.0,
            chirality,
        }
    }

    /// Replace the index fingertip sample
    pub const fn with_index_tip(mut self, tip: Option<Vec3>) -> Self {
        self.index_tip = tip;
        self
    }

    /// Replace the grab strength
    pub const fn with_grab_strength(mut self, strength: f32) -> Self {
        self.grab_strength = strength;
        self
    }

    pub fn is_left(&self) -> bool {
        self.chirality == Chirality::Left
    }
}

/// Errors building a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// More than [`MAX_HANDS`] hands
    TooManyHands,
    /// Hand id already present in this frame
    DuplicateHand(HandId),
}

/// Ordered set of hand samples for one tick
///
/// Hand ids are unique within a frame; [`Frame::push`] enforces it.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    hands: Vec<HandSample, MAX_HANDS>,
}

impl Frame {
    /// An empty frame (no hands tracked)
    pub const fn new() -> Self {
        Self { hands: Vec::new() }
    }

    /// Build a frame from a slice of samples
    pub fn from_hands(hands: &[HandSample]) -> Result<Self, FrameError> {
        let mut frame = Self::new();
        for hand in hands {
            frame.push(*hand)?;
        }
        Ok(frame)
    }

    /// Append a hand sample
    pub fn push(&mut self, hand: HandSample) -> Result<(), FrameError> {
        if self.contains(hand.id) {
            return Err(FrameError::DuplicateHand(hand.id));
        }
        self.hands.push(hand).map_err(|_| FrameError::TooManyHands)
    }

    pub fn hands(&self) -> &[HandSample] {
        &self.hands
    }

    pub fn hand(&self, id: HandId) -> Option<&HandSample> {
        self.hands.iter().find(|h| h.id == id)
    }

    pub fn contains(&self, id: HandId) -> bool {
        self.hand(id).is_some()
    }

    /// First hand of the given chirality, in frame order
    pub fn first_with(&self, chirality: Chirality) -> Option<&HandSample> {
        self.hands.iter().find(|h| h.chirality == chirality)
    }

    pub fn len(&self) -> usize {
        self.hands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(id: HandId, chirality: Chirality) -> HandSample {
        HandSample::new(id, chirality, Vec3::ZERO)
    }

    #[test]
    fn test_duplicate_hand_rejected() {
        let mut frame = Frame::new();
        frame.push(hand(1, Chirality::Left)).unwrap();
        assert_eq!(
            frame.push(hand(1, Chirality::Right)),
            Err(FrameError::DuplicateHand(1))
        );
        assert_eq!(frame.len(), 1);
    }

    #[test]
    fn test_capacity() {
        let mut frame = Frame::new();
        for id in 0..MAX_HANDS as HandId {
            frame.push(hand(id, Chirality::Left)).unwrap();
        }
        assert_eq!(
            frame.push(hand(99, Chirality::Left)),
            Err(FrameError::TooManyHands)
        );
    }

    #[test]
    fn test_lookup() {
        let frame =
            Frame::from_hands(&[hand(4, Chirality::Right), hand(7, Chirality::Left)]).unwrap();

        assert!(frame.contains(7));
        assert!(!frame.contains(5));
        assert_eq!(frame.first_with(Chirality::Left).map(|h| h.id), Some(7));
        assert_eq!(frame.first_with(Chirality::Right).map(|h| h.id), Some(4));
        assert!(frame.hand(7).unwrap().is_left());
    }
}
