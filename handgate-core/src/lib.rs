//! Board-agnostic gesture detection core
//!
//! Turns per-tick hand tracking samples into debounced interaction events:
//!
//! - Directional swipes, tracked per hand id with a global cooldown
//! - Grab start/end with hysteresis, proximity gating and a debounced
//!   "grab lost" signal
//! - Hand-in-zone, directional stroke and fingertip touch detectors
//! - AND/OR/NOT logic gates over any boolean detector, nestable and
//!   edge-triggered
//!
//! Everything is a function of `(previous state, frame, now)`. The caller
//! supplies a monotonic [`Instant`] with each tick; nothing here owns a
//! timer, a thread or a scheduler.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod board;
pub mod config;
pub mod detector;
pub mod events;
pub mod frame;
pub mod gate;
pub mod hub;
pub mod hysteresis;
pub mod listeners;
pub mod math;
pub mod swipe;
pub mod time;

pub use board::{BoardError, BoardEvent, DetectorBoard, DetectorKind, Scene};
pub use config::ConfigError;
pub use detector::{Detector, DetectorId, DetectorSource};
pub use events::{GateEvent, GateTransition, GrabEvent, GrabEventKind, SwipeEvent, TouchEvent};
pub use frame::{Chirality, Frame, FrameError, HandId, HandSample, MAX_HANDS};
pub use gate::LogicGate;
pub use hub::GestureHub;
pub use hysteresis::{Edge, Hysteresis};
pub use listeners::{ListenerHandle, Listeners};
pub use math::Vec3;
pub use swipe::{SwipeDirection, SwipeTracker};
pub use time::Instant;
