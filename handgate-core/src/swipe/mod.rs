//! Swipe detection
//!
//! Tracks each hand's index fingertip from the moment it appears and
//! reports a swipe once it has travelled far enough, fast enough, along
//! one dominant axis.

pub mod direction;
pub mod tracker;

pub use direction::{classify, SwipeDirection};
pub use tracker::SwipeTracker;
