//! Swipe direction classification

use crate::config::SwipeConfig;
use crate::math::Vec3;

/// Direction of a completed swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
    Forward,
    Backward,
}

impl SwipeDirection {
    /// Unit vector pointing along this direction
    pub fn unit(self) -> Vec3 {
        match self {
            SwipeDirection::Right => Vec3::RIGHT,
            SwipeDirection::Left => -Vec3::RIGHT,
            SwipeDirection::Up => Vec3::UP,
            SwipeDirection::Down => -Vec3::UP,
            SwipeDirection::Forward => Vec3::FORWARD,
            SwipeDirection::Backward => -Vec3::FORWARD,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, SwipeDirection::Left | SwipeDirection::Right)
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, SwipeDirection::Up | SwipeDirection::Down)
    }
}

/// Classify a displacement
///
/// The axis with strictly the largest magnitude wins; a tie between the top
/// two axes is ambiguous. The winning component of the unit displacement
/// must also exceed that axis' threshold. Returns `None` when no direction
/// qualifies, including for a zero displacement.
pub fn classify(displacement: Vec3, config: &SwipeConfig) -> Option<SwipeDirection> {
    let length_sq = displacement.length_squared();
    if length_sq == 0.0 || !length_sq.is_finite() {
        return None;
    }

    let a = displacement.abs();

    // |component| / |d| > t  <=>  component^2 > t^2 * |d|^2
    let dominant = |component: f32, threshold: f32| component * component > threshold * threshold * length_sq;

    if a.x > a.y && a.x > a.z {
        dominant(a.x, config.horizontal_threshold).then(|| {
            if displacement.x > 0.0 {
                SwipeDirection::Right
            } else {
                SwipeDirection::Left
            }
        })
    } else if a.y > a.x && a.y > a.z {
        dominant(a.y, config.vertical_threshold).then(|| {
            if displacement.y > 0.0 {
                SwipeDirection::Up
            } else {
                SwipeDirection::Down
            }
        })
    } else if a.z > a.x && a.z > a.y {
        dominant(a.z, config.depth_threshold).then(|| {
            if displacement.z > 0.0 {
                SwipeDirection::Forward
            } else {
                SwipeDirection::Backward
            }
        })
    } else {
        None
    }
}
