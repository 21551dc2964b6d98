//! Drive commands
//!
//! A [`DriveCommand`] holds one signed percent power per wheel. The chassis has
//! the right-hand motors mounted mirrored, so driving straight means opposite
//! signs on the two sides and rotating in place means the same sign on all
//! four.

/// Largest power magnitude a motor accepts
pub const MAX_PERCENT: f32 = 100.0;

/// Straight-line travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Forward,
    Backward,
}

/// In-place rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    /// Counterclockwise, heading increases
    Left,
    /// Clockwise, heading decreases
    Right,
}

/// Signed percent power for each wheel
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriveCommand {
    pub left_front: f32,
    pub right_front: f32,
    pub left_back: f32,
    pub right_back: f32,
}

impl DriveCommand {
    /// All motors off
    pub const fn stop() -> Self {
        Self {
            left_front: 0.0,
            right_front: 0.0,
            left_back: 0.0,
            right_back: 0.0,
        }
    }

    pub fn straight(direction: Direction, percent: f32) -> Self {
        let power = clamp_percent(percent);
        let power = match direction {
            Direction::Forward => power,
            Direction::Backward => -power,
        };
        Self {
            left_front: power,
            right_front: -power,
            left_back: power,
            right_back: -power,
        }
    }

    pub fn rotate(rotation: Rotation, percent: f32) -> Self {
        let power = clamp_percent(percent);
        let power = match rotation {
            Rotation::Left => -power,
            Rotation::Right => power,
        };
        Self {
            left_front: power,
            right_front: power,
            left_back: power,
            right_back: power,
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.left_front == 0.0 && self.right_front == 0.0 && self.left_back == 0.0 && self.right_back == 0.0
    }
}

/// Clamp into `[-100, 100]`, mapping NaN to zero
pub fn clamp_percent(percent: f32) -> f32 {
    if percent.is_nan() {
        0.0
    } else {
        percent.clamp(-MAX_PERCENT, MAX_PERCENT)
    }
}
