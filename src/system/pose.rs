//! Absolute pose readings and heading arithmetic
//!
//! Poses come from the RPS. X and Y are inches on the course, heading is degrees
//! in `[0, 360)` and grows counterclockwise. The RPS reports a lost signal by
//! sending a negative X.

use libm::fmodf;

/// Degrees in a full turn
pub const FULL_TURN: f32 = 360.0;

/// Degrees in a half turn
pub const HALF_TURN: f32 = 180.0;

/// One RPS reading
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RobotPose {
    /// X position in inches
    pub x: f32,
    /// Y position in inches
    pub y: f32,
    /// Heading in degrees, `[0, 360)`
    pub heading: f32,
}

impl RobotPose {
    pub const fn new(x: f32, y: f32, heading: f32) -> Self {
        Self { x, y, heading }
    }

    /// The reading a lost RPS signal produces
    pub const fn lost() -> Self {
        Self::new(-1.0, -1.0, -1.0)
    }

    /// False when the RPS signalled loss (negative X) or sent a non-finite value
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.heading.is_finite() && self.x >= 0.0
    }
}

/// Wrap any angle into `[0, 360)`
pub fn normalize_heading(degrees: f32) -> f32 {
    let wrapped = fmodf(degrees, FULL_TURN);
    let wrapped = if wrapped < 0.0 { wrapped + FULL_TURN } else { wrapped };
    // -1e-6 + 360.0 rounds to 360.0 in f32
    if wrapped >= FULL_TURN {
        0.0
    } else {
        wrapped
    }
}

/// Signed shortest angular distance `current - target`, wrapped into `(-180, 180]`
///
/// Positive means the robot is counterclockwise of the target and has to turn
/// clockwise to reach it. The half-turn tie is reported as `+180`.
pub fn heading_error(current: f32, target: f32) -> f32 {
    let error = normalize_heading(current - target);
    if error > HALF_TURN {
        error - FULL_TURN
    } else {
        error
    }
}
