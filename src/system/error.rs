//! Error types
//!
//! Every polling loop in the crate is bounded, so the failures a caller can see
//! are either a rejected configuration or a budget that ran out before the goal
//! was reached.

use core::fmt;

use crate::system::target::Axis;

/// Crate-wide result alias
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Everything that can go wrong in the control core
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Tolerance was zero, negative or not a number
    InvalidTolerance,
    /// Calibration baseline holds a value that cannot be used
    InvalidCalibration,
    /// A configuration struct failed validation
    InvalidConfig,
    /// Correction ran out of steps before the reading entered the tolerance band
    TargetNotReached {
        /// Axis that was being corrected
        axis: Axis,
        /// Signed error (`current - target`) at the last valid reading
        error: f32,
    },
    /// The position signal did not come back within the hold budget
    SignalLost {
        /// Number of polls spent waiting
        polls: u32,
    },
    /// Open-loop move ran out of polls before both encoders reached the target
    MoveIncomplete {
        target_counts: u32,
        front_left: u32,
        back_right: u32,
    },
    /// An RPS frame could not be parsed
    BadFrame,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidTolerance => f.write_str("tolerance must be a positive, finite value"),
            Error::InvalidCalibration => f.write_str("calibration baseline is not usable"),
            Error::InvalidConfig => f.write_str("configuration is not valid"),
            Error::TargetNotReached { axis, error } => {
                write!(f, "{axis:?} correction gave up {error} away from target")
            }
            Error::SignalLost { polls } => write!(f, "position signal lost for {polls} polls"),
            Error::MoveIncomplete {
                target_counts,
                front_left,
                back_right,
            } => write!(
                f,
                "move stopped short of {target_counts} counts (FL {front_left}, BR {back_right})"
            ),
            Error::BadFrame => f.write_str("malformed RPS frame"),
        }
    }
}
