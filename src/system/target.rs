//! Correction targets and tolerance bands

use libm::fabsf;

use crate::system::{
    error::{Error, Result},
    pose::{heading_error, normalize_heading, RobotPose},
};

/// Which RPS value a correction works on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    X,
    Y,
    Heading,
}

impl Axis {
    /// Read this axis out of a pose
    pub fn read(self, pose: &RobotPose) -> f32 {
        match self {
            Axis::X => pose.x,
            Axis::Y => pose.y,
            Axis::Heading => pose.heading,
        }
    }
}

/// Goal of one correction call
///
/// Relative targets are measured from an origin the caller captured earlier,
/// usually a landmark from the calibration baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Target {
    AbsoluteX(f32),
    AbsoluteY(f32),
    RelativeX { origin: f32, delta: f32 },
    RelativeY { origin: f32, delta: f32 },
    Heading(f32),
}

impl Target {
    pub fn axis(&self) -> Axis {
        match self {
            Target::AbsoluteX(_) | Target::RelativeX { .. } => Axis::X,
            Target::AbsoluteY(_) | Target::RelativeY { .. } => Axis::Y,
            Target::Heading(_) => Axis::Heading,
        }
    }

    /// Resolved goal value; headings are wrapped into `[0, 360)`
    pub fn goal(&self) -> f32 {
        match *self {
            Target::AbsoluteX(value) | Target::AbsoluteY(value) => value,
            Target::RelativeX { origin, delta } | Target::RelativeY { origin, delta } => origin + delta,
            Target::Heading(value) => normalize_heading(value),
        }
    }

    /// Signed error `current - goal`
    ///
    /// Headings use the shortest angular distance, see [`heading_error`].
    pub fn error(&self, pose: &RobotPose) -> f32 {
        let current = self.axis().read(pose);
        match self.axis() {
            Axis::Heading => heading_error(current, self.goal()),
            Axis::X | Axis::Y => current - self.goal(),
        }
    }
}

/// Acceptance half-width around a target
///
/// Strictly positive. Sized to absorb RPS jitter, so it is never zero.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tolerance(f32);

impl Tolerance {
    /// Default band for X and Y corrections, in inches
    pub const LINEAR: Tolerance = Tolerance(0.2);
    /// Default band for heading corrections, in degrees
    pub const HEADING: Tolerance = Tolerance(1.0);

    pub fn new(width: f32) -> Result<Self> {
        if width.is_finite() && width > 0.0 {
            Ok(Self(width))
        } else {
            Err(Error::InvalidTolerance)
        }
    }

    pub fn width(self) -> f32 {
        self.0
    }

    /// True when `error` lies inside the band, edges included
    pub fn contains(self, error: f32) -> bool {
        fabsf(error) <= self.0
    }
}
