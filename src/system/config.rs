//! Tuned parameters
//!
//! Every constant that was tuned on the course lives here as a field with a
//! `Default` holding the tuned value. Nothing is read from storage at runtime.

use embassy_time::Duration;

use crate::system::{
    error::{Error, Result},
    kinematics::Kinematics,
    target::Tolerance,
};

/// Open-loop move parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionConfig {
    /// Pause after resetting the encoders, before power is applied
    pub settle: Duration,
    /// Time between encoder reads
    pub poll_interval: Duration,
    /// Encoder reads allowed before a move is abandoned
    pub max_polls: u32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(100),
            poll_interval: Duration::from_millis(5),
            max_polls: 3000,
        }
    }
}

impl MotionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_polls == 0 || self.poll_interval.as_ticks() == 0 {
            return Err(Error::InvalidConfig);
        }
        Ok(())
    }
}

/// How a correction samples the RPS while it drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollingDiscipline {
    /// Drive a short burst, stop, let the reading settle, then re-check the band
    PulseAndCheck { pulse: Duration, settle: Duration },
    /// Keep driving and stop the moment the reading crosses the exact target
    DriveUntilCross { poll_interval: Duration },
}

impl PollingDiscipline {
    pub const fn pulse_and_check() -> Self {
        PollingDiscipline::PulseAndCheck {
            pulse: Duration::from_millis(50),
            settle: Duration::from_millis(100),
        }
    }

    pub const fn drive_until_cross() -> Self {
        PollingDiscipline::DriveUntilCross {
            poll_interval: Duration::from_millis(5),
        }
    }
}

impl Default for PollingDiscipline {
    fn default() -> Self {
        Self::pulse_and_check()
    }
}

/// Closed-loop correction parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CorrectionConfig {
    /// Motor power while correcting, percent
    pub power: f32,
    pub discipline: PollingDiscipline,
    /// Pulses or polls allowed per correction
    pub max_steps: u32,
    /// Time between RPS reads while the signal is lost
    pub signal_poll_interval: Duration,
    /// RPS reads allowed while waiting for the signal to come back
    pub max_signal_loss_polls: u32,
    /// Band used by `correct_x` and `correct_y`
    pub linear_tolerance: Tolerance,
    /// Band used by `correct_heading`
    pub heading_tolerance: Tolerance,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            power: 15.0,
            discipline: PollingDiscipline::default(),
            max_steps: 200,
            signal_poll_interval: Duration::from_millis(20),
            max_signal_loss_polls: 250,
            linear_tolerance: Tolerance::LINEAR,
            heading_tolerance: Tolerance::HEADING,
        }
    }
}

impl CorrectionConfig {
    pub fn validate(&self) -> Result<()> {
        let discipline_ok = match self.discipline {
            PollingDiscipline::PulseAndCheck { pulse, .. } => pulse.as_ticks() > 0,
            PollingDiscipline::DriveUntilCross { poll_interval } => poll_interval.as_ticks() > 0,
        };
        if !discipline_ok
            || !(self.power > 0.0 && self.power <= 100.0)
            || self.max_steps == 0
            || self.signal_poll_interval.as_ticks() == 0
        {
            return Err(Error::InvalidConfig);
        }
        Ok(())
    }
}

/// Condition that counts as the start light coming on
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartThreshold {
    /// Reading has dropped at least this many volts below the ambient level
    BelowAmbient(f32),
    /// Reading is at or below this voltage regardless of ambient
    Absolute(f32),
}

impl StartThreshold {
    /// True when `reading` counts as the light being on
    pub fn is_lit(&self, ambient: f32, reading: f32) -> bool {
        match *self {
            StartThreshold::BelowAmbient(margin) => reading <= ambient - margin,
            StartThreshold::Absolute(volts) => reading <= volts,
        }
    }
}

impl Default for StartThreshold {
    fn default() -> Self {
        StartThreshold::BelowAmbient(0.5)
    }
}

/// Photocell timing and color bands
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LightConfig {
    pub start_poll_interval: Duration,
    pub start_threshold: StartThreshold,
    pub color_poll_interval: Duration,
    /// Red matches when the drop is within this margin of the calibrated red drop
    pub red_margin: f32,
    /// Lower edge of the blue band as a fraction of the red drop
    pub blue_min_ratio: f32,
    /// Upper edge of the blue band as a fraction of the red drop
    pub blue_max_ratio: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            start_poll_interval: Duration::from_millis(10),
            start_threshold: StartThreshold::default(),
            color_poll_interval: Duration::from_millis(5),
            red_margin: 0.25,
            blue_min_ratio: 0.20,
            blue_max_ratio: 0.45,
        }
    }
}

impl LightConfig {
    pub fn validate(&self) -> Result<()> {
        let threshold_ok = match self.start_threshold {
            StartThreshold::BelowAmbient(margin) => margin.is_finite() && margin > 0.0,
            StartThreshold::Absolute(volts) => volts.is_finite() && volts > 0.0,
        };
        let ratios_ok = self.blue_min_ratio >= 0.0
            && self.blue_min_ratio < self.blue_max_ratio
            && self.blue_max_ratio < 1.0;
        if !threshold_ok
            || !ratios_ok
            || !(self.red_margin.is_finite() && self.red_margin >= 0.0)
            || self.start_poll_interval.as_ticks() == 0
            || self.color_poll_interval.as_ticks() == 0
        {
            return Err(Error::InvalidConfig);
        }
        Ok(())
    }

    /// True when the red and blue bands share values for this red drop
    pub fn bands_overlap(&self, red_delta: f32) -> bool {
        red_delta * self.blue_max_ratio >= red_delta - self.red_margin
    }
}

/// Everything a [`Robot`](crate::system::robot::Robot) is tuned with
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RobotConfig {
    pub kinematics: Kinematics,
    pub motion: MotionConfig,
    pub correction: CorrectionConfig,
    pub light: LightConfig,
}

impl RobotConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.kinematics.is_valid() {
            return Err(Error::InvalidConfig);
        }
        self.motion.validate()?;
        self.correction.validate()?;
        self.light.validate()
    }
}
