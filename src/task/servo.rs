//! Hobby servo control
//!
//! Each servo is calibrated by the pulse widths that reach its two end stops.
//! Positions in between are mapped linearly.

use embedded_hal::pwm::SetDutyCycle;
use embedded_hal_async::delay::DelayNs;
use libm::roundf;

use crate::system::{
    error::{Error, Result},
    hardware::{DriveMotor, Photocell, PositionSensor, ServoActuator, WheelEncoder},
    robot::Robot,
};

/// Servo refresh period in microseconds (50 Hz)
pub const FRAME_US: u32 = 20_000;

/// Pulse widths at the end stops of one servo
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoCalibration {
    pub min_pulse_us: u32,
    pub max_pulse_us: u32,
    pub max_degree: f32,
}

/// Arm servo
pub const MAIN_SERVO: ServoCalibration = ServoCalibration {
    min_pulse_us: 725,
    max_pulse_us: 2468,
    max_degree: 180.0,
};

/// Lever servo
pub const LEVER_SERVO: ServoCalibration = ServoCalibration {
    min_pulse_us: 514,
    max_pulse_us: 2430,
    max_degree: 180.0,
};

impl Default for ServoCalibration {
    fn default() -> Self {
        Self {
            min_pulse_us: 500,
            max_pulse_us: 2500,
            max_degree: 180.0,
        }
    }
}

impl ServoCalibration {
    pub fn validate(&self) -> Result<()> {
        if self.min_pulse_us >= self.max_pulse_us
            || self.max_pulse_us > FRAME_US
            || !(self.max_degree.is_finite() && self.max_degree > 0.0)
        {
            return Err(Error::InvalidConfig);
        }
        Ok(())
    }

    /// Pulse width for `degree`, clamped to the calibrated range
    pub fn pulse_for_degree(&self, degree: f32) -> u32 {
        let degree = if degree.is_nan() {
            0.0
        } else {
            degree.clamp(0.0, self.max_degree)
        };
        let span = (self.max_pulse_us - self.min_pulse_us) as f32;
        let pulse = roundf(self.min_pulse_us as f32 + span * degree / self.max_degree) as u32;
        pulse.clamp(self.min_pulse_us, self.max_pulse_us)
    }
}

/// Servo on one PWM channel running at a 20 ms period
pub struct PwmServo<P> {
    pwm: P,
    calibration: ServoCalibration,
}

impl<P: SetDutyCycle> PwmServo<P> {
    pub fn new(pwm: P, calibration: ServoCalibration) -> Result<Self> {
        calibration.validate()?;
        Ok(Self { pwm, calibration })
    }

    fn set_pulse_us(&mut self, pulse_us: u32) -> core::result::Result<(), P::Error> {
        // validate() keeps every pulse below FRAME_US, which fits in u16
        let pulse = pulse_us.min(FRAME_US) as u16;
        self.pwm.set_duty_cycle_fraction(pulse, FRAME_US as u16)
    }
}

impl<P: SetDutyCycle> ServoActuator for PwmServo<P> {
    fn set_degree(&mut self, degree: f32) {
        let pulse = self.calibration.pulse_for_degree(degree);
        debug!("servo to {} deg, {} us", degree, pulse);
        if self.set_pulse_us(pulse).is_err() {
            warn!("servo pwm rejected {} us", pulse);
        }
    }

    fn release(&mut self) {
        if self.pwm.set_duty_cycle_fully_off().is_err() {
            warn!("servo pwm rejected release");
        }
    }
}

impl<M, E, P, C, D, S> Robot<M, E, P, C, D, S>
where
    M: DriveMotor,
    E: WheelEncoder,
    P: PositionSensor,
    C: Photocell,
    D: DelayNs,
    S: ServoActuator,
{
    pub fn set_arm(&mut self, degree: f32) {
        self.servos.arm.set_degree(degree);
    }

    pub fn set_lever(&mut self, degree: f32) {
        self.servos.lever.set_degree(degree);
    }

    /// Let both servos go limp, usually at the end of a run
    pub fn release_servos(&mut self) {
        self.servos.release();
    }
}
