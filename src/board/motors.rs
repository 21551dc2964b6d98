//! Drive motors on two TB6612FNG drivers
//!
//! Each driver runs the motors of one side: channel A front, channel B back.
//! The standby pins are driven high for as long as [`Standby`] is alive.

use course_robot::system::hardware::{DriveMotor, DriveTrain};
use defmt::warn;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::pwm::{self, Pwm, PwmOutput};
use libm::{fabsf, roundf};
use tb6612fng::{DriveCommand, Motor};

use super::{resources::MotorResources, BoardError};

/// PWM frequency for the motor drivers
///
/// Cheaper DC motors often behave better at lower frequencies.
const MOTOR_PWM_HZ: u32 = 10_000;

type DriverMotor = Motor<Output<'static>, Output<'static>, PwmOutput<'static>>;

/// One TB6612FNG channel
pub struct BoardMotor {
    motor: DriverMotor,
}

impl DriveMotor for BoardMotor {
    fn set_percent(&mut self, percent: f32) {
        let speed = roundf(fabsf(percent)).min(100.0) as u8;
        let command = if speed == 0 {
            DriveCommand::Stop
        } else if percent > 0.0 {
            DriveCommand::Forward(speed)
        } else {
            DriveCommand::Backward(speed)
        };
        if self.motor.drive(command).is_err() {
            warn!("motor driver rejected {}%", speed);
        }
    }
}

/// Keeps both drivers out of standby
pub struct Standby {
    _left: Output<'static>,
    _right: Output<'static>,
}

fn pwm_config() -> pwm::Config {
    let clock_freq_hz = embassy_rp::clocks::clk_sys_freq();
    // smallest divider that keeps the period within 16 bits
    let divider = ((clock_freq_hz / MOTOR_PWM_HZ) / 65535 + 1) as u8;
    let period = (clock_freq_hz / (MOTOR_PWM_HZ * divider as u32)) as u16 - 1;

    let mut config = pwm::Config::default();
    config.divider = divider.into();
    config.top = period;
    config
}

fn motor(in1: Output<'static>, in2: Output<'static>, pwm: PwmOutput<'static>) -> Result<BoardMotor, BoardError> {
    let motor = Motor::new(in1, in2, pwm).map_err(|_| BoardError::MotorDriver)?;
    Ok(BoardMotor { motor })
}

/// Bring up both drivers with all four motors stopped
pub fn drive_train(r: MotorResources) -> Result<(DriveTrain<BoardMotor>, Standby), BoardError> {
    let config = pwm_config();

    let left = Pwm::new_output_ab(r.left_slice, r.left_front_pwm_pin, r.left_back_pwm_pin, config.clone());
    let (Some(left_front_pwm), Some(left_back_pwm)) = left.split() else {
        return Err(BoardError::PwmChannel);
    };
    let right = Pwm::new_output_ab(r.right_slice, r.right_front_pwm_pin, r.right_back_pwm_pin, config);
    let (Some(right_front_pwm), Some(right_back_pwm)) = right.split() else {
        return Err(BoardError::PwmChannel);
    };

    let mut drive = DriveTrain::new(
        motor(
            Output::new(r.left_front_in1_pin, Level::Low),
            Output::new(r.left_front_in2_pin, Level::Low),
            left_front_pwm,
        )?,
        motor(
            Output::new(r.right_front_in1_pin, Level::Low),
            Output::new(r.right_front_in2_pin, Level::Low),
            right_front_pwm,
        )?,
        motor(
            Output::new(r.left_back_in1_pin, Level::Low),
            Output::new(r.left_back_in2_pin, Level::Low),
            left_back_pwm,
        )?,
        motor(
            Output::new(r.right_back_in1_pin, Level::Low),
            Output::new(r.right_back_in2_pin, Level::Low),
            right_back_pwm,
        )?,
    );
    drive.stop();

    let standby = Standby {
        _left: Output::new(r.left_standby_pin, Level::High),
        _right: Output::new(r.right_standby_pin, Level::High),
    };
    Ok((drive, standby))
}
