//! Servo outputs at 50 Hz

use course_robot::{
    system::hardware::ServoPair,
    task::servo::{PwmServo, LEVER_SERVO, MAIN_SERVO},
};
use embassy_rp::pwm::{self, Pwm, PwmOutput};

use super::{resources::ServoResources, BoardError};

/// Servo frame rate
const SERVO_PWM_HZ: u32 = 50;

/// Clock divider that brings a 50 Hz period within 16 bits
const DIVIDER: u8 = 64;

pub type BoardServo = PwmServo<PwmOutput<'static>>;

fn pwm_config() -> pwm::Config {
    let clock_freq_hz = embassy_rp::clocks::clk_sys_freq();
    let mut config = pwm::Config::default();
    config.divider = DIVIDER.into();
    config.top = (clock_freq_hz / (SERVO_PWM_HZ * u32::from(DIVIDER))) as u16 - 1;
    config
}

/// Arm and lever servos, both idle until the first command
pub fn servos(r: ServoResources) -> Result<ServoPair<BoardServo>, BoardError> {
    let main = Pwm::new_output_b(r.main_slice, r.main_pin, pwm_config());
    let (_, Some(main)) = main.split() else {
        return Err(BoardError::PwmChannel);
    };
    let lever = Pwm::new_output_a(r.lever_slice, r.lever_pin, pwm_config());
    let (Some(lever), _) = lever.split() else {
        return Err(BoardError::PwmChannel);
    };

    let arm = PwmServo::new(main, MAIN_SERVO).map_err(|_| BoardError::Servo)?;
    let lever = PwmServo::new(lever, LEVER_SERVO).map_err(|_| BoardError::Servo)?;
    Ok(ServoPair::new(arm, lever))
}
