//! RP2350 adapters for the control core's hardware traits

pub mod encoders;
pub mod motors;
pub mod photocell;
pub mod resources;
pub mod rps;
pub mod servos;

/// Failures while bringing up the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum BoardError {
    /// A PWM slice did not hand out both channels
    PwmChannel,
    /// The TB6612FNG driver refused its initial state
    MotorDriver,
    /// A servo calibration was rejected
    Servo,
}
