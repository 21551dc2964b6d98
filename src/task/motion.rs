//! Open-loop motion primitives
//!
//! Moves are measured on two diagonally opposite encoders (front-left and
//! back-right) and end when the slower of the two reaches the target count.
//! Power is cut without a ramp. Slip and stall are only caught by the poll
//! budget, which is why every move should be followed by a correction.
//!
//! # Sequence
//! 1. Reset both encoders and let the chassis settle
//! 2. Convert the displacement into counts
//! 3. Apply the drive command
//! 4. Poll until both encoders reach the count or the budget runs out
//! 5. Stop all four motors

use embedded_hal_async::delay::DelayNs;
use libm::fabsf;

use crate::system::{
    budget::{poll_until, wait, Exhausted, PollPolicy, Polled},
    drive_command::{Direction, DriveCommand, Rotation},
    error::{Error, Result},
    hardware::{DriveMotor, Photocell, PositionSensor, WheelEncoder},
    robot::Robot,
};

/// Outcome of a completed open-loop move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MoveReport {
    /// Counts both encoders had to reach
    pub target_counts: u32,
    /// Front-left count when the move ended
    pub front_left: u32,
    /// Back-right count when the move ended
    pub back_right: u32,
    /// Encoder reads made
    pub polls: u32,
}

impl<M, E, P, C, D, S> Robot<M, E, P, C, D, S>
where
    M: DriveMotor,
    E: WheelEncoder,
    P: PositionSensor,
    C: Photocell,
    D: DelayNs,
{
    /// Drive straight for `inches` at `percent` power
    ///
    /// The sign of `inches` is ignored; `direction` picks the way.
    pub async fn move_straight(&mut self, direction: Direction, percent: f32, inches: f32) -> Result<MoveReport> {
        check_inputs(percent, inches)?;
        let counts = self.config.kinematics.counts_for_distance(fabsf(inches)).unsigned_abs();
        info!("move {:?} {} in at {}%", direction, inches, percent);
        self.run_counted(DriveCommand::straight(direction, percent), counts).await
    }

    /// Rotate in place by `degrees` at `percent` power
    ///
    /// The sign of `degrees` is ignored; `rotation` picks the way.
    pub async fn turn(&mut self, rotation: Rotation, percent: f32, degrees: f32) -> Result<MoveReport> {
        check_inputs(percent, degrees)?;
        let counts = self.config.kinematics.counts_for_rotation(fabsf(degrees)).unsigned_abs();
        info!("turn {:?} {} deg at {}%", rotation, degrees, percent);
        self.run_counted(DriveCommand::rotate(rotation, percent), counts).await
    }

    async fn run_counted(&mut self, command: DriveCommand, target_counts: u32) -> Result<MoveReport> {
        let motion = self.config.motion;
        self.encoders.reset();
        wait(&mut self.delay, motion.settle).await;

        self.drive.apply(command);

        let encoders = &mut self.encoders;
        let mut last = (0, 0);
        let policy = PollPolicy::new(motion.poll_interval, motion.max_polls);
        let outcome = poll_until(&mut self.delay, policy, |_| {
            let (front_left, back_right) = encoders.counts();
            last = (front_left, back_right);
            trace!("encoders fl={} br={} target={}", front_left, back_right, target_counts);
            // keep going while either wheel is short
            (front_left >= target_counts && back_right >= target_counts).then_some((front_left, back_right))
        })
        .await;

        self.drive.stop();

        match outcome {
            Ok(Polled {
                value: (front_left, back_right),
                polls,
            }) => {
                debug!("move done after {} polls", polls);
                Ok(MoveReport {
                    target_counts,
                    front_left,
                    back_right,
                    polls,
                })
            }
            Err(Exhausted { spent }) => {
                warn!(
                    "move abandoned after {} polls: fl={} br={} target={}",
                    spent,
                    last.0,
                    last.1,
                    target_counts
                );
                Err(Error::MoveIncomplete {
                    target_counts,
                    front_left: last.0,
                    back_right: last.1,
                })
            }
        }
    }
}

/// Reject NaN or infinite power and displacement before anything moves
fn check_inputs(percent: f32, amount: f32) -> Result<()> {
    if !percent.is_finite() || !amount.is_finite() {
        warn!("rejected move: {}% for {}", percent, amount);
        return Err(Error::InvalidConfig);
    }
    Ok(())
}
