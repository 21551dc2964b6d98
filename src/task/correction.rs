//! Closed-loop position correction against the RPS
//!
//! Open-loop moves drift. After each one the robot reads its absolute pose,
//! compares one axis against a target and nudges itself until the reading sits
//! inside the tolerance band.
//!
//! # Direction
//! - X and Y: forward while the reading is short of the goal, backward once it
//!   is past it. The robot is expected to face along the positive axis.
//! - Heading: the signed error `current - target` is wrapped into
//!   `(-180, 180]`. A positive error turns clockwise (right), a negative one
//!   counterclockwise (left). The exact half-turn turns clockwise.
//!
//! # Disciplines
//! See [`PollingDiscipline`]. Pulses and polls both draw on the same step
//! budget. Waiting out a lost signal does not.
//!
//! # Lost signal
//! A reading with negative X stops every motor at once. The robot then holds
//! and re-reads on its own budget. When the signal returns the correction picks
//! up where it left off.

use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;

use crate::system::{
    budget::{wait, Budget, Exhausted},
    config::PollingDiscipline,
    drive_command::{Direction, DriveCommand, Rotation},
    error::{Error, Result},
    hardware::{DriveMotor, Photocell, PositionSensor, WheelEncoder},
    pose::RobotPose,
    robot::Robot,
    target::{Axis, Target, Tolerance},
};

/// Which way a correction drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Correction {
    Drive(Direction),
    Turn(Rotation),
}

impl Correction {
    pub fn command(self, power: f32) -> DriveCommand {
        match self {
            Correction::Drive(direction) => DriveCommand::straight(direction, power),
            Correction::Turn(rotation) => DriveCommand::rotate(rotation, power),
        }
    }
}

/// Direction that reduces `error` (`current - goal`) on `axis`
pub fn correction_for(axis: Axis, error: f32) -> Correction {
    match axis {
        Axis::X | Axis::Y if error < 0.0 => Correction::Drive(Direction::Forward),
        Axis::X | Axis::Y => Correction::Drive(Direction::Backward),
        Axis::Heading if error > 0.0 => Correction::Turn(Rotation::Right),
        Axis::Heading => Correction::Turn(Rotation::Left),
    }
}

/// Summary of a successful correction
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CorrectionReport {
    /// Runs in one direction; zero when the robot was already in the band
    pub passes: u32,
    /// Pulses or polls spent
    pub steps: u32,
    /// RPS reads spent waiting for a lost signal
    pub signal_loss_polls: u32,
    /// Error at the final reading
    pub final_error: f32,
}

struct Progress {
    steps: Budget,
    passes: u32,
    signal_loss_polls: u32,
}

impl Progress {
    fn report(&self, final_error: f32) -> CorrectionReport {
        CorrectionReport {
            passes: self.passes,
            steps: self.steps.used(),
            signal_loss_polls: self.signal_loss_polls,
            final_error,
        }
    }
}

/// A valid reading, and whether a signal loss was waited out to get it
struct Sample {
    pose: RobotPose,
    recovered: bool,
}

impl<M, E, P, C, D, S> Robot<M, E, P, C, D, S>
where
    M: DriveMotor,
    E: WheelEncoder,
    P: PositionSensor,
    C: Photocell,
    D: DelayNs,
{
    /// Drive until the RPS reading for `target` lies within `tolerance`
    ///
    /// Returns at once, without moving, when the robot is already in the band.
    /// A goal that is not finite is rejected before anything moves. Motors are
    /// stopped whenever this returns.
    pub async fn correct(&mut self, target: Target, tolerance: Tolerance) -> Result<CorrectionReport> {
        if !target.goal().is_finite() {
            return Err(Error::InvalidConfig);
        }
        let config = self.config.correction;
        let mut progress = Progress {
            steps: Budget::new(config.max_steps),
            passes: 0,
            signal_loss_polls: 0,
        };

        let sample = self.sample(&mut progress.signal_loss_polls).await?;
        let error = target.error(&sample.pose);
        info!("correct {:?} to {} from error {}", target.axis(), target.goal(), error);

        if tolerance.contains(error) {
            return Ok(progress.report(error));
        }

        let result = match config.discipline {
            PollingDiscipline::PulseAndCheck { pulse, settle } => {
                self.pulse_and_check(target, tolerance, error, pulse, settle, &mut progress)
                    .await
            }
            PollingDiscipline::DriveUntilCross { poll_interval } => {
                self.drive_until_cross(target, tolerance, error, poll_interval, &mut progress)
                    .await
            }
        };
        self.drive.stop();

        match &result {
            Ok(report) => info!(
                "correction done: error {} after {} steps in {} passes",
                report.final_error,
                report.steps,
                report.passes
            ),
            Err(e) => warn!("correction failed: {:?}", e),
        }
        result
    }

    pub async fn correct_x(&mut self, x: f32) -> Result<CorrectionReport> {
        let tolerance = self.config.correction.linear_tolerance;
        self.correct(Target::AbsoluteX(x), tolerance).await
    }

    pub async fn correct_y(&mut self, y: f32) -> Result<CorrectionReport> {
        let tolerance = self.config.correction.linear_tolerance;
        self.correct(Target::AbsoluteY(y), tolerance).await
    }

    pub async fn correct_heading(&mut self, degrees: f32) -> Result<CorrectionReport> {
        let tolerance = self.config.correction.heading_tolerance;
        self.correct(Target::Heading(degrees), tolerance).await
    }

    async fn pulse_and_check(
        &mut self,
        target: Target,
        tolerance: Tolerance,
        mut error: f32,
        pulse: Duration,
        settle: Duration,
        progress: &mut Progress,
    ) -> Result<CorrectionReport> {
        let axis = target.axis();
        let power = self.config.correction.power;
        let mut previous = None;

        loop {
            let correction = correction_for(axis, error);
            if previous != Some(correction) {
                progress.passes += 1;
                previous = Some(correction);
                log_direction(axis, correction, error);
            }

            if progress.steps.try_spend().is_err() {
                return Err(Error::TargetNotReached { axis, error });
            }

            self.drive.apply(correction.command(power));
            wait(&mut self.delay, pulse).await;
            self.drive.stop();
            wait(&mut self.delay, settle).await;

            let sample = self.sample(&mut progress.signal_loss_polls).await?;
            error = target.error(&sample.pose);
            trace!("pulse {} error {}", progress.steps.used(), error);

            if tolerance.contains(error) {
                return Ok(progress.report(error));
            }
        }
    }

    async fn drive_until_cross(
        &mut self,
        target: Target,
        tolerance: Tolerance,
        mut error: f32,
        poll_interval: Duration,
        progress: &mut Progress,
    ) -> Result<CorrectionReport> {
        let axis = target.axis();
        let power = self.config.correction.power;

        let mut correction = correction_for(axis, error);
        let mut started_positive = error > 0.0;
        progress.passes = 1;
        log_direction(axis, correction, error);
        self.drive.apply(correction.command(power));

        loop {
            if progress.steps.try_spend().is_err() {
                return Err(Error::TargetNotReached { axis, error });
            }
            wait(&mut self.delay, poll_interval).await;

            let sample = self.sample(&mut progress.signal_loss_polls).await?;
            if sample.recovered {
                // same pass, same direction
                self.drive.apply(correction.command(power));
            }
            error = target.error(&sample.pose);
            trace!("poll {} error {}", progress.steps.used(), error);

            let crossed = error == 0.0 || (error > 0.0) != started_positive;
            if !crossed {
                continue;
            }

            self.drive.stop();
            if tolerance.contains(error) {
                return Ok(progress.report(error));
            }

            // overshot past the band, come back the other way
            correction = correction_for(axis, error);
            started_positive = error > 0.0;
            progress.passes += 1;
            log_direction(axis, correction, error);
            self.drive.apply(correction.command(power));
        }
    }

    /// Read the RPS, holding still until the signal comes back if it is lost
    async fn sample(&mut self, lost_polls: &mut u32) -> Result<Sample> {
        let pose = self.rps.pose();
        if pose.is_valid() {
            return Ok(Sample {
                pose,
                recovered: false,
            });
        }

        self.drive.stop();
        warn!("RPS signal lost, holding");

        let config = self.config.correction;
        let mut hold = Budget::new(config.max_signal_loss_polls);
        loop {
            if let Err(Exhausted { spent }) = hold.try_spend() {
                *lost_polls += spent;
                error!("RPS signal did not come back after {} polls", spent);
                return Err(Error::SignalLost { polls: spent });
            }
            wait(&mut self.delay, config.signal_poll_interval).await;
            let pose = self.rps.pose();
            if pose.is_valid() {
                *lost_polls += hold.used();
                info!("RPS signal back after {} polls", hold.used());
                return Ok(Sample {
                    pose,
                    recovered: true,
                });
            }
        }
    }
}

fn log_direction(axis: Axis, correction: Correction, error: f32) {
    match correction {
        Correction::Drive(Direction::Forward) => debug!("{:?} too short by {}", axis, -error),
        Correction::Drive(Direction::Backward) => debug!("{:?} too far by {}", axis, error),
        Correction::Turn(rotation) => debug!("heading off by {}, turning {:?}", error, rotation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_axes_drive_toward_the_goal() {
        assert_eq!(correction_for(Axis::X, -2.0), Correction::Drive(Direction::Forward));
        assert_eq!(correction_for(Axis::Y, 0.7), Correction::Drive(Direction::Backward));
    }

    #[test]
    fn heading_sign_picks_the_rotation() {
        // 350 -> 0 is 10 degrees counterclockwise
        assert_eq!(correction_for(Axis::Heading, -10.0), Correction::Turn(Rotation::Left));
        assert_eq!(correction_for(Axis::Heading, 20.0), Correction::Turn(Rotation::Right));
    }

    #[test]
    fn half_turn_tie_turns_clockwise() {
        assert_eq!(correction_for(Axis::Heading, 180.0), Correction::Turn(Rotation::Right));
    }

    #[test]
    fn correction_command_uses_chassis_polarity() {
        let command = Correction::Turn(Rotation::Right).command(15.0);
        assert_eq!(command, DriveCommand::rotate(Rotation::Right, 15.0));
        let command = Correction::Drive(Direction::Forward).command(15.0);
        assert_eq!(command.right_front, -15.0);
    }
}
