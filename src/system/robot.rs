//! The robot value
//!
//! Owns every hardware collaborator the control activities need. Activities are
//! `impl` blocks on [`Robot`] in [`crate::task`] and take `&mut self`, so only
//! one of them can drive the motors at a time.

use embedded_hal_async::delay::DelayNs;

use crate::system::{
    config::RobotConfig,
    error::Result,
    hardware::{DriveMotor, DriveTrain, EncoderPair, Photocell, PositionSensor, ServoActuator, ServoPair, WheelEncoder},
    pose::RobotPose,
};

pub struct Robot<M, E, P, C, D, S> {
    pub(crate) drive: DriveTrain<M>,
    pub(crate) encoders: EncoderPair<E>,
    pub(crate) rps: P,
    pub(crate) cds: C,
    pub(crate) servos: ServoPair<S>,
    pub(crate) delay: D,
    pub(crate) config: RobotConfig,
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
    /// Bundle the hardware, rejecting a config that fails validation
    pub fn new(
        drive: DriveTrain<M>,
        encoders: EncoderPair<E>,
        rps: P,
        cds: C,
        servos: ServoPair<S>,
        delay: D,
        config: RobotConfig,
    ) -> Result<Self> {
        config.validate()?;
        let mut robot = Self {
            drive,
            encoders,
            rps,
            cds,
            servos,
            delay,
            config,
        };
        robot.drive.stop();
        Ok(robot)
    }

    /// Latest RPS reading, which may be the lost sentinel
    pub fn pose(&mut self) -> RobotPose {
        self.rps.pose()
    }

    pub fn stop(&mut self) {
        self.drive.stop();
    }
}
