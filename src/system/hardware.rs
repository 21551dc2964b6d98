//! Hardware seams
//!
//! The control core never touches a peripheral directly. The board binary
//! implements these traits on top of embassy-rp drivers; the integration tests
//! implement them on a simulated course.

use crate::system::{drive_command::DriveCommand, pose::RobotPose};

/// Absolute position system (RPS) reader
pub trait PositionSensor {
    fn x(&mut self) -> f32;
    fn y(&mut self) -> f32;
    fn heading(&mut self) -> f32;

    /// Full reading. Implementations with an atomic snapshot should override this.
    fn pose(&mut self) -> RobotPose {
        RobotPose::new(self.x(), self.y(), self.heading())
    }
}

/// One motor channel driven by signed percent power
pub trait DriveMotor {
    /// `percent` is in `[-100, 100]`; positive spins the shaft forward
    fn set_percent(&mut self, percent: f32);

    fn stop(&mut self) {
        self.set_percent(0.0);
    }
}

/// Shaft encoder counting edges since the last reset
pub trait WheelEncoder {
    fn reset_count(&mut self);
    fn count(&mut self) -> u32;
}

/// CdS cell voltage; lower values mean more light
pub trait Photocell {
    fn value(&mut self) -> f32;
}

/// Position servo
pub trait ServoActuator {
    fn set_degree(&mut self, degree: f32);

    /// Stop holding position so the servo goes limp
    fn release(&mut self);
}

/// The four drive motors
pub struct DriveTrain<M> {
    pub left_front: M,
    pub right_front: M,
    pub left_back: M,
    pub right_back: M,
}

impl<M: DriveMotor> DriveTrain<M> {
    pub fn new(left_front: M, right_front: M, left_back: M, right_back: M) -> Self {
        Self {
            left_front,
            right_front,
            left_back,
            right_back,
        }
    }

    pub fn apply(&mut self, command: DriveCommand) {
        trace!(
            "drive lf={} rf={} lb={} rb={}",
            command.left_front,
            command.right_front,
            command.left_back,
            command.right_back
        );
        self.left_front.set_percent(command.left_front);
        self.right_front.set_percent(command.right_front);
        self.left_back.set_percent(command.left_back);
        self.right_back.set_percent(command.right_back);
    }

    pub fn stop(&mut self) {
        self.left_front.stop();
        self.right_front.stop();
        self.left_back.stop();
        self.right_back.stop();
    }
}

/// The two encoders a move is measured with, on diagonally opposite wheels
pub struct EncoderPair<E> {
    pub front_left: E,
    pub back_right: E,
}

impl<E: WheelEncoder> EncoderPair<E> {
    pub fn new(front_left: E, back_right: E) -> Self {
        Self { front_left, back_right }
    }

    pub fn reset(&mut self) {
        self.front_left.reset_count();
        self.back_right.reset_count();
    }

    /// `(front_left, back_right)`
    pub fn counts(&mut self) -> (u32, u32) {
        (self.front_left.count(), self.back_right.count())
    }
}

/// Arm and lever servos
pub struct ServoPair<S> {
    pub arm: S,
    pub lever: S,
}

impl<S: ServoActuator> ServoPair<S> {
    pub fn new(arm: S, lever: S) -> Self {
        Self { arm, lever }
    }

    pub fn release(&mut self) {
        self.arm.release();
        self.lever.release();
    }
}
