//! Simulated course
//!
//! One shared [`World`] holds the true pose, the motor powers and the encoder
//! counts. Time only moves when the robot awaits its delay, and the pose is
//! integrated from the motor powers over that time.

#![allow(dead_code)]

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use course_robot::system::{
    config::RobotConfig,
    drive_command::DriveCommand,
    hardware::{DriveMotor, DriveTrain, EncoderPair, Photocell, PositionSensor, ServoActuator, ServoPair, WheelEncoder},
    pose::{normalize_heading, RobotPose},
    robot::Robot,
};
use embedded_hal_async::delay::DelayNs;

/// Inches per second per percent of power
pub const LINEAR_RATE: f32 = 0.1;
/// Degrees per second per percent of power
pub const TURN_RATE: f32 = 2.0;
/// Encoder counts per second per percent of power
pub const COUNT_RATE: f32 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wheel {
    LeftFront,
    RightFront,
    LeftBack,
    RightBack,
}

pub struct World {
    pub pose: RobotPose,
    pub motors: DriveCommand,
    pub elapsed_us: u64,
    /// Encoder counts kept fractional, read back truncated
    pub front_left_counts: f32,
    pub back_right_counts: f32,
    /// Wheels spin but the encoders see nothing
    pub stalled: bool,
    /// Share of its commanded speed the back-right wheel actually reaches
    pub back_right_grip: f32,
    /// Pose stays put whatever the motors do
    pub frozen: bool,

    /// RPS reads made so far
    pub rps_reads: u32,
    /// Reads with this zero-based index range come back as the lost sentinel
    pub lost_reads: std::ops::Range<u32>,
    pub in_signal_loss: bool,
    /// Set when time passed with a motor powered during a signal loss
    pub moved_while_lost: bool,
    /// Every RPS reading handed out, in order
    pub readings: Vec<RobotPose>,

    /// Photocell values handed out in order; the last one repeats
    pub photocell: VecDeque<f32>,
    pub photocell_reads: u32,

    /// Every non-zero command that reached the motors, in order
    pub commands: Vec<DriveCommand>,

    /// Last commanded angle per servo, `None` once released
    pub arm: Option<f32>,
    pub lever: Option<f32>,
}

impl World {
    pub fn new(pose: RobotPose) -> Self {
        Self {
            pose,
            motors: DriveCommand::stop(),
            elapsed_us: 0,
            front_left_counts: 0.0,
            back_right_counts: 0.0,
            stalled: false,
            back_right_grip: 1.0,
            frozen: false,
            rps_reads: 0,
            lost_reads: 0..0,
            in_signal_loss: false,
            moved_while_lost: false,
            readings: Vec::new(),
            photocell: VecDeque::new(),
            photocell_reads: 0,
            commands: Vec::new(),
            arm: None,
            lever: None,
        }
    }

    fn advance(&mut self, micros: u64) {
        if micros == 0 {
            return;
        }
        if self.in_signal_loss && !self.motors.is_stopped() {
            self.moved_while_lost = true;
        }
        let seconds = micros as f32 / 1_000_000.0;
        let m = self.motors;

        if !self.frozen {
            // right side is mounted mirrored
            let linear = (m.left_front - m.right_front + m.left_back - m.right_back) / 4.0;
            // all positive spins clockwise, heading decreases
            let spin = (m.left_front + m.right_front + m.left_back + m.right_back) / 4.0;

            let distance = linear * LINEAR_RATE * seconds;
            let heading = self.pose.heading.to_radians();
            self.pose.x += distance * heading.cos();
            self.pose.y += distance * heading.sin();
            self.pose.heading = normalize_heading(self.pose.heading - spin * TURN_RATE * seconds);
        }

        if !self.stalled {
            self.front_left_counts += m.left_front.abs() * COUNT_RATE * seconds;
            self.back_right_counts += m.right_back.abs() * self.back_right_grip * COUNT_RATE * seconds;
        }
        self.elapsed_us += micros;
    }

    fn set_motor(&mut self, wheel: Wheel, percent: f32) {
        match wheel {
            Wheel::LeftFront => self.motors.left_front = percent,
            Wheel::RightFront => self.motors.right_front = percent,
            Wheel::LeftBack => self.motors.left_back = percent,
            Wheel::RightBack => self.motors.right_back = percent,
        }
        // the drive train sets the right-back wheel last
        if wheel == Wheel::RightBack && !self.motors.is_stopped() && self.commands.last() != Some(&self.motors) {
            self.commands.push(self.motors);
        }
    }
}

pub type Shared = Rc<RefCell<World>>;

pub struct SimMotor {
    world: Shared,
    wheel: Wheel,
}

impl DriveMotor for SimMotor {
    fn set_percent(&mut self, percent: f32) {
        self.world.borrow_mut().set_motor(self.wheel, percent);
    }
}

#[derive(Clone, Copy)]
pub enum Side {
    FrontLeft,
    BackRight,
}

pub struct SimEncoder {
    world: Shared,
    side: Side,
}

impl WheelEncoder for SimEncoder {
    fn reset_count(&mut self) {
        let mut world = self.world.borrow_mut();
        match self.side {
            Side::FrontLeft => world.front_left_counts = 0.0,
            Side::BackRight => world.back_right_counts = 0.0,
        }
    }

    fn count(&mut self) -> u32 {
        let world = self.world.borrow();
        match self.side {
            Side::FrontLeft => world.front_left_counts as u32,
            Side::BackRight => world.back_right_counts as u32,
        }
    }
}

pub struct SimRps {
    world: Shared,
}

impl PositionSensor for SimRps {
    fn x(&mut self) -> f32 {
        self.pose().x
    }

    fn y(&mut self) -> f32 {
        self.pose().y
    }

    fn heading(&mut self) -> f32 {
        self.pose().heading
    }

    fn pose(&mut self) -> RobotPose {
        let mut world = self.world.borrow_mut();
        let index = world.rps_reads;
        world.rps_reads += 1;
        let reading = if world.lost_reads.contains(&index) {
            world.in_signal_loss = true;
            RobotPose::lost()
        } else {
            world.in_signal_loss = false;
            world.pose
        };
        world.readings.push(reading);
        reading
    }
}

pub struct SimPhotocell {
    world: Shared,
}

impl Photocell for SimPhotocell {
    fn value(&mut self) -> f32 {
        let mut world = self.world.borrow_mut();
        world.photocell_reads += 1;
        if world.photocell.len() > 1 {
            world.photocell.pop_front().unwrap_or(0.0)
        } else {
            world.photocell.front().copied().unwrap_or(0.0)
        }
    }
}

#[derive(Clone, Copy)]
pub enum ServoSlot {
    Arm,
    Lever,
}

pub struct SimServo {
    world: Shared,
    slot: ServoSlot,
}

impl SimServo {
    fn set(&mut self, angle: Option<f32>) {
        let mut world = self.world.borrow_mut();
        match self.slot {
            ServoSlot::Arm => world.arm = angle,
            ServoSlot::Lever => world.lever = angle,
        }
    }
}

impl ServoActuator for SimServo {
    fn set_degree(&mut self, degree: f32) {
        self.set(Some(degree));
    }

    fn release(&mut self) {
        self.set(None);
    }
}

pub struct SimDelay {
    world: Shared,
}

impl DelayNs for SimDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.world.borrow_mut().advance(u64::from(ns) / 1_000);
    }

    async fn delay_us(&mut self, us: u32) {
        self.world.borrow_mut().advance(u64::from(us));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.world.borrow_mut().advance(u64::from(ms) * 1_000);
    }
}

pub type SimRobot = Robot<SimMotor, SimEncoder, SimRps, SimPhotocell, SimDelay, SimServo>;

/// Build a robot on a fresh simulated course starting at `pose`
pub fn robot_at(pose: RobotPose, config: RobotConfig) -> (SimRobot, Shared) {
    let world: Shared = Rc::new(RefCell::new(World::new(pose)));
    let motor = |wheel| SimMotor {
        world: world.clone(),
        wheel,
    };
    let drive = DriveTrain::new(
        motor(Wheel::LeftFront),
        motor(Wheel::RightFront),
        motor(Wheel::LeftBack),
        motor(Wheel::RightBack),
    );
    let encoders = EncoderPair::new(
        SimEncoder {
            world: world.clone(),
            side: Side::FrontLeft,
        },
        SimEncoder {
            world: world.clone(),
            side: Side::BackRight,
        },
    );
    let robot = Robot::new(
        drive,
        encoders,
        SimRps { world: world.clone() },
        SimPhotocell { world: world.clone() },
        ServoPair::new(
            SimServo {
                world: world.clone(),
                slot: ServoSlot::Arm,
            },
            SimServo {
                world: world.clone(),
                slot: ServoSlot::Lever,
            },
        ),
        SimDelay { world: world.clone() },
        config,
    )
    .expect("simulated robot config is valid");
    (robot, world)
}
