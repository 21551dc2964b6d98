//! Robot firmware entry point
//!
//! Brings up the board, starts the RPS receiver and runs a short demonstration
//! of the control core: wait for the start light, drive out, correct against
//! the RPS, turn, correct the heading and read the course light.

#![no_std]
#![no_main]

use board::{
    encoders::encoder_pair,
    motors::drive_train,
    photocell::CdsCell,
    resources::{AssignedResources, EncoderResources, MotorResources, PhotocellResources, RpsResources, ServoResources},
    rps::{self, SharedRps},
    servos::servos,
};
use course_robot::{
    system::{
        calibration::CalibrationBaseline,
        config::RobotConfig,
        drive_command::{Direction, Rotation},
    },
    task::light::Color,
};
use defmt::{error, info, warn};
use embassy_executor::Spawner;
use embassy_rp::block::ImageDef;
use embassy_rp::config::Config;
use embassy_time::{Delay, Duration};
use {defmt_rtt as _, panic_probe as _};

/// Firmware image type for bootloader
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

/// Board adapters
mod board;

/// Course landmarks measured with the RPS before the run, inches
const START_Y: f32 = 10.2;
const DDR_LIGHT_X: f32 = 24.5;
const FOOSBALL_WALL_Y: f32 = 48.0;
const BUMP_Y: f32 = 36.0;

/// Photocell drop over the red light, volts
const RED_DELTA: f32 = 1.0;

/// Longest wait for the start light before running anyway
const START_TIMEOUT: Duration = Duration::from_secs(30);

const MOVE_POWER: f32 = 40.0;
const CREEP_POWER: f32 = 20.0;
const COLOR_ATTEMPTS: u32 = 400;

/// Firmware entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Config::default());
    let r = split_resources!(p);

    spawner.spawn(rps::receive(r.rps)).unwrap();

    let (drive, _standby) = match drive_train(r.motors) {
        Ok(drive) => drive,
        Err(e) => {
            error!("motor bring-up failed: {:?}", e);
            return;
        }
    };
    let servo_pair = match servos(r.servos) {
        Ok(servos) => servos,
        Err(e) => {
            error!("servo bring-up failed: {:?}", e);
            return;
        }
    };

    let mut robot = match course_robot::system::robot::Robot::new(
        drive,
        encoder_pair(r.encoders),
        SharedRps,
        CdsCell::new(r.photocell),
        servo_pair,
        Delay,
        RobotConfig::default(),
    ) {
        Ok(robot) => robot,
        Err(e) => {
            error!("robot config rejected: {:?}", e);
            return;
        }
    };

    robot.set_arm(0.0);
    robot.set_lever(90.0);

    let ambient = robot.capture_baseline();
    let baseline = match CalibrationBaseline::new(START_Y, DDR_LIGHT_X, FOOSBALL_WALL_Y, BUMP_Y, ambient.0, RED_DELTA) {
        Ok(baseline) => baseline,
        Err(e) => {
            error!("calibration rejected: {:?}", e);
            return;
        }
    };
    info!("baseline {:?}", baseline);

    let start = robot.wait_for_start(ambient, START_TIMEOUT).await;
    info!("start: {:?}", start);

    if let Err(e) = robot.move_straight(Direction::Forward, MOVE_POWER, 12.0).await {
        warn!("move: {:?}", e);
    }
    if let Err(e) = robot.correct_y(baseline.start_y + 12.0).await {
        warn!("correct y: {:?}", e);
    }
    if let Err(e) = robot.turn(Rotation::Left, MOVE_POWER, 90.0).await {
        warn!("turn: {:?}", e);
    }
    if let Err(e) = robot.correct_heading(180.0).await {
        warn!("correct heading: {:?}", e);
    }

    match robot.drive_until_color(&baseline, CREEP_POWER, COLOR_ATTEMPTS).await {
        Color::Red => robot.set_arm(45.0),
        Color::Blue => robot.set_arm(135.0),
        Color::Unknown => warn!("no light found, leaving the arm"),
    }

    robot.stop();
    robot.release_servos();
    info!("run finished at {:?}", robot.pose());
}
