mod common;

use common::robot_at;
use course_robot::{
    system::{
        config::RobotConfig,
        drive_command::{Direction, DriveCommand, Rotation},
        pose::RobotPose,
    },
    Error,
};
use embassy_futures::block_on;

#[test]
fn forward_move_runs_until_both_encoders_reach_the_count() {
    let (mut robot, world) = robot_at(RobotPose::new(10.0, 10.0, 0.0), RobotConfig::default());

    let report = block_on(robot.move_straight(Direction::Forward, 50.0, 10.0)).unwrap();

    assert_eq!(report.target_counts, 55);
    assert!(report.front_left >= 55);
    assert!(report.back_right >= 55);
    let world = world.borrow();
    assert!(world.motors.is_stopped());
    assert_eq!(world.commands, vec![DriveCommand::straight(Direction::Forward, 50.0)]);
    assert!(world.pose.x > 10.0);
}

#[test]
fn waits_for_the_slower_wheel() {
    let (mut robot, world) = robot_at(RobotPose::new(10.0, 10.0, 0.0), RobotConfig::default());
    world.borrow_mut().back_right_grip = 0.5;

    let report = block_on(robot.move_straight(Direction::Backward, 50.0, 10.0)).unwrap();

    assert!(report.back_right >= report.target_counts);
    assert!(report.front_left >= 2 * report.target_counts - 2);
}

#[test]
fn turn_uses_rotation_counts() {
    let (mut robot, world) = robot_at(RobotPose::new(10.0, 10.0, 90.0), RobotConfig::default());

    let report = block_on(robot.turn(Rotation::Left, 40.0, 90.0)).unwrap();

    assert_eq!(report.target_counts, 34);
    let world = world.borrow();
    assert_eq!(world.commands, vec![DriveCommand::rotate(Rotation::Left, 40.0)]);
    assert!(world.pose.heading > 90.0);
    assert!(world.motors.is_stopped());
}

#[test]
fn negative_distance_uses_the_magnitude() {
    let (mut robot, _world) = robot_at(RobotPose::new(10.0, 10.0, 0.0), RobotConfig::default());

    let report = block_on(robot.move_straight(Direction::Forward, 50.0, -10.0)).unwrap();

    assert_eq!(report.target_counts, 55);
}

#[test]
fn stalled_move_runs_out_of_polls_and_stops() {
    let (mut robot, world) = robot_at(RobotPose::new(10.0, 10.0, 0.0), RobotConfig::default());
    world.borrow_mut().stalled = true;

    let result = block_on(robot.move_straight(Direction::Forward, 50.0, 10.0));

    assert_eq!(
        result,
        Err(Error::MoveIncomplete {
            target_counts: 55,
            front_left: 0,
            back_right: 0,
        })
    );
    assert!(world.borrow().motors.is_stopped());
}

#[test]
fn encoders_are_reset_before_each_move() {
    let (mut robot, _world) = robot_at(RobotPose::new(10.0, 10.0, 0.0), RobotConfig::default());

    let first = block_on(robot.move_straight(Direction::Forward, 50.0, 10.0)).unwrap();
    let second = block_on(robot.move_straight(Direction::Forward, 50.0, 10.0)).unwrap();

    assert!(second.front_left < first.front_left + 5);
    assert!(second.polls > 1);
}

#[test]
fn non_finite_inputs_are_rejected_before_moving() {
    let (mut robot, world) = robot_at(RobotPose::new(10.0, 10.0, 0.0), RobotConfig::default());

    assert_eq!(
        block_on(robot.move_straight(Direction::Forward, f32::NAN, 10.0)),
        Err(Error::InvalidConfig)
    );
    assert_eq!(
        block_on(robot.turn(Rotation::Left, 40.0, f32::INFINITY)),
        Err(Error::InvalidConfig)
    );

    let world = world.borrow();
    assert!(world.commands.is_empty());
    assert_eq!(world.elapsed_us, 0);
}
