//! Core system components for robot operation
pub mod budget;
pub mod calibration;
pub mod config;
pub mod drive_command;
pub mod error;
pub mod hardware;
pub mod kinematics;
pub mod pose;
pub mod robot;
pub mod rps_frame;
pub mod target;
