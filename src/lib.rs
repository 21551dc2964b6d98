//! Course robot control core
//!
//! Closed-loop position correction against an absolute position system (RPS),
//! open-loop encoder-counted motion and photocell light detection for a small
//! four-wheel course robot.
//!
//! The crate is `no_std` and hardware agnostic. Every hardware collaborator is a
//! trait in [`system::hardware`], owned by a [`system::robot::Robot`] value, so the
//! same control code runs on the RP2350 board and against simulated hardware in
//! tests.
//!
//! # Layout
//! - [`system`]: shared types, configuration, hardware traits and bounded polling
//! - [`task`]: the control activities (motion, correction, light, servo)

#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

/// Shared types, configuration and hardware seams
pub mod system;
/// Control activities run on the robot
pub mod task;

pub use system::error::{Error, Result};
