//! RPS text frames
//!
//! The position system sends one line per reading: `x,y,heading\n`, decimal
//! floats, optional surrounding whitespace. A lost signal is sent as a
//! negative X and is passed through unchanged; callers check
//! [`RobotPose::is_valid`].

use crate::system::{
    error::{Error, Result},
    pose::RobotPose,
};

/// Parse one frame without its line terminator
pub fn parse(line: &str) -> Result<RobotPose> {
    let mut fields = line.trim().split(',').map(|field| field.trim().parse::<f32>());
    let (Some(Ok(x)), Some(Ok(y)), Some(Ok(heading)), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(Error::BadFrame);
    };
    Ok(RobotPose::new(x, y, heading))
}

/// Collects UART bytes into frames
///
/// Lines longer than `N` bytes are reported as [`Error::BadFrame`] once their
/// terminator arrives.
pub struct FrameAssembler<const N: usize> {
    buffer: [u8; N],
    len: usize,
    overflowed: bool,
}

impl<const N: usize> Default for FrameAssembler<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FrameAssembler<N> {
    pub const fn new() -> Self {
        Self {
            buffer: [0; N],
            len: 0,
            overflowed: false,
        }
    }

    /// Feed one byte, getting a result back whenever a line completes
    pub fn push(&mut self, byte: u8) -> Option<Result<RobotPose>> {
        match byte {
            b'\n' => {
                let result = if self.overflowed {
                    Err(Error::BadFrame)
                } else {
                    core::str::from_utf8(&self.buffer[..self.len])
                        .map_err(|_| Error::BadFrame)
                        .and_then(parse)
                };
                self.len = 0;
                self.overflowed = false;
                Some(result)
            }
            b'\r' => None,
            _ if self.len < N => {
                self.buffer[self.len] = byte;
                self.len += 1;
                None
            }
            _ => {
                self.overflowed = true;
                None
            }
        }
    }
}
