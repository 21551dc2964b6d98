//! Photocell light detection
//!
//! The CdS cell reads lower voltages under brighter light. Everything here
//! works on the drop from the ambient level, so readings taken under different
//! room lighting stay comparable.

use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;

use crate::system::{
    budget::{poll_until, Exhausted, PollPolicy, Polled},
    calibration::CalibrationBaseline,
    config::LightConfig,
    drive_command::{Direction, DriveCommand},
    hardware::{DriveMotor, Photocell, PositionSensor, WheelEncoder},
    robot::Robot,
};

/// Light color under the photocell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    Red,
    Blue,
    /// No band matched
    Unknown,
}

/// Photocell voltage with no light source underneath
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AmbientLevel(pub f32);

/// How the start-light wait ended; either way the run goes on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartOutcome {
    Detected { elapsed: Duration },
    TimedOut { elapsed: Duration },
}

impl StartOutcome {
    pub fn is_detected(&self) -> bool {
        matches!(self, StartOutcome::Detected { .. })
    }

    pub fn elapsed(&self) -> Duration {
        match *self {
            StartOutcome::Detected { elapsed } | StartOutcome::TimedOut { elapsed } => elapsed,
        }
    }
}

/// Classify a drop from ambient with the default bands
pub fn classify(delta: f32, red_delta: f32) -> Color {
    LightConfig::default().classify(delta, red_delta)
}

impl LightConfig {
    /// Classify a drop from ambient against the calibrated red drop
    ///
    /// Red is checked first, so it wins if a small red drop makes the bands
    /// touch.
    pub fn classify(&self, delta: f32, red_delta: f32) -> Color {
        if delta >= red_delta - self.red_margin {
            Color::Red
        } else if delta >= red_delta * self.blue_min_ratio && delta <= red_delta * self.blue_max_ratio {
            Color::Blue
        } else {
            Color::Unknown
        }
    }
}

impl<M, E, P, C, D, S> Robot<M, E, P, C, D, S>
where
    M: DriveMotor,
    E: WheelEncoder,
    P: PositionSensor,
    C: Photocell,
    D: DelayNs,
{
    /// One photocell read at rest
    pub fn capture_baseline(&mut self) -> AmbientLevel {
        let ambient = self.cds.value();
        info!("ambient light {}", ambient);
        AmbientLevel(ambient)
    }

    /// Drop from ambient with the robot parked over the red light
    pub fn calibrate_red_delta(&mut self, ambient: AmbientLevel) -> f32 {
        let red_delta = ambient.0 - self.cds.value();
        info!("red delta {}", red_delta);
        red_delta
    }

    /// Wait for the start light, giving up after `timeout`
    pub async fn wait_for_start(&mut self, ambient: AmbientLevel, timeout: Duration) -> StartOutcome {
        let light = self.config.light;
        let policy = PollPolicy::for_timeout(light.start_poll_interval, timeout);
        let cds = &mut self.cds;

        info!("waiting for start light");
        let outcome = poll_until(&mut self.delay, policy, |_| {
            let reading = cds.value();
            trace!("start light reading {}", reading);
            light.start_threshold.is_lit(ambient.0, reading).then_some(())
        })
        .await;

        match outcome {
            Ok(Polled { polls, .. }) => {
                let elapsed = light.start_poll_interval * (polls - 1);
                info!("start light seen after {} ms", elapsed.as_millis());
                StartOutcome::Detected { elapsed }
            }
            Err(Exhausted { spent }) => {
                let elapsed = light.start_poll_interval * spent;
                warn!("no start light after {} ms, starting anyway", elapsed.as_millis());
                StartOutcome::TimedOut { elapsed }
            }
        }
    }

    /// Creep forward until the photocell sees red or blue
    ///
    /// Motors stop as soon as a band matches. After `max_attempts` samples
    /// without a match the robot stops and reports [`Color::Unknown`].
    pub async fn drive_until_color(&mut self, baseline: &CalibrationBaseline, power: f32, max_attempts: u32) -> Color {
        let light = self.config.light;
        if light.bands_overlap(baseline.red_delta) {
            warn!("red delta {} leaves no room for blue", baseline.red_delta);
        }

        self.drive.apply(DriveCommand::straight(Direction::Forward, power));

        let cds = &mut self.cds;
        let drive = &mut self.drive;
        let policy = PollPolicy::new(light.color_poll_interval, max_attempts);
        let outcome = poll_until(&mut self.delay, policy, |_| {
            let delta = baseline.light_delta(cds.value());
            let color = light.classify(delta, baseline.red_delta);
            trace!("light delta {} is {:?}", delta, color);
            if color == Color::Unknown {
                return None;
            }
            drive.stop();
            Some(color)
        })
        .await;

        self.drive.stop();

        match outcome {
            Ok(Polled { value, polls }) => {
                info!("light is {:?} after {} samples", value, polls);
                value
            }
            Err(Exhausted { spent }) => {
                warn!("no light color after {} samples", spent);
                Color::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn red_needs_most_of_the_calibrated_drop() {
        assert_eq!(classify(1.1, 1.0), Color::Red);
        assert_eq!(classify(0.8, 1.0), Color::Red);
        assert_eq!(classify(0.7, 1.0), Color::Unknown);
    }

    #[test]
    fn blue_sits_in_a_band_well_below_red() {
        assert_eq!(classify(0.3, 1.0), Color::Blue);
        assert_eq!(classify(0.5, 1.0), Color::Unknown);
        assert_eq!(classify(0.0, 1.0), Color::Unknown);
        assert_eq!(classify(0.1, 1.0), Color::Unknown);
    }

    #[test]
    fn non_finite_delta_is_unknown() {
        assert_eq!(classify(f32::NAN, 1.0), Color::Unknown);
    }

    #[test]
    fn outcome_accessors() {
        let outcome = StartOutcome::TimedOut {
            elapsed: Duration::from_secs(30),
        };
        assert!(!outcome.is_detected());
        assert_eq!(outcome.elapsed(), Duration::from_secs(30));
    }
}
