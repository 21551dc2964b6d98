//! Shaft encoders on PWM slices in edge-counting input mode
//!
//! The hardware counter is 16 bits wide and wraps, so each read folds the
//! difference since the previous read into a 32-bit running total.

use course_robot::system::hardware::{EncoderPair, WheelEncoder};
use embassy_rp::gpio::Pull;
use embassy_rp::pwm::{Config, InputMode, Pwm};

use super::resources::EncoderResources;

pub struct PulseCounter {
    pwm: Pwm<'static>,
    last: u16,
    total: u32,
}

impl PulseCounter {
    fn new(pwm: Pwm<'static>) -> Self {
        let mut counter = Self { pwm, last: 0, total: 0 };
        counter.reset_count();
        counter
    }
}

impl WheelEncoder for PulseCounter {
    fn reset_count(&mut self) {
        self.pwm.set_counter(0);
        self.last = 0;
        self.total = 0;
    }

    fn count(&mut self) -> u32 {
        let now = self.pwm.counter();
        self.total = self.total.saturating_add(u32::from(now.wrapping_sub(self.last)));
        self.last = now;
        self.total
    }
}

pub fn encoder_pair(r: EncoderResources) -> EncoderPair<PulseCounter> {
    let config = Config::default();
    let front_left = Pwm::new_input(
        r.front_left_slice,
        r.front_left_pin,
        Pull::None,
        InputMode::RisingEdge,
        config.clone(),
    );
    let back_right = Pwm::new_input(
        r.back_right_slice,
        r.back_right_pin,
        Pull::None,
        InputMode::RisingEdge,
        config,
    );
    EncoderPair::new(PulseCounter::new(front_left), PulseCounter::new(back_right))
}
