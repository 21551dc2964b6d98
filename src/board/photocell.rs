//! CdS photocell on a blocking ADC channel
//!
//! Every read takes a short burst of samples and returns their median, which
//! keeps single-sample spikes from the motor supply out of the classifier.

use course_robot::system::hardware::Photocell;
use defmt::warn;
use embassy_rp::adc::{Adc, Blocking, Channel, Config};
use embassy_rp::gpio::Pull;
use moving_median::MovingMedian;

use super::resources::PhotocellResources;

/// ADC reference voltage
const REF_VOLTAGE: f32 = 3.3;

/// 12-bit ADC full scale
const ADC_RANGE: f32 = 4095.0;

/// Samples per reading
const MEDIAN_WINDOW_SIZE: usize = 5;

pub struct CdsCell {
    adc: Adc<'static, Blocking>,
    channel: Channel<'static>,
}

impl CdsCell {
    pub fn new(r: PhotocellResources) -> Self {
        Self {
            adc: Adc::new_blocking(r.adc, Config::default()),
            channel: Channel::new_pin(r.cds_pin, Pull::None),
        }
    }
}

impl Photocell for CdsCell {
    fn value(&mut self) -> f32 {
        let mut median_filter = MovingMedian::<f32, MEDIAN_WINDOW_SIZE>::new();
        for _ in 0..MEDIAN_WINDOW_SIZE {
            match self.adc.blocking_read(&mut self.channel) {
                Ok(raw) => median_filter.add_value(f32::from(raw) * REF_VOLTAGE / ADC_RANGE),
                Err(_) => warn!("photocell ADC read failed"),
            }
        }
        median_filter.median()
    }
}
