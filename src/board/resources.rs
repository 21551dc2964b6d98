//! Pin and peripheral assignment
//!
//! Each group is handed to exactly one adapter in `main`, so ownership of a pin
//! is visible in one place.
//!
//! # Resource Groups
//! - Motors: two TB6612FNG drivers, one PWM slice each (A front, B back)
//! - Encoders: PWM slices in edge-counting input mode (channel B pins only)
//! - Photocell: CdS cell on an ADC pin
//! - Servos: arm and lever servo outputs
//! - RPS: UART receive line from the position system radio

use assign_resources::assign_resources;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::{self, UART0};
use embassy_rp::uart::InterruptHandler as UartInterruptHandler;

assign_resources! {
    /// TB6612FNG dual motor drivers
    motors: MotorResources {
        // left driver
        left_standby_pin: PIN_22,
        left_slice: PWM_SLICE6,
        left_front_pwm_pin: PIN_12,
        left_back_pwm_pin: PIN_13,
        left_front_in1_pin: PIN_16,
        left_front_in2_pin: PIN_17,
        left_back_in1_pin: PIN_18,
        left_back_in2_pin: PIN_19,
        // right driver
        right_standby_pin: PIN_10,
        right_slice: PWM_SLICE7,
        right_front_pwm_pin: PIN_14,
        right_back_pwm_pin: PIN_15,
        right_front_in1_pin: PIN_2,
        right_front_in2_pin: PIN_3,
        right_back_in1_pin: PIN_4,
        right_back_in2_pin: PIN_5,
    },
    /// Shaft encoder pulse inputs
    encoders: EncoderResources {
        front_left_slice: PWM_SLICE3,
        front_left_pin: PIN_7,
        back_right_slice: PWM_SLICE4,
        back_right_pin: PIN_9,
    },
    /// CdS photocell
    photocell: PhotocellResources {
        adc: ADC,
        cds_pin: PIN_28,
    },
    /// Arm and lever servos
    servos: ServoResources {
        main_slice: PWM_SLICE5,
        main_pin: PIN_11,
        lever_slice: PWM_SLICE0,
        lever_pin: PIN_0,
    },
    /// RPS receiver
    rps: RpsResources {
        uart: UART0,
        rx_pin: PIN_1,
        rx_dma: DMA_CH0,
    },
}

bind_interrupts!(pub struct Irqs {
    UART0_IRQ => UartInterruptHandler<UART0>;
});
