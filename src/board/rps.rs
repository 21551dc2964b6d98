//! RPS receiver
//!
//! A task reads frames off the UART and keeps the latest pose in a
//! critical-section mutex. The control task reads that snapshot through
//! [`SharedRps`]. A snapshot older than [`STALE_AFTER`] is reported as a lost
//! signal, the same as the RPS sending its own lost sentinel.

use core::cell::Cell;

use course_robot::system::{hardware::PositionSensor, pose::RobotPose, rps_frame::FrameAssembler};
use defmt::{debug, warn};
use embassy_rp::uart::{Config, UartRx};
use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};
use embassy_time::{Duration, Instant};

use super::resources::{Irqs, RpsResources};

/// RPS radio baud rate
const BAUD_RATE: u32 = 9_600;

/// Longest frame accepted, terminator excluded
const MAX_FRAME_LEN: usize = 48;

/// Age at which the last frame no longer counts as a reading
pub const STALE_AFTER: Duration = Duration::from_millis(500);

/// Latest pose and when it arrived
static LATEST: Mutex<CriticalSectionRawMutex, Cell<(RobotPose, Instant)>> =
    Mutex::new(Cell::new((RobotPose::lost(), Instant::from_ticks(0))));

/// Position sensor backed by the receive task's snapshot
pub struct SharedRps;

impl PositionSensor for SharedRps {
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
        let (pose, received) = LATEST.lock(|latest| latest.get());
        if Instant::now().saturating_duration_since(received) > STALE_AFTER {
            RobotPose::lost()
        } else {
            pose
        }
    }
}

#[embassy_executor::task]
pub async fn receive(r: RpsResources) {
    let mut config = Config::default();
    config.baudrate = BAUD_RATE;
    let mut rx = UartRx::new(r.uart, r.rx_pin, Irqs, r.rx_dma, config);

    let mut assembler = FrameAssembler::<MAX_FRAME_LEN>::new();
    let mut byte = [0u8; 1];

    loop {
        if rx.read(&mut byte).await.is_err() {
            warn!("RPS uart read error");
            continue;
        }
        match assembler.push(byte[0]) {
            Some(Ok(pose)) => {
                debug!("RPS {:?}", pose);
                LATEST.lock(|latest| latest.set((pose, Instant::now())));
            }
            Some(Err(e)) => warn!("RPS dropped frame: {:?}", e),
            None => {}
        }
    }
}
