//! Desktop simulator for the bmp180-core driver.
//!
//! Runs the driver on the embassy std executor against [`SimulatedBmp180`],
//! printing every calibrated reading. A second task watches the error channel
//! and a third halts the driver after [`RUN_TIME`].
//!
//! Set `RUST_LOG=debug` (or `trace`) to see the acquisition phases.

mod sensor;

use embassy_executor::Spawner;
use embassy_sync::pubsub::WaitResult;
use embassy_time::{Delay, Duration, Ticker, Timer};
use log::{error, info, warn};

use bmp180_core::registers::{DEFAULT_ADDRESS, EXPECTED_CHIP_ID};
use bmp180_core::{
    Algorithm, Bmp180, Bmp180Config, ErrorChannel, HaltSignal, I2cTransport, OversamplingMode,
};

use sensor::SimulatedBmp180;

/// Standard atmosphere, used for the altitude estimate.
const SEA_LEVEL_HPA: f64 = 1013.25;

/// How long the simulator samples before halting the driver.
const RUN_TIME: Duration = Duration::from_secs(10);

/// Every n-th bus transfer of the simulated sensor fails.
const FAULT_EVERY: u32 = 23;

static ERRORS: ErrorChannel = ErrorChannel::new();
static HALT: HaltSignal = HaltSignal::new();

#[embassy_executor::task]
async fn error_monitor() {
    let Ok(mut subscriber) = ERRORS.subscriber() else {
        error!("No free error channel subscriber");
        return;
    };

    loop {
        match subscriber.next_message().await {
            WaitResult::Message(event) => {
                warn!("Sensor error during {:?}: {:?}", event.stage, event.kind)
            }
            WaitResult::Lagged(missed) => warn!("Missed {} sensor errors", missed),
        }
    }
}

#[embassy_executor::task]
async fn halt_after(run_time: Duration) {
    Timer::after(run_time).await;
    info!("Requesting halt");
    HALT.signal(());
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    env_logger::init();
    info!("Starting bmp180 simulator");

    spawner
        .spawn(error_monitor())
        .expect("error monitor already spawned");

    let config = Bmp180Config::default()
        .with_algorithm(Algorithm::Polynomial)
        .with_sample_interval_ms(500);
    let bus = SimulatedBmp180::new(DEFAULT_ADDRESS).with_fault_every(FAULT_EVERY);
    let mut bmp = Bmp180::new(
        I2cTransport::new(bus),
        Delay,
        ERRORS.immediate_publisher(),
        config,
    );

    match bmp.chip_id().await {
        Ok(EXPECTED_CHIP_ID) => info!("BMP180 detected"),
        Ok(other) => warn!("Unexpected chip id 0x{:02x}", other),
        Err(e) => warn!("Chip id read failed: {:?}", e),
    }

    if let Err(e) = bmp.start().await {
        error!("Failed to start sensor: {:?}", e);
        std::process::exit(1);
    }

    spawner
        .spawn(halt_after(RUN_TIME))
        .expect("halt task already spawned");

    let mut ticker = Ticker::every(Duration::from_millis(u64::from(
        config.sample_interval_ms,
    )));
    let mut modes = OversamplingMode::ALL.iter().copied().cycle();

    loop {
        if let Some(mode) = modes.next() {
            bmp.set_mode(mode);
        }

        match bmp.sample_or_halt(&HALT).await {
            Ok(Some(reading)) => info!(
                "{:?}: {:.2} °C, {:.2} hPa, ~{:.0} m",
                bmp.mode(),
                reading.temperature_celsius,
                reading.pressure_hpa,
                reading.altitude_m(SEA_LEVEL_HPA)
            ),
            Ok(None) => break,
            Err(e) => warn!("Sample failed: {:?}", e),
        }

        ticker.next().await;
    }

    info!("Simulator exiting, last reading {:?}", bmp.reading());
    std::process::exit(0);
}
