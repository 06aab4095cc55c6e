use std::{
    process::ExitCode,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use ath10::Ath10;
use clap::{Parser, ValueEnum};
use linux_embedded_hal::{Delay, I2cdev};

/// Read temperature and humidity from an ATH10 sensor
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to I2C bus (e.g., /dev/i2c-1)
    #[arg(short, long)]
    path: String,
    /// Measurement period in milliseconds
    #[arg(short, long, default_value_t = 1000)]
    interval: u64,
    /// Number of measurements to take, 0 runs until interrupted
    #[arg(short, long, default_value_t = 0)]
    count: usize,
    /// Quantity to read
    #[arg(short, long, value_enum, default_value_t = Quantity::Both)]
    quantity: Quantity,
    /// Number of attempts at initializing the sensor
    #[arg(long, default_value_t = 3)]
    retries: u32,
    /// Soft-reset the sensor before exiting
    #[arg(long, default_value_t = false)]
    reset: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Quantity {
    Both,
    Temperature,
    Humidity,
}

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::init();
    // Parse command line arguments
    let args = Args::parse();
    log::info!("Arguments: {args:#?}");
    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            log::info!("Received Ctrl+C, stopping...");
            running.store(false, Ordering::Relaxed);
        }) {
            log::error!("Could not set Ctrl+C handler: {e}");
            return ExitCode::FAILURE;
        }
    }
    run(&args, &running)
}

fn run(args: &Args, running: &AtomicBool) -> ExitCode {
    let path = &args.path;
    log::info!("[ATH10] {path}> Opening bus");
    let mut i2c = match I2cdev::new(path) {
        Ok(i2c) => i2c,
        Err(e) => {
            log::error!("[ATH10] {path}> Failed to open I2C device: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut delay = Delay;
    let mut ath = Ath10::new();

    let mut attempt = 0;
    while !ath.is_ready() {
        if attempt == args.retries || !running.load(Ordering::Relaxed) {
            log::error!("[ATH10] {path}> Sensor not ready after {attempt} attempts.");
            return ExitCode::FAILURE;
        }
        attempt += 1;
        match ath.begin(&mut i2c, &mut delay) {
            Ok(true) => log::info!(
                "[ATH10] {path}> Device ready at address {:02x}",
                ath.address()
            ),
            Ok(false) => log::warn!("[ATH10] {path}> Attempt {attempt}: sensor not ready."),
            Err(e) => log::warn!("[ATH10] {path}> Attempt {attempt}: {e:?}"),
        }
    }

    let interval = Duration::from_millis(args.interval);
    let mut taken = 0;
    while running.load(Ordering::Relaxed) && (args.count == 0 || taken < args.count) {
        let start = Instant::now();
        match args.quantity {
            Quantity::Both => match ath.measure(&mut i2c, &mut delay) {
                Ok(m) => log::info!(
                    "[ATH10] {path}> {:.2} C, {:.2}%",
                    m.temperature,
                    m.humidity
                ),
                Err(e) => log::error!("[ATH10] {path}> Error reading: {e:?}"),
            },
            Quantity::Temperature => match ath.read_temperature(&mut i2c, &mut delay) {
                Ok(t) => log::info!("[ATH10] {path}> {:.2} C", t.celsius()),
                Err(e) => log::error!("[ATH10] {path}> Error reading: {e:?}"),
            },
            Quantity::Humidity => match ath.read_humidity(&mut i2c, &mut delay) {
                Ok(h) => log::info!("[ATH10] {path}> {:.2}%", h.percentage()),
                Err(e) => log::error!("[ATH10] {path}> Error reading: {e:?}"),
            },
        }
        taken += 1;
        log::debug!(
            "[ATH10] {path}> Measured in {:.2} ms.",
            start.elapsed().as_secs_f64() * 1000.0
        );
        if let Some(rest) = interval.checked_sub(start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    if args.reset {
        if let Err(e) = ath.reset(&mut i2c) {
            log::error!("[ATH10] {path}> Error resetting sensor: {e:?}");
            return ExitCode::FAILURE;
        }
        log::info!("[ATH10] {path}> Sensor reset.");
    }
    log::info!("[ATH10] {path}> Exiting.");
    ExitCode::SUCCESS
}
