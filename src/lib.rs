pub mod arrival;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
pub mod kernel;
pub mod models;
pub mod rng;
pub mod roster;
pub mod router;
pub mod stations;
pub mod travel;

#[cfg(any(test, debug_assertions))]
pub mod test_helpers;

use std::path::PathBuf;

use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::encode::pattern::PatternEncoder;

pub use config::{
    ArrivalCurveConfig, CheckpointConfig, HoldRoomConfig, KernelConfig, TicketCounterConfig,
};
pub use errors::{ConfigWarning, Error};
pub use kernel::{Kernel, Snapshot};
pub use models::{Flight, FlightId, Passenger, PassengerId, PassengerStamps};
pub use travel::{TravelModel, TravelTimeProvider};

/// Resolves the platform application-data directory this process should
/// use for logs and an optional flight-roster CSV. Overridable via
/// `CONCOURSE_SIM_DATA_DIR` so tests and CI runs never touch a real home
/// directory.
pub fn app_data_dir() -> Result<PathBuf, Error> {
    if let Ok(dir) = std::env::var("CONCOURSE_SIM_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }

    let Some(data_dir) = dirs::data_dir() else {
        return Err(Error::Other(std::io::Error::other(
            "failed to resolve system data directory",
        )));
    };

    let app_dir = data_dir.join("concourse-sim");
    if !app_dir.exists() {
        std::fs::create_dir_all(&app_dir)?;
    }
    Ok(app_dir)
}

/// Sets up console + rotating-file logging: a short pattern on stdout, a
/// timestamped pattern in `<app-data-dir>/logs/output.log`. Call once at
/// process startup; safe to skip entirely in library use (tests configure
/// their own subscriber, if any).
pub fn init_logging() -> Result<(), Error> {
    let app_dir = app_data_dir()?;
    let logs_dir = app_dir.join("logs");
    std::fs::create_dir_all(&logs_dir)?;
    let log_file_path = logs_dir.join("output.log");

    let console_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{h({l})} - {m}{n}")))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d} - {l} - {m}{n}")))
        .build(&log_file_path)
        .map_err(|e| Error::LogConfig(format!("failed creating file appender: {e}")))?;

    let config = log4rs::Config::builder()
        .appender(log4rs::config::Appender::builder().build("console", Box::new(console_appender)))
        .appender(log4rs::config::Appender::builder().build("logfile", Box::new(file_appender)))
        .build(
            log4rs::config::Root::builder()
                .appender("console")
                .appender("logfile")
                .build(LevelFilter::Info),
        )
        .map_err(|e| Error::LogConfig(format!("failed building log4rs config: {e}")))?;

    log4rs::init_config(config)
        .map_err(|e| Error::LogConfig(format!("failed initializing log4rs: {e}")))?;

    Ok(())
}
