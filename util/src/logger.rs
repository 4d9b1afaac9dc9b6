//! Session logger
//!
//! Messages go to two outputs: the console, filtered at the level requested
//! by the executable, and the session log file, which always records at least
//! debug messages so a solve can be inspected after the fact.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use colored::{ColoredString, Colorize};
use log::{info, Level, Record};
use thiserror::Error;

// Internal imports
use crate::session::{self, Session};

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Least verbose level ever written to the session log file.
const FILE_MIN_LEVEL: LevelFilter = LevelFilter::Debug;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("The console log level must be INFO or more verbose, found `{0}`")]
    InvalidMinLogLevel(LevelFilter),

    #[error("Could not open the session log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("Could not install the logger: {0}")]
    FernInitError(log::SetLoggerError),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
///
/// `module_levels` overrides the console level for individual targets, for
/// example `("swerve_lib::kin_model", LevelFilter::Trace)` to follow the
/// solvers without enabling trace output everywhere else.
///
/// # Safety
///
/// - This function must only be called once to prevent corrupting logs.
pub fn logger_init(
    min_level: LevelFilter,
    session: &Session,
    module_levels: &[(&'static str, LevelFilter)],
) -> Result<(), LoggerInitError> {
    check_min_level(min_level)?;

    let log_file = fern::log_file(&session.log_file_path)
        .map_err(LoggerInitError::LogFileInitError)?;

    let mut console = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{:10.6} {}] {}",
                session::get_elapsed_seconds().unwrap_or(0.0),
                level_to_str(record.level()),
                with_target(record, message)
            ))
        })
        .level(min_level);
    for (target, level) in module_levels {
        console = console.level_for(*target, *level);
    }

    let file = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{:10.6} {}] {}",
                session::get_elapsed_seconds().unwrap_or(0.0),
                record.level(),
                with_target(record, message)
            ))
        })
        .level(min_level.max(FILE_MIN_LEVEL));

    fern::Dispatch::new()
        .chain(console.chain(std::io::stdout()))
        .chain(file.chain(log_file))
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    if let Ok(epoch) = session::get_epoch() {
        info!("    Session epoch: {}", epoch);
    }
    info!("    Console level: {:?}", min_level);
    for (target, level) in module_levels {
        info!("        {}: {:?}", target, level);
    }
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// The console must show at least info messages.
fn check_min_level(min_level: LevelFilter) -> Result<(), LoggerInitError> {
    if min_level < Level::Info {
        Err(LoggerInitError::InvalidMinLogLevel(min_level))
    } else {
        Ok(())
    }
}

/// Prefix debug and trace messages with their target.
fn with_target(record: &Record, message: &std::fmt::Arguments) -> String {
    if record.level() > Level::Info {
        format!("{}: {}", record.target(), message)
    } else {
        format!("{}", message)
    }
}

/// Coloured tag for a log level
fn level_to_str(level: Level) -> ColoredString {
    match level {
        Level::Trace => "TRC".dimmed().italic(),
        Level::Debug => "DBG".dimmed(),
        Level::Info => "INF".normal(),
        Level::Warn => "WRN".yellow(),
        Level::Error => "ERR".red().bold(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_check_min_level() {
        assert!(matches!(
            check_min_level(LevelFilter::Warn),
            Err(LoggerInitError::InvalidMinLogLevel(LevelFilter::Warn))
        ));
        assert!(check_min_level(LevelFilter::Off).is_err());
        assert!(check_min_level(LevelFilter::Info).is_ok());
        assert!(check_min_level(LevelFilter::Trace).is_ok());
    }

    #[test]
    fn test_file_level_never_quieter_than_debug() {
        assert_eq!(LevelFilter::Info.max(FILE_MIN_LEVEL), LevelFilter::Debug);
        assert_eq!(LevelFilter::Trace.max(FILE_MIN_LEVEL), LevelFilter::Trace);
    }
}
