//! Logging setup for follower executables
//!
//! Records are written to stdout with coloured level tags and to the session log file with plain
//! ones. Each line carries the seconds elapsed since the session epoch. Individual targets, e.g.
//! `follower_lib`, can be given their own level so library detail can be turned up without the
//! rest of the dependency tree.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use colored::{ColoredString, Colorize};
use log::info;
use std::fmt;
use thiserror::Error;

// Internal imports
use crate::session;

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Expected a default log level at least as verbose as `INFO`, found `{0}`")]
    InvalidMinLogLevel(log::LevelFilter),

    #[error("Log level for target `{0}` is set more than once")]
    DuplicateTarget(String),

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
///
/// `default_level` applies to every target not listed in `target_levels`. A target entry covers
/// the target and its submodules, so `("follower_lib", LevelFilter::Trace)` also enables
/// `follower_lib::assembly`.
///
/// # Notes
///
/// - `default_level` must be at least `log::Level::Info`, per-target levels may be anything
///   including `Off`.
/// - This function must only be called once, a second call will fail with
///   `LoggerInitError::FernInitError`.
pub fn logger_init(
    default_level: LevelFilter,
    target_levels: &[(&'static str, LevelFilter)],
    session: &session::Session,
) -> Result<(), LoggerInitError> {
    check_levels(default_level, target_levels)?;

    let log_file =
        fern::log_file(&session.log_file_path).map_err(LoggerInitError::LogFileInitError)?;

    let mut dispatch = fern::Dispatch::new().level(default_level);
    for (target, level) in target_levels.iter() {
        dispatch = dispatch.level_for(*target, *level);
    }

    dispatch
        .chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "{}",
                        format_line(
                            session::get_elapsed_seconds(),
                            record.level(),
                            record.target(),
                            message,
                            true
                        )
                    ))
                })
                .chain(std::io::stdout()),
        )
        .chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "{}",
                        format_line(
                            session::get_elapsed_seconds(),
                            record.level(),
                            record.target(),
                            message,
                            false
                        )
                    ))
                })
                .chain(log_file),
        )
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    if let Some(epoch) = session::get_epoch() {
        info!("    Session epoch: {}", epoch);
    }
    info!("    Default log level: {:?}", default_level);
    for (target, level) in target_levels.iter() {
        info!("    Log level for {}: {:?}", target, level);
    }
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn check_levels(
    default_level: LevelFilter,
    target_levels: &[(&'static str, LevelFilter)],
) -> Result<(), LoggerInitError> {
    if default_level < log::Level::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(default_level));
    }

    for (i, (target, _)) in target_levels.iter().enumerate() {
        if target_levels[..i].iter().any(|(t, _)| t == target) {
            return Err(LoggerInitError::DuplicateTarget(target.to_string()));
        }
    }

    Ok(())
}

/// Format one log line.
///
/// Only debug and trace lines carry their target, info and above are meant to be read by an
/// operator.
fn format_line<M: fmt::Display>(
    elapsed_s: f64,
    level: log::Level,
    target: &str,
    message: M,
    colour: bool,
) -> String {
    let tag = if colour {
        level_to_str(level).to_string()
    } else {
        level_to_plain_str(level).to_string()
    };

    if level > log::Level::Info {
        format!("[{:10.6} {}] {}: {}", elapsed_s, tag, target, message)
    } else {
        format!("[{:10.6} {}] {}", elapsed_s, tag, message)
    }
}

/// Get the coloured string representation of a log level
fn level_to_str(level: log::Level) -> ColoredString {
    match level {
        log::Level::Trace => level_to_plain_str(level).dimmed().italic(),
        log::Level::Debug => level_to_plain_str(level).dimmed(),
        log::Level::Info => level_to_plain_str(level).normal(),
        log::Level::Warn => level_to_plain_str(level).yellow(),
        log::Level::Error => level_to_plain_str(level).red().bold(),
    }
}

fn level_to_plain_str(level: log::Level) -> &'static str {
    match level {
        log::Level::Trace => "TRC",
        log::Level::Debug => "DBG",
        log::Level::Info => "INF",
        log::Level::Warn => "WRN",
        log::Level::Error => "ERR",
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_level_tags() {
        assert_eq!(level_to_str(log::Level::Info).to_string(), "INF".normal().to_string());
        assert!(level_to_str(log::Level::Error).contains("ERR"));
        assert_eq!(level_to_plain_str(log::Level::Warn), "WRN");
    }

    #[test]
    fn test_plain_lines() {
        assert_eq!(
            format_line(1.5, log::Level::Info, "follower_lib::assembly", "assembled", false),
            "[  1.500000 INF] assembled"
        );
        assert_eq!(
            format_line(
                0.25,
                log::Level::Debug,
                "follower_lib::assembly",
                format_args!("mass {}", 16.2),
                false
            ),
            "[  0.250000 DBG] follower_lib::assembly: mass 16.2"
        );
    }

    #[test]
    fn test_coloured_lines_keep_text() {
        let line = format_line(2.0, log::Level::Warn, "follower_lib", "violation", true);

        assert!(line.contains("WRN"));
        assert!(line.ends_with("] violation"));
        assert!(!line.contains("follower_lib"));
    }

    #[test]
    fn test_level_checks() {
        assert!(check_levels(
            LevelFilter::Info,
            &[("follower_lib", LevelFilter::Trace), ("fern", LevelFilter::Off)]
        )
        .is_ok());

        assert!(matches!(
            check_levels(LevelFilter::Warn, &[]),
            Err(LoggerInitError::InvalidMinLogLevel(LevelFilter::Warn))
        ));
        assert!(matches!(
            check_levels(
                LevelFilter::Info,
                &[
                    ("follower_lib", LevelFilter::Debug),
                    ("follower_lib", LevelFilter::Trace)
                ]
            ),
            Err(LoggerInitError::DuplicateTarget(_))
        ));
    }
}
