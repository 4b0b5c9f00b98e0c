//! Integration with the `log` crate for logging while status lines are shown.
//!
//! When enabled (via the `log` feature), this module provides a logger that
//! erases the session's status lines before writing a log message. The next
//! publish draws them again below the message, so log output is never mixed
//! with a half-drawn status.
//!
//! # Example
//!
//! ```rust,ignore
//! use tickline::progress::{Session, init_log_integration};
//! use log::info;
//!
//! let session = Session::default();
//! init_log_integration(session.clone());
//!
//! let mut worker = session.init(100);
//! info!("Starting processing");
//! for _ in 0..100 {
//!     if worker.record(1) {
//!         let _ = session.write_status("{{ percent() }} [{{ bar() }}]");
//!     }
//! }
//! ```

use super::session::Session;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;

/// A logger that keeps out of the way of a session's status lines.
pub struct ProgressLogger {
    session: Session,
    level: LevelFilter,
    target_filter: Option<String>,
}

impl ProgressLogger {
    /// Creates a logger that clears `session` before each message.
    ///
    /// # Arguments
    ///
    /// * `session` - The session whose status lines are cleared
    /// * `level` - The maximum log level to display
    pub fn new(session: Session, level: LevelFilter) -> Self {
        Self {
            session,
            level,
            target_filter: None,
        }
    }

    /// Creates a logger with a target filter.
    ///
    /// Only log messages whose target starts with the given prefix will be displayed.
    pub fn with_target(session: Session, level: LevelFilter, target: impl Into<String>) -> Self {
        Self {
            session,
            level,
            target_filter: Some(target.into()),
        }
    }

    /// Installs this logger as the global logger.
    ///
    /// # Errors
    ///
    /// Returns an error if a logger has already been set.
    pub fn init(self) -> Result<(), SetLoggerError> {
        let level = self.level;
        // Set logger first to avoid modifying max level if logger installation fails
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }

    fn format_message(&self, record: &Record) -> String {
        let level_str = match record.level() {
            Level::Error => console::style("ERROR").red().for_stderr(),
            Level::Warn => console::style("WARN").yellow().for_stderr(),
            Level::Info => console::style("INFO").cyan().for_stderr(),
            Level::Debug => console::style("DEBUG").dim().for_stderr(),
            Level::Trace => console::style("TRACE").dim().for_stderr(),
        };
        format!("{} {}", level_str, record.args())
    }
}

impl Log for ProgressLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if metadata.level() > self.level {
            return false;
        }
        if let Some(ref filter) = self.target_filter {
            metadata.target().starts_with(filter)
        } else {
            true
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = self.format_message(record);
        let _ = self.session.clear();
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{}", message);
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Initializes the session-aware logger with the default log level (Info).
///
/// # Panics
///
/// Panics if a logger has already been initialized.
pub fn init_log_integration(session: Session) {
    ProgressLogger::new(session, LevelFilter::Info)
        .init()
        .expect("Failed to initialize logger - another logger may already be set");
}

/// Initializes the session-aware logger with a custom log level.
///
/// # Panics
///
/// Panics if a logger has already been initialized.
pub fn init_log_integration_with_level(session: Session, level: LevelFilter) {
    ProgressLogger::new(session, level)
        .init()
        .expect("Failed to initialize logger - another logger may already be set");
}

/// Tries to initialize the session-aware logger, returning an error on failure.
///
/// # Errors
///
/// Returns an error if a logger has already been set.
pub fn try_init_log_integration(session: Session) -> Result<(), SetLoggerError> {
    ProgressLogger::new(session, LevelFilter::Info).init()
}

/// Tries to initialize the session-aware logger with a custom level.
///
/// # Errors
///
/// Returns an error if a logger has already been set.
pub fn try_init_log_integration_with_level(
    session: Session,
    level: LevelFilter,
) -> Result<(), SetLoggerError> {
    ProgressLogger::new(session, level).init()
}
