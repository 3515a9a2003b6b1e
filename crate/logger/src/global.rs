//! Process-wide logger holder.
//!
//! Prefer passing a [`LevelFanoutLogger`] by reference. When a single
//! process-wide instance is wanted, initialize it once at startup with
//! [`init`], read it with [`get`], and call [`release`] once at shutdown.

use std::sync::OnceLock;

use tracing::warn;

use crate::{error::result::LoggerResultHelper, LevelFanoutLogger, LoggerError};

static LOGGER: OnceLock<LevelFanoutLogger> = OnceLock::new();

/// Installs the process-wide logger.
///
/// # Errors
/// Returns `LoggerError::AlreadyInitialized` when a logger is already
/// installed. The rejected `logger` is released before returning.
pub fn init(logger: LevelFanoutLogger) -> Result<&'static LevelFanoutLogger, LoggerError> {
    if let Err(rejected) = LOGGER.set(logger) {
        warn!("process-wide logger already initialized, releasing the new one");
        rejected.release();
        return Err(LoggerError::AlreadyInitialized);
    }
    LOGGER
        .get()
        .context("process-wide logger missing after initialization")
}

/// The process-wide logger, if installed.
#[must_use]
pub fn get() -> Option<&'static LevelFanoutLogger> {
    LOGGER.get()
}

/// Releases the process-wide logger's remote connection. The logger stays
/// installed and keeps writing to the console.
pub fn release() {
    if let Some(logger) = LOGGER.get() {
        logger.release();
    }
}
