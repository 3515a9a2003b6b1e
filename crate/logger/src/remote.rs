use std::sync::Arc;

use crate::{Level, LoggerError, Sink};

/// A remote logging service able to open project-scoped connections.
pub trait RemoteBackend {
    /// Opens a connection scoped to `project_id`.
    ///
    /// # Errors
    /// Returns `LoggerError::Connection` when the backend cannot be reached or
    /// the connection cannot be set up.
    fn connect(&self, project_id: &str) -> Result<Box<dyn RemoteConnection>, LoggerError>;
}

/// An open connection to a remote backend.
///
/// The connection outlives the writers it hands out only as far as teardown is
/// concerned: once closed, the writers drop whatever they are given.
pub trait RemoteConnection: Send + Sync {
    /// Returns a writer publishing lines to `log_stream_id` at `level`.
    fn writer(&self, log_stream_id: &str, level: Level) -> Arc<dyn Sink>;

    /// Blocks until buffered entries have been handed to the backend.
    fn flush(&self) -> Result<(), LoggerError>;

    /// Flushes and closes the connection.
    fn close(&self) -> Result<(), LoggerError>;
}
