use std::{
    fmt::{self, Display},
    sync::{Arc, Mutex, MutexGuard},
};

use tracing::{debug, warn};

use crate::{
    level::{render_fmt, render_values},
    Level, LoggerBuilder, LoggerError, LoggerOptions, RemoteBackend, RemoteConnection, Sink,
    Terminator, FATAL_EXIT_STATUS,
};

/// Leveled logger writing each call to the remote sink of its level, then to
/// the console.
///
/// The logger is read-only once built and is meant to be shared by reference
/// (or through [`crate::global`]) for the whole process lifetime. It adds no
/// locking around writes: concurrent calls are as safe as the sinks they reach.
///
/// Call [`LevelFanoutLogger::release`] once at shutdown to flush the remote
/// connection. The logger itself does nothing on drop: whatever the backend
/// does when its connection is dropped (the OTLP provider shuts down and
/// exports its pending batch) happens without error reporting.
pub struct LevelFanoutLogger {
    pub(crate) remote_sinks: [Option<Arc<dyn Sink>>; 4],
    pub(crate) console_enabled: bool,
    pub(crate) console_sink: Arc<dyn Sink>,
    pub(crate) terminator: Arc<dyn Terminator>,
    pub(crate) connection: Mutex<Option<Box<dyn RemoteConnection>>>,
}

impl LevelFanoutLogger {
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// Builds a logger from `options`, connecting to `backend` when a remote
    /// project is configured.
    ///
    /// # Errors
    /// Returns `LoggerError::Connection` when the backend cannot be reached and
    /// `LoggerError::InvalidLogStreamId` when the stream id is malformed. Never
    /// fails when `remote_project_id` is empty.
    pub fn connect(
        options: &LoggerOptions,
        backend: &dyn RemoteBackend,
    ) -> Result<Self, LoggerError> {
        Ok(LoggerBuilder::from(options)
            .connect_remote(
                backend,
                &options.remote_project_id,
                &options.remote_log_stream_id,
            )?
            .build())
    }

    /// Builds a logger from `options` using the OTLP backend.
    ///
    /// The OTLP exporter must be built from within a Tokio runtime.
    ///
    /// # Errors
    /// Same as [`LevelFanoutLogger::connect`].
    #[cfg(feature = "full")]
    pub fn new(options: &LoggerOptions) -> Result<Self, LoggerError> {
        Self::connect(options, &crate::OtlpBackend::from_options(options))
    }

    /// True when at least one level has a remote sink.
    #[must_use]
    pub fn remote_enabled(&self) -> bool {
        self.remote_sinks.iter().any(Option::is_some)
    }

    #[must_use]
    pub const fn console_enabled(&self) -> bool {
        self.console_enabled
    }

    /// True when `level` is served by a remote sink.
    #[must_use]
    pub fn has_remote_sink(&self, level: Level) -> bool {
        self.remote_sinks[level.slot()].is_some()
    }

    /// True when a call at `level` reaches at least one sink.
    #[must_use]
    pub fn is_enabled(&self, level: Level) -> bool {
        self.console_enabled || self.has_remote_sink(level)
    }

    /// Writes `values`, space separated, at `level`.
    ///
    /// `Level::Fatal` is written like `Level::Error` and does not terminate;
    /// use [`LevelFanoutLogger::fatal`] for that.
    pub fn log_values(&self, level: Level, values: &[&dyn Display]) {
        if self.is_enabled(level) {
            self.dispatch(level, &render_values(values));
        }
    }

    /// Writes the formatted `args` at `level`.
    pub fn log_fmt(&self, level: Level, args: fmt::Arguments<'_>) {
        if self.is_enabled(level) {
            self.dispatch(level, &render_fmt(args));
        }
    }

    pub fn debug(&self, values: &[&dyn Display]) {
        self.log_values(Level::Debug, values);
    }

    pub fn debug_fmt(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Level::Debug, args);
    }

    pub fn info(&self, values: &[&dyn Display]) {
        self.log_values(Level::Info, values);
    }

    pub fn info_fmt(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Level::Info, args);
    }

    pub fn warning(&self, values: &[&dyn Display]) {
        self.log_values(Level::Warning, values);
    }

    pub fn warning_fmt(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Level::Warning, args);
    }

    pub fn error(&self, values: &[&dyn Display]) {
        self.log_values(Level::Error, values);
    }

    pub fn error_fmt(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Level::Error, args);
    }

    /// Writes `values` through the error sinks, then exits the process with
    /// status 1, whether the writes succeeded or not.
    pub fn fatal(&self, values: &[&dyn Display]) -> ! {
        self.terminate_with(&render_values(values))
    }

    /// Formatted variant of [`LevelFanoutLogger::fatal`].
    pub fn fatal_fmt(&self, args: fmt::Arguments<'_>) -> ! {
        self.terminate_with(&render_fmt(args))
    }

    fn terminate_with(&self, line: &str) -> ! {
        if self.is_enabled(Level::Fatal) {
            self.dispatch(Level::Fatal, line);
        }
        // give the remote backend a chance to ship the fatal line
        if let Some(connection) = self.lock_connection().as_ref() {
            if let Err(err) = connection.flush() {
                warn!("flushing the remote connection before exit failed: {err}");
            }
        }
        self.terminator.terminate(FATAL_EXIT_STATUS)
    }

    /// Remote first, console second.
    fn dispatch(&self, level: Level, line: &str) {
        if let Some(sink) = &self.remote_sinks[level.slot()] {
            if let Err(err) = sink.write(line) {
                warn!(level = %level, "remote sink write failed: {err}");
            }
        }
        if self.console_enabled {
            if let Err(err) = self.console_sink.write(line) {
                warn!(level = %level, "console sink write failed: {err}");
            }
        }
    }

    fn lock_connection(&self) -> MutexGuard<'_, Option<Box<dyn RemoteConnection>>> {
        self.connection
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Flushes and closes the remote connection, if any. May block until the
    /// buffered entries are shipped.
    ///
    /// Only the first call does anything. Lines logged afterwards still reach
    /// the console; the remote writers drop them.
    pub fn release(&self) {
        let Some(connection) = self.lock_connection().take() else {
            return;
        };
        debug!("releasing the remote connection");
        if let Err(err) = connection.close() {
            warn!("closing the remote connection failed: {err}");
        }
    }
}

impl fmt::Debug for LevelFanoutLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let remote_levels: Vec<Level> = Level::REMOTE
            .into_iter()
            .filter(|level| self.has_remote_sink(*level))
            .collect();
        f.debug_struct("LevelFanoutLogger")
            .field("remote_levels", &remote_levels)
            .field("console_enabled", &self.console_enabled)
            .field("connected", &self.lock_connection().is_some())
            .finish_non_exhaustive()
    }
}
