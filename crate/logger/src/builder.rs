use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::{
    config::validate_log_stream_id, ConsoleSink, Level, LevelFanoutLogger, LoggerError,
    LoggerOptions, ProcessExit, RemoteBackend, RemoteConnection, Sink, Terminator,
};

/// Mutable configuration record of a [`LevelFanoutLogger`].
///
/// Defaults: console enabled and writing to stdout, no remote sink, fatal
/// calls exiting the process. Every setter overwrites only the field it
/// targets, so the last call for a field wins.
///
/// ```ignore
/// let logger = LevelFanoutLogger::builder()
///     .error_sink(alerts)
///     .console_enabled(false)
///     .build();
/// ```
pub struct LoggerBuilder {
    remote_sinks: [Option<Arc<dyn Sink>>; 4],
    console_enabled: bool,
    console_sink: Arc<dyn Sink>,
    terminator: Arc<dyn Terminator>,
    connection: Option<Box<dyn RemoteConnection>>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self {
            remote_sinks: Default::default(),
            console_enabled: true,
            console_sink: Arc::new(ConsoleSink::stdout()),
            terminator: Arc::new(ProcessExit),
            connection: None,
        }
    }
}

impl LoggerBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the remote sink serving `level`. `Level::Fatal` binds the
    /// `Error` sink it shares.
    #[must_use]
    pub fn sink(mut self, level: Level, sink: Arc<dyn Sink>) -> Self {
        self.remote_sinks[level.slot()] = Some(sink);
        self
    }

    #[must_use]
    pub fn debug_sink(self, sink: Arc<dyn Sink>) -> Self {
        self.sink(Level::Debug, sink)
    }

    #[must_use]
    pub fn info_sink(self, sink: Arc<dyn Sink>) -> Self {
        self.sink(Level::Info, sink)
    }

    #[must_use]
    pub fn warning_sink(self, sink: Arc<dyn Sink>) -> Self {
        self.sink(Level::Warning, sink)
    }

    #[must_use]
    pub fn error_sink(self, sink: Arc<dyn Sink>) -> Self {
        self.sink(Level::Error, sink)
    }

    #[must_use]
    pub fn console_enabled(mut self, enabled: bool) -> Self {
        self.console_enabled = enabled;
        self
    }

    /// Replaces the console sink, stdout by default.
    #[must_use]
    pub fn console_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.console_sink = sink;
        self
    }

    #[must_use]
    pub fn terminator(mut self, terminator: Arc<dyn Terminator>) -> Self {
        self.terminator = terminator;
        self
    }

    /// Connects to `backend` and binds one writer per non-fatal level, all
    /// tagged with `log_stream_id`.
    ///
    /// An empty `project_id` leaves the builder untouched: remote logging
    /// stays disabled and no connection is attempted.
    ///
    /// # Errors
    /// Fails when the log stream id is invalid or the connection cannot be
    /// opened. No sink is bound in that case.
    pub fn connect_remote(
        mut self,
        backend: &dyn RemoteBackend,
        project_id: &str,
        log_stream_id: &str,
    ) -> Result<Self, LoggerError> {
        if project_id.is_empty() {
            debug!("no remote project configured, remote logging disabled");
            return Ok(self);
        }
        validate_log_stream_id(log_stream_id)?;
        let connection = backend.connect(project_id)?;
        debug!("connected to remote project {project_id}, log stream {log_stream_id}");

        for level in Level::REMOTE {
            self.remote_sinks[level.slot()] = Some(connection.writer(log_stream_id, level));
        }
        if let Some(previous) = self.connection.replace(connection) {
            if let Err(err) = previous.close() {
                warn!("closing the replaced remote connection failed: {err}");
            }
        }
        Ok(self)
    }

    /// Freezes the configuration.
    #[must_use]
    pub fn build(self) -> LevelFanoutLogger {
        LevelFanoutLogger {
            remote_sinks: self.remote_sinks,
            console_enabled: self.console_enabled,
            console_sink: self.console_sink,
            terminator: self.terminator,
            connection: Mutex::new(self.connection),
        }
    }
}

impl From<&LoggerOptions> for LoggerBuilder {
    /// Applies the local part of the options. The remote part requires a
    /// backend, see [`LoggerBuilder::connect_remote`].
    fn from(options: &LoggerOptions) -> Self {
        Self::default()
            .console_enabled(options.console_enabled)
            .console_sink(Arc::new(
                ConsoleSink::stdout().with_timestamps(options.console_timestamps),
            ))
    }
}
