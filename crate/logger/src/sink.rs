use std::{
    borrow::Cow,
    io::{self, Write},
};

use tracing_subscriber::fmt::{
    format::Writer,
    time::{FormatTime, SystemTime},
};

use crate::{error::logger_error, LoggerError};

/// A destination for rendered log lines.
///
/// Writes are best-effort: the logger reports a failed write on the
/// diagnostic channel and carries on. The logger adds no synchronization of its
/// own, so an implementation shared between threads must be safe for
/// concurrent calls to `write`.
pub trait Sink: Send + Sync {
    /// Records one rendered line. The line carries its trailing newline.
    fn write(&self, line: &str) -> Result<(), LoggerError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleStream {
    #[default]
    Stdout,
    Stderr,
}

/// Console sink writing lines to the process standard output or error.
///
/// Lines are written as rendered unless timestamps are enabled, in which case
/// each one is prefixed with the current UTC time in RFC 3339 format.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink {
    stream: ConsoleStream,
    timestamps: bool,
}

impl ConsoleSink {
    #[must_use]
    pub const fn new(stream: ConsoleStream) -> Self {
        Self {
            stream,
            timestamps: false,
        }
    }

    #[must_use]
    pub const fn stdout() -> Self {
        Self::new(ConsoleStream::Stdout)
    }

    #[must_use]
    pub const fn stderr() -> Self {
        Self::new(ConsoleStream::Stderr)
    }

    #[must_use]
    pub const fn with_timestamps(mut self, timestamps: bool) -> Self {
        self.timestamps = timestamps;
        self
    }

    #[must_use]
    pub const fn stream(&self) -> ConsoleStream {
        self.stream
    }

    #[must_use]
    pub const fn timestamps(&self) -> bool {
        self.timestamps
    }

    fn framed<'a>(&self, line: &'a str) -> Cow<'a, str> {
        if !self.timestamps {
            return Cow::Borrowed(line);
        }
        let mut framed = String::with_capacity(line.len() + 32);
        if SystemTime.format_time(&mut Writer::new(&mut framed)).is_ok() {
            framed.push(' ');
        }
        framed.push_str(line);
        Cow::Owned(framed)
    }
}

fn write_line(mut out: impl Write, line: &str) -> io::Result<()> {
    out.write_all(line.as_bytes())?;
    out.flush()
}

impl Sink for ConsoleSink {
    fn write(&self, line: &str) -> Result<(), LoggerError> {
        // the lock keeps a line from interleaving with other writers
        let line = self.framed(line);
        let written = match self.stream {
            ConsoleStream::Stdout => write_line(io::stdout().lock(), &line),
            ConsoleStream::Stderr => write_line(io::stderr().lock(), &line),
        };
        written.map_err(|e| logger_error!(Write, "console {:?}: {e}", self.stream))
    }
}
