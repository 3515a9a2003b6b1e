//! # Fanout Logger
//!
//! A leveled logger writing every call to the remote sink of its level, if
//! any, then to the console.
//!
//! ## Construction
//!
//! - [`LevelFanoutLogger::builder`]: sinks are injected per level, no I/O
//! - [`LevelFanoutLogger::connect`]: one connection to a [`RemoteBackend`]
//!   provides the four remote sinks, from [`LoggerOptions`]
//!
//! ## Features
//!
//! - `full`: enables the OTLP remote backend ([`OtlpBackend`]) and
//!   `LevelFanoutLogger::new`
//!
//! ```toml
//! [dependencies]
//! fanout_logger = { version = "0.1", features = ["full"] }
//! ```
//!
//! ## Fatal
//!
//! `fatal` writes through the error sinks then exits the process with status 1.
//! The exit goes through a [`Terminator`] that tests can replace.
mod builder;
mod config;
mod diagnostics;
mod error;
pub mod global;
mod level;
mod logger;
mod macros;
#[cfg(feature = "full")]
mod otlp;
mod remote;
mod sink;
mod terminate;

pub use builder::LoggerBuilder;
pub use config::{validate_log_stream_id, LoggerOptions, MAX_LOG_STREAM_ID_LEN};
pub use diagnostics::diagnostics_init;
pub use error::LoggerError;
pub use level::Level;
pub use logger::LevelFanoutLogger;
#[cfg(feature = "full")]
pub use otlp::{OtlpBackend, DEFAULT_OTLP_URL};
pub use remote::{RemoteBackend, RemoteConnection};
pub use sink::{ConsoleSink, ConsoleStream, Sink};
pub use terminate::{ProcessExit, Terminator, FATAL_EXIT_STATUS};
