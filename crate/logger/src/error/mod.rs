use thiserror::Error;

pub(crate) mod result;

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("{0}")]
    Default(String),

    #[error("Remote connection error: {0}")]
    Connection(String),

    #[error("Invalid log stream id: {0}")]
    InvalidLogStreamId(String),

    #[error("Sink write error: {0}")]
    Write(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Parsing error: {0}")]
    Parsing(String),

    #[error("Tracing subscriber error: {0}")]
    TracingSubscriber(String),

    #[error("IO error: {0}")]
    IOError(String),

    #[error("Logger already initialized")]
    AlreadyInitialized,
}

impl From<std::io::Error> for LoggerError {
    fn from(e: std::io::Error) -> Self {
        Self::IOError(e.to_string())
    }
}

impl From<tracing_subscriber::filter::ParseError> for LoggerError {
    fn from(e: tracing_subscriber::filter::ParseError) -> Self {
        Self::Parsing(e.to_string())
    }
}

impl From<tracing_subscriber::util::TryInitError> for LoggerError {
    fn from(value: tracing_subscriber::util::TryInitError) -> Self {
        Self::TracingSubscriber(value.to_string())
    }
}

impl From<serde_json::Error> for LoggerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parsing(e.to_string())
    }
}

impl From<toml::de::Error> for LoggerError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parsing(e.to_string())
    }
}

impl From<toml::ser::Error> for LoggerError {
    fn from(e: toml::ser::Error) -> Self {
        Self::Configuration(e.to_string())
    }
}

impl From<url::ParseError> for LoggerError {
    fn from(e: url::ParseError) -> Self {
        Self::Connection(format!("invalid collector URL: {e}"))
    }
}

/// Builds a `LoggerError` variant from a format string.
///
/// `logger_error!(Connection, "collector {url} refused")`
macro_rules! logger_error {
    ($variant:ident, $($arg:tt)+) => {
        $crate::LoggerError::$variant(::std::format!($($arg)+))
    };
}
pub(crate) use logger_error;

/// Returns early with a `LoggerError` variant built from a format string.
macro_rules! logger_bail {
    ($variant:ident, $($arg:tt)+) => {
        return ::core::result::Result::Err($crate::error::logger_error!($variant, $($arg)+))
    };
}
pub(crate) use logger_bail;
