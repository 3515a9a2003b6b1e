/// Logs at debug level.
///
/// Format form: `debug!(logger, "loaded {} entries", n)`.
/// Plain form, values joined by spaces: `debug!(logger; "loaded", n, "entries")`.
#[macro_export]
macro_rules! debug {
    ($logger:expr; $($value:expr),+ $(,)?) => {
        $logger.debug(&[$(&$value as &dyn ::core::fmt::Display),+])
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug_fmt(::core::format_args!($($arg)+))
    };
}

/// Logs at info level, see [`debug!`] for the two forms.
#[macro_export]
macro_rules! info {
    ($logger:expr; $($value:expr),+ $(,)?) => {
        $logger.info(&[$(&$value as &dyn ::core::fmt::Display),+])
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.info_fmt(::core::format_args!($($arg)+))
    };
}

/// Logs at warning level, see [`debug!`] for the two forms.
#[macro_export]
macro_rules! warning {
    ($logger:expr; $($value:expr),+ $(,)?) => {
        $logger.warning(&[$(&$value as &dyn ::core::fmt::Display),+])
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.warning_fmt(::core::format_args!($($arg)+))
    };
}

/// Logs at error level, see [`debug!`] for the two forms.
#[macro_export]
macro_rules! error {
    ($logger:expr; $($value:expr),+ $(,)?) => {
        $logger.error(&[$(&$value as &dyn ::core::fmt::Display),+])
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.error_fmt(::core::format_args!($($arg)+))
    };
}

/// Logs through the error sinks then exits the process with status 1.
/// See [`debug!`] for the two forms.
#[macro_export]
macro_rules! fatal {
    ($logger:expr; $($value:expr),+ $(,)?) => {
        $logger.fatal(&[$(&$value as &dyn ::core::fmt::Display),+])
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatal_fmt(::core::format_args!($($arg)+))
    };
}
