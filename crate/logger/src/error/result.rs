use std::fmt::Display;

use super::LoggerError;

pub(crate) type LoggerResult<R> = Result<R, LoggerError>;

pub(crate) trait LoggerResultHelper<T> {
    fn context(self, context: &str) -> LoggerResult<T>;
    fn with_context<D, O>(self, op: O) -> LoggerResult<T>
    where
        D: Display + Send + Sync + 'static,
        O: FnOnce() -> D;
}

impl<T, E> LoggerResultHelper<T> for Result<T, E>
where
    E: std::error::Error,
{
    fn context(self, context: &str) -> LoggerResult<T> {
        self.map_err(|e| LoggerError::Default(format!("{context}: {e}")))
    }

    fn with_context<D, O>(self, op: O) -> LoggerResult<T>
    where
        D: Display + Send + Sync + 'static,
        O: FnOnce() -> D,
    {
        self.map_err(|e| LoggerError::Default(format!("{}: {e}", op())))
    }
}

impl<T> LoggerResultHelper<T> for Option<T> {
    fn context(self, context: &str) -> LoggerResult<T> {
        self.ok_or_else(|| LoggerError::Default(context.to_owned()))
    }

    fn with_context<D, O>(self, op: O) -> LoggerResult<T>
    where
        D: Display + Send + Sync + 'static,
        O: FnOnce() -> D,
    {
        self.ok_or_else(|| LoggerError::Default(format!("{}", op())))
    }
}
