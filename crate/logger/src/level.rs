use std::fmt::{self, Display};

/// Severity of a log call.
///
/// Dispatch does not filter by threshold: every enabled sink receives every
/// call made at its own level. `Fatal` has no sink of its own and is routed
/// through the `Error` remote sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
}

impl Level {
    /// The levels owning a remote sink slot, in slot order.
    pub const REMOTE: [Self; 4] = [Self::Debug, Self::Info, Self::Warning, Self::Error];

    /// Index of the remote sink slot serving this level.
    pub(crate) const fn slot(self) -> usize {
        match self {
            Self::Debug => 0,
            Self::Info => 1,
            Self::Warning => 2,
            Self::Error | Self::Fatal => 3,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders the plain form: values joined by single spaces, newline-terminated.
pub(crate) fn render_values(values: &[&dyn Display]) -> String {
    let mut line = values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    line.push('\n');
    line
}

/// Renders the format form, appending a newline when the template lacks one.
pub(crate) fn render_fmt(args: fmt::Arguments<'_>) -> String {
    let mut line = fmt::format(args);
    if !line.ends_with('\n') {
        line.push('\n');
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_shares_error_slot() {
        assert_eq!(Level::Fatal.slot(), Level::Error.slot());
        let slots: Vec<usize> = Level::REMOTE.iter().map(|l| l.slot()).collect();
        assert_eq!(slots, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_render_values() {
        assert_eq!(render_values(&[&"a", &1, &true]), "a 1 true\n");
        assert_eq!(render_values(&[]), "\n");
        // a trailing newline in the last value is kept, the terminator is still added
        assert_eq!(render_values(&[&"line\n"]), "line\n\n");
    }

    #[test]
    fn test_render_fmt() {
        assert_eq!(render_fmt(format_args!("{} of {}", 3, "x")), "3 of x\n");
        assert_eq!(render_fmt(format_args!("done\n")), "done\n");
    }
}
