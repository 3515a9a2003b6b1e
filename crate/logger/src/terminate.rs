/// Exit status used by `fatal`.
pub const FATAL_EXIT_STATUS: i32 = 1;

/// Ends the process once a fatal line has been written.
pub trait Terminator: Send + Sync {
    fn terminate(&self, status: i32) -> !;
}

/// Default terminator: `std::process::exit`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExit;

impl Terminator for ProcessExit {
    fn terminate(&self, status: i32) -> ! {
        std::process::exit(status)
    }
}
