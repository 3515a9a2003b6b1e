use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::LoggerError;

static DIAGNOSTICS_SET: AtomicBool = AtomicBool::new(false);

/// Routes the crate's own diagnostics (failed sink writes, remote connection
/// lifecycle) to stderr.
///
/// # Arguments
/// * `rust_log` - filter directives, `RUST_LOG` syntax
///
/// # Notes
/// - calling `diagnostics_init(None)` uses the `RUST_LOG` environment variable
/// - only the first successful call installs a subscriber; failures are
///   printed to stderr and never panic
pub fn diagnostics_init(rust_log: Option<&str>) {
    if DIAGNOSTICS_SET.swap(true, Ordering::Acquire) {
        return;
    }
    match diagnostics_init_(rust_log) {
        Ok(()) => debug!("diagnostics initialized with filter {rust_log:?}"),
        Err(err) => {
            DIAGNOSTICS_SET.store(false, Ordering::Release);
            eprintln!("Failed to initialize diagnostics: {err:?}");
        }
    }
}

fn diagnostics_init_(rust_log: Option<&str>) -> Result<(), LoggerError> {
    let filter = match rust_log {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::from_default_env(),
    }
    // the OTLP transport logs through tracing too; keep it from feeding itself
    .add_directive("hyper=error".parse()?)
    .add_directive("tonic=error".parse()?)
    .add_directive("tower::buffer=off".parse()?)
    .add_directive("opentelemetry_sdk=error".parse()?)
    .add_directive("h2=off".parse()?);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_level(true)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}
