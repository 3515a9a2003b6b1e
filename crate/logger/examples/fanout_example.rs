use std::path::PathBuf;

use fanout_logger::{
    diagnostics_init, global, info, warning, LevelFanoutLogger, LoggerBuilder, LoggerOptions,
};

/// Example of a process-wide logger shipping to an OpenTelemetry collector
///
/// Make sure to first start a collector with the following command:
///
/// ```bash
/// docker run -p 4317:4317 otel/opentelemetry-collector:latest
/// ```
///
/// The options are read from the file named by `FANOUT_LOGGER_CONF`, if set.
#[tokio::main]
async fn main() {
    diagnostics_init(Some("fanout_logger=debug"));

    let options = match LoggerOptions::location(None::<PathBuf>, "FANOUT_LOGGER_CONF") {
        Ok(Some(path)) => LoggerOptions::load(&path).unwrap_or_else(|err| {
            eprintln!("{err}, using defaults");
            LoggerOptions::default()
        }),
        Ok(None) => LoggerOptions {
            remote_project_id: "demo-project".to_owned(),
            remote_log_stream_id: "demo/fanout".to_owned(),
            ..Default::default()
        },
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };

    // fall back to console-only logging when the collector is unusable
    let logger = LevelFanoutLogger::new(&options).unwrap_or_else(|err| {
        eprintln!("{err}, logging to the console only");
        LoggerBuilder::from(&options).build()
    });
    let Ok(logger) = global::init(logger) else {
        return;
    };

    info!(logger; "service", "started", true);
    warning!(logger, "{} of {} workers ready", 3, 4);
    handle_request(7).await;

    global::release();
}

async fn handle_request(id: u64) {
    if let Some(logger) = global::get() {
        info!(logger, "handling request {id}");
    }
}
