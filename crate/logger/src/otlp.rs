use std::{sync::Arc, time::Duration, time::SystemTime};

use opentelemetry::{
    logs::{AnyValue, LogRecord, Logger, LoggerProvider, Severity},
    KeyValue,
};
use opentelemetry_otlp::{WithExportConfig, WithTonicConfig};
use opentelemetry_sdk::{
    logs::{SdkLogger, SdkLoggerProvider},
    Resource,
};
use opentelemetry_semantic_conventions::{
    attribute::{CLOUD_ACCOUNT_ID, SERVICE_NAME},
    SCHEMA_URL,
};
use tokio::runtime::{Handle, RuntimeFlavor};
use tonic::transport::{Channel, Endpoint};
use tracing::debug;
use url::Url;

use crate::{
    error::logger_error, Level, LoggerError, LoggerOptions, RemoteBackend, RemoteConnection, Sink,
};

/// Collector used when the options do not name one.
pub const DEFAULT_OTLP_URL: &str = "http://localhost:4317";

/// Remote backend shipping lines to an OpenTelemetry collector over OTLP/gRPC.
///
/// # Note
/// `connect` opens the gRPC channel before returning, so it must be called
/// from within a multi-threaded Tokio runtime.
#[derive(Debug, Clone)]
pub struct OtlpBackend {
    /// The OTLP collector URL
    pub otlp_url: String,

    /// Reported as `service.name` on every entry
    pub service_name: String,

    /// Bounds the initial connection and the export of a batch
    pub timeout: Duration,
}

impl Default for OtlpBackend {
    fn default() -> Self {
        Self {
            otlp_url: DEFAULT_OTLP_URL.to_owned(),
            service_name: env!("CARGO_PKG_NAME").to_owned(),
            timeout: Duration::from_secs(3),
        }
    }
}

impl OtlpBackend {
    #[must_use]
    pub fn from_options(options: &LoggerOptions) -> Self {
        let mut backend = Self::default();
        if let Some(url) = &options.remote_url {
            backend.otlp_url.clone_from(url);
        }
        backend
    }
}

fn resource(service_name: &str, project_id: &str) -> Resource {
    let attributes = vec![
        KeyValue::new(SERVICE_NAME, service_name.to_owned()),
        KeyValue::new(CLOUD_ACCOUNT_ID, project_id.to_owned()),
    ];
    Resource::builder()
        .with_service_name(service_name.to_owned())
        .with_schema_url(attributes, SCHEMA_URL)
        .build()
}

impl OtlpBackend {
    /// Connects to the collector, failing when it cannot be reached within
    /// `timeout`.
    fn channel(&self) -> Result<Channel, LoggerError> {
        let handle = Handle::try_current()
            .map_err(|e| logger_error!(Connection, "OTLP requires a Tokio runtime: {e}"))?;
        if handle.runtime_flavor() == RuntimeFlavor::CurrentThread {
            return Err(logger_error!(
                Connection,
                "OTLP requires a multi-threaded Tokio runtime"
            ));
        }
        let endpoint = Endpoint::from_shared(self.otlp_url.clone())
            .map_err(|e| logger_error!(Connection, "invalid collector URL: {e}"))?
            .connect_timeout(self.timeout)
            .timeout(self.timeout);
        tokio::task::block_in_place(|| handle.block_on(endpoint.connect())).map_err(|e| {
            logger_error!(
                Connection,
                "Failed to reach the OTLP collector at {}. Make sure the endpoint is correct and \
                 the collector is running: {e}",
                self.otlp_url
            )
        })
    }
}

impl RemoteBackend for OtlpBackend {
    fn connect(&self, project_id: &str) -> Result<Box<dyn RemoteConnection>, LoggerError> {
        Url::parse(&self.otlp_url)?;
        let channel = self.channel()?;

        let exporter = opentelemetry_otlp::LogExporter::builder()
            .with_tonic()
            .with_channel(channel)
            .with_timeout(self.timeout)
            .build()
            .map_err(|e| logger_error!(Connection, "Failed to create OTLP log exporter: {e}"))?;

        let provider = SdkLoggerProvider::builder()
            .with_resource(resource(&self.service_name, project_id))
            .with_batch_exporter(exporter)
            .build();
        debug!("OTLP log provider connected to {}", self.otlp_url);

        Ok(Box::new(OtlpConnection { provider }))
    }
}

struct OtlpConnection {
    provider: SdkLoggerProvider,
}

impl RemoteConnection for OtlpConnection {
    fn writer(&self, log_stream_id: &str, level: Level) -> Arc<dyn Sink> {
        Arc::new(OtlpSink {
            logger: self.provider.logger(log_stream_id.to_owned()),
            level,
        })
    }

    fn flush(&self) -> Result<(), LoggerError> {
        self.provider
            .force_flush()
            .map_err(|e| logger_error!(Connection, "OTLP flush failed: {e}"))
    }

    fn close(&self) -> Result<(), LoggerError> {
        self.provider
            .shutdown()
            .map_err(|e| logger_error!(Connection, "OTLP shutdown failed: {e}"))
    }
}

const fn severity(level: Level) -> Severity {
    match level {
        Level::Debug => Severity::Debug,
        Level::Info => Severity::Info,
        Level::Warning => Severity::Warn,
        Level::Error => Severity::Error,
        Level::Fatal => Severity::Fatal,
    }
}

struct OtlpSink {
    logger: SdkLogger,
    level: Level,
}

impl Sink for OtlpSink {
    fn write(&self, line: &str) -> Result<(), LoggerError> {
        let mut record = self.logger.create_log_record();
        record.set_timestamp(SystemTime::now());
        record.set_severity_number(severity(self.level));
        record.set_severity_text(self.level.as_str());
        record.set_body(AnyValue::from(line.trim_end_matches('\n').to_owned()));
        self.logger.emit(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use opentelemetry_sdk::logs::{InMemoryLogExporter, InMemoryLogExporterBuilder};

    use super::*;

    fn in_memory_connection() -> (OtlpConnection, InMemoryLogExporter) {
        let exporter = InMemoryLogExporterBuilder::default()
            .keep_records_on_shutdown()
            .build();
        let provider = SdkLoggerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        (OtlpConnection { provider }, exporter)
    }

    #[test]
    fn test_backend_from_options() {
        let backend = OtlpBackend::from_options(&LoggerOptions::default());
        assert_eq!(backend.otlp_url, DEFAULT_OTLP_URL);

        let options = LoggerOptions {
            remote_url: Some("http://collector:4317".to_owned()),
            ..Default::default()
        };
        assert_eq!(
            OtlpBackend::from_options(&options).otlp_url,
            "http://collector:4317"
        );
    }

    #[test]
    fn test_invalid_collector_url_is_a_connection_error() {
        let backend = OtlpBackend {
            otlp_url: "not a url".to_owned(),
            ..Default::default()
        };
        assert!(matches!(
            backend.connect("acme"),
            Err(LoggerError::Connection(_))
        ));
    }

    #[test]
    fn test_severity_mapping() {
        assert_eq!(severity(Level::Warning), Severity::Warn);
        assert_eq!(severity(Level::Fatal), Severity::Fatal);
    }

    #[test]
    fn test_no_runtime_is_a_connection_error() {
        let backend = OtlpBackend {
            otlp_url: "http://127.0.0.1:4317".to_owned(),
            ..Default::default()
        };
        assert!(matches!(
            backend.connect("acme"),
            Err(LoggerError::Connection(msg)) if msg.contains("Tokio runtime")
        ));
    }

    #[tokio::test]
    async fn test_current_thread_runtime_is_a_connection_error() {
        let backend = OtlpBackend {
            otlp_url: "http://127.0.0.1:4317".to_owned(),
            ..Default::default()
        };
        assert!(matches!(
            backend.connect("acme"),
            Err(LoggerError::Connection(msg)) if msg.contains("multi-threaded")
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_unreachable_collector_fails_construction() {
        let options = LoggerOptions {
            remote_project_id: "acme".to_owned(),
            remote_log_stream_id: "svc".to_owned(),
            remote_url: Some("http://127.0.0.1:1".to_owned()),
            ..Default::default()
        };
        let backend = OtlpBackend {
            timeout: Duration::from_millis(500),
            ..OtlpBackend::from_options(&options)
        };
        assert!(matches!(
            crate::LevelFanoutLogger::connect(&options, &backend),
            Err(LoggerError::Connection(_))
        ));
    }

    #[test]
    fn test_sink_emits_one_record_per_line() {
        let (connection, exporter) = in_memory_connection();
        let sink = connection.writer("svc", Level::Warning);
        sink.write("x\n").unwrap();
        connection.flush().unwrap();

        let logs = exporter.get_emitted_logs().unwrap();
        assert_eq!(logs.len(), 1);
        let record = &logs[0].record;
        assert_eq!(record.body(), Some(&AnyValue::String("x".into())));
        assert_eq!(record.severity_number(), Some(Severity::Warn));
        assert_eq!(record.severity_text(), Some("WARNING"));
        assert_eq!(logs[0].instrumentation.name(), "svc");
    }

    #[test]
    fn test_writes_after_close_are_dropped() {
        let (connection, exporter) = in_memory_connection();
        let sink = connection.writer("svc", Level::Info);
        sink.write("before\n").unwrap();
        connection.close().unwrap();

        sink.write("after\n").unwrap();
        let logs = exporter.get_emitted_logs().unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].record.body(), Some(&AnyValue::String("before".into())));
    }
}
