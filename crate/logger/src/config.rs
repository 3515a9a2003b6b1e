use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    error::{logger_bail, result::LoggerResultHelper},
    LoggerError,
};

/// Maximum length of a remote log stream id.
pub const MAX_LOG_STREAM_ID_LEN: usize = 511;

/// Options of a connection-backed logger.
///
/// Missing fields take their default value when deserialized, so a file
/// holding only `remote_project_id` and `remote_log_stream_id` keeps the
/// console enabled.
///
/// # Example
///
/// ```toml
/// remote_project_id = "my-project"
/// remote_log_stream_id = "services/api"
/// console_enabled = false
/// ```
#[derive(Serialize, Deserialize, Eq, PartialEq, Debug, Clone)]
#[serde(default)]
pub struct LoggerOptions {
    /// Project the remote entries are uploaded to.
    /// Remote logging is disabled when empty.
    pub remote_project_id: String,

    /// Name of the remote log stream, at most 511 characters among
    /// `[A-Za-z0-9]`, `/`, `_`, `-` and `.`.
    pub remote_log_stream_id: String,

    /// Should lines be written to the console? Defaults to true.
    pub console_enabled: bool,

    /// Prefix console lines with the current time. Defaults to false.
    pub console_timestamps: bool,

    /// URL of the remote collector
    /// (for instance, <http://localhost:4317>)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            remote_project_id: String::new(),
            remote_log_stream_id: String::new(),
            console_enabled: true,
            console_timestamps: false,
            remote_url: None,
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

impl LoggerOptions {
    /// Loads the options from a TOML file, or a JSON file when the extension
    /// is `.json`.
    ///
    /// # Errors
    /// Fails when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, LoggerError> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Unable to read configuration file {path:?}"))?;
        trace!("Configuration file contents: {content}");
        let options = if is_json(path) {
            serde_json::from_str(&content)?
        } else {
            toml::from_str(&content)?
        };
        Ok(options)
    }

    /// Saves the options, in JSON when the extension is `.json`, TOML otherwise.
    ///
    /// # Errors
    /// Fails when the options cannot be serialized or the file written.
    pub fn save(&self, path: &Path) -> Result<(), LoggerError> {
        trace!("Saving configuration to {path:?}");
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Unable to create directory for configuration file {parent:?}")
            })?;
        }
        fs::write(path, content)
            .with_context(|| format!("Unable to write configuration to file {path:?}"))
    }

    /// Resolves the configuration file location from:
    /// - the `conf` argument
    /// - the environment variable named `env_var_name`
    ///
    /// Returns `Ok(None)` when neither is set.
    ///
    /// # Errors
    /// Fails when the designated file does not exist.
    pub fn location(
        conf: Option<PathBuf>,
        env_var_name: &str,
    ) -> Result<Option<PathBuf>, LoggerError> {
        trace!("Getting configuration file location");
        if let Some(conf_path) = conf {
            if !conf_path.exists() {
                logger_bail!(
                    Configuration,
                    "Configuration file {conf_path:?} does not exist"
                );
            }
            return Ok(Some(conf_path));
        }
        if let Ok(conf_path) = env::var(env_var_name).map(PathBuf::from) {
            if !conf_path.exists() {
                logger_bail!(
                    Configuration,
                    "Configuration file {conf_path:?} specified in {env_var_name} environment \
                     variable does not exist"
                );
            }
            return Ok(Some(conf_path));
        }
        Ok(None)
    }
}

/// Checks a remote log stream id: 1 to 511 characters among `[A-Za-z0-9]`,
/// `/`, `_`, `-` and `.`.
///
/// # Errors
/// Returns `LoggerError::InvalidLogStreamId` describing the violation.
pub fn validate_log_stream_id(log_stream_id: &str) -> Result<(), LoggerError> {
    if log_stream_id.is_empty() {
        logger_bail!(InvalidLogStreamId, "the log stream id is empty");
    }
    if log_stream_id.len() > MAX_LOG_STREAM_ID_LEN {
        logger_bail!(
            InvalidLogStreamId,
            "{} characters, at most {MAX_LOG_STREAM_ID_LEN} allowed",
            log_stream_id.len()
        );
    }
    if let Some(c) = log_stream_id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '-' | '.')))
    {
        logger_bail!(
            InvalidLogStreamId,
            "{log_stream_id:?} contains the forbidden character {c:?}"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = LoggerOptions::default();
        assert!(options.console_enabled);
        assert!(!options.console_timestamps);
        assert!(options.remote_project_id.is_empty());
        assert!(options.remote_url.is_none());
    }

    #[test]
    fn test_partial_file_keeps_console_default() {
        let options: LoggerOptions = toml::from_str(
            r#"
            remote_project_id = "acme"
            remote_log_stream_id = "svc/api"
            "#,
        )
        .unwrap();
        assert_eq!(options.remote_project_id, "acme");
        assert!(options.console_enabled);

        let options: LoggerOptions = serde_json::from_str(r#"{"console_enabled": false}"#).unwrap();
        assert!(!options.console_enabled);
        assert!(options.remote_project_id.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = env::temp_dir().join(format!("fanout_logger_conf_{}", std::process::id()));
        let options = LoggerOptions {
            remote_project_id: "acme".to_owned(),
            remote_log_stream_id: "svc.api".to_owned(),
            console_enabled: false,
            console_timestamps: true,
            remote_url: Some("http://localhost:4317".to_owned()),
        };

        let toml_path = dir.join("logger.toml");
        options.save(&toml_path).unwrap();
        assert_eq!(LoggerOptions::load(&toml_path).unwrap(), options);

        let json_path = dir.join("logger.json");
        options.save(&json_path).unwrap();
        assert_eq!(LoggerOptions::load(&json_path).unwrap(), options);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_errors() {
        let missing = Path::new("/nonexistent/fanout_logger.toml");
        assert!(matches!(
            LoggerOptions::load(missing),
            Err(LoggerError::Default(_))
        ));

        let path = env::temp_dir().join(format!("fanout_logger_bad_{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            LoggerOptions::load(&path),
            Err(LoggerError::Parsing(_))
        ));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_location() {
        let missing = PathBuf::from("/nonexistent/fanout_logger.toml");
        assert!(LoggerOptions::location(Some(missing), "FANOUT_LOGGER_TEST_UNSET").is_err());

        let existing = env::temp_dir();
        assert_eq!(
            LoggerOptions::location(Some(existing.clone()), "FANOUT_LOGGER_TEST_UNSET").unwrap(),
            Some(existing)
        );
        assert_eq!(
            LoggerOptions::location(None, "FANOUT_LOGGER_TEST_UNSET").unwrap(),
            None
        );
    }

    #[test]
    fn test_validate_log_stream_id() {
        validate_log_stream_id("projects/api_v2-prod.log").unwrap();
        validate_log_stream_id(&"a".repeat(MAX_LOG_STREAM_ID_LEN)).unwrap();

        for invalid in ["", "has space", "semi;colon", "accentué"] {
            assert!(
                matches!(
                    validate_log_stream_id(invalid),
                    Err(LoggerError::InvalidLogStreamId(_))
                ),
                "{invalid:?} should be rejected"
            );
        }
        assert!(validate_log_stream_id(&"a".repeat(MAX_LOG_STREAM_ID_LEN + 1)).is_err());
    }
}
