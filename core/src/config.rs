use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::schema::{Revision, Schema};
use crate::store::StoreConfig;
use crate::{targets, Error};

pub const DEFAULT_COLLECTION_URL: &str =
    "https://69829b249c3efeb892a2bfb9.mockapi.io/api/sinhvien/sinhvien";
pub const CONFIG_PATH_ENV: &str = "STUDENTDESK_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "studentdesk.ron";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsoleLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl ConsoleLevel {
    pub const ALL: [ConsoleLevel; 5] = [
        ConsoleLevel::Error,
        ConsoleLevel::Warn,
        ConsoleLevel::Info,
        ConsoleLevel::Debug,
        ConsoleLevel::Trace,
    ];
}

impl fmt::Display for ConsoleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleLevel::Error => f.write_str("Error"),
            ConsoleLevel::Warn => f.write_str("Warn"),
            ConsoleLevel::Info => f.write_str("Info"),
            ConsoleLevel::Debug => f.write_str("Debug"),
            ConsoleLevel::Trace => f.write_str("Trace"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub collection_url: String,
    pub revision: Revision,
    pub schema: Option<Schema>,
    pub request_timeout_secs: Option<u64>,
    pub log_level: ConsoleLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            collection_url: DEFAULT_COLLECTION_URL.to_string(),
            revision: Revision::default(),
            schema: None,
            request_timeout_secs: None,
            log_level: ConsoleLevel::default(),
        }
    }
}

impl AppConfig {
    /// Path from `STUDENTDESK_CONFIG`, else `studentdesk.ron`.
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let label = path.display().to_string();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(target: targets::CONFIG, path = %label, "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(Error::ConfigIo {
                    path: label,
                    source,
                });
            }
        };

        let config = Self::parse(&contents).map_err(|source| Error::ConfigRon {
            path: label.clone(),
            source,
        })?;
        info!(
            target: targets::CONFIG,
            path = %label,
            url = %config.collection_url,
            schema = %config.schema().name,
            "Config loaded"
        );
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(contents)
    }

    /// The custom schema when present, otherwise the revision's layout.
    pub fn schema(&self) -> Schema {
        self.schema
            .clone()
            .unwrap_or_else(|| self.revision.schema())
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            collection_url: self.collection_url.clone(),
            timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::parse("()").expect("parse");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.schema(), Revision::Contact.schema());
        assert_eq!(config.store_config().timeout, None);
    }

    #[test]
    fn partial_file_overrides_fields() {
        let config = AppConfig::parse(
            r#"(
                collection_url: "https://example.test/api/students",
                revision: Academic,
                request_timeout_secs: Some(15),
                log_level: Debug,
            )"#,
        )
        .expect("parse");

        assert_eq!(config.collection_url, "https://example.test/api/students");
        assert_eq!(config.schema().name, "academic");
        assert_eq!(config.log_level, ConsoleLevel::Debug);
        assert_eq!(
            config.store_config().timeout,
            Some(Duration::from_secs(15))
        );
    }

    #[test]
    fn custom_schema_wins_over_revision() {
        let config = AppConfig::parse(
            r#"(
                revision: Directory,
                schema: Some((
                    name: "lab",
                    fields: [(name: "code", label: "Code", kind: Text, required: true)],
                )),
            )"#,
        )
        .expect("parse");

        assert_eq!(config.schema().name, "lab");
        assert_eq!(config.schema().fields.len(), 1);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("studentdesk-missing-config.ron");
        let _ = fs::remove_file(&path);
        let config = AppConfig::load(&path).expect("defaults");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = std::env::temp_dir().join(format!(
            "studentdesk-bad-config-{}.ron",
            std::process::id()
        ));
        fs::write(&path, "(collection_url: 42)").expect("write config");

        let result = AppConfig::load(&path);
        let _ = fs::remove_file(&path);

        match result {
            Err(Error::ConfigRon { path: error_path, .. }) => {
                assert!(error_path.ends_with(".ron"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
