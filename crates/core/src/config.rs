//! Intake runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the extractor
//! and sink. Core logic never reads environment variables; binaries collect the raw values
//! and hand them to the helpers here.

use crate::constants::{DEFAULT_CONFIG_FILENAME, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_WORKSHEET};
use crate::error::{IntakeError, IntakeResult};
use referral_types::NonEmptyText;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Maps local account names to the operator names used on the sheet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OperatorDirectory {
    names: BTreeMap<String, NonEmptyText>,
}

impl OperatorDirectory {
    pub fn new(names: BTreeMap<String, NonEmptyText>) -> Self {
        Self { names }
    }

    /// Look up the display name for `username`.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::UnknownOperator`] if the username has no mapping.
    pub fn resolve(&self, username: &str) -> IntakeResult<NonEmptyText> {
        self.names
            .get(username.trim())
            .cloned()
            .ok_or_else(|| IntakeError::UnknownOperator(username.to_string()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Intake configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct IntakeConfig {
    spreadsheet_id: NonEmptyText,
    worksheet: NonEmptyText,
    operators: OperatorDirectory,
    request_timeout: Duration,
}

impl IntakeConfig {
    /// Create a new `IntakeConfig`.
    pub fn new(
        spreadsheet_id: NonEmptyText,
        worksheet: NonEmptyText,
        operators: OperatorDirectory,
        request_timeout: Duration,
    ) -> IntakeResult<Self> {
        if request_timeout.is_zero() {
            return Err(IntakeError::InvalidInput(
                "request_timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            spreadsheet_id,
            worksheet,
            operators,
            request_timeout,
        })
    }

    /// Parse a configuration from YAML text.
    ///
    /// Unknown keys are rejected. Schema errors report the path of the failing key
    /// (for example `operators.jbaum`).
    pub fn parse(yaml_text: &str) -> IntakeResult<Self> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);

        let wire = match serde_path_to_error::deserialize::<_, IntakeConfigWire>(deserializer) {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let path = if path.is_empty() || path == "." {
                    "<root>".to_string()
                } else {
                    path
                };
                return Err(IntakeError::ConfigSchema {
                    path,
                    source: err.into_inner(),
                });
            }
        };

        let worksheet = match wire.worksheet {
            Some(worksheet) => worksheet,
            None => NonEmptyText::new(DEFAULT_WORKSHEET)
                .map_err(|e| IntakeError::InvalidInput(e.to_string()))?,
        };

        Self::new(
            wire.spreadsheet_id,
            worksheet,
            OperatorDirectory::new(wire.operators),
            Duration::from_secs(
                wire.request_timeout_secs
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
        )
    }

    /// Read and parse the configuration file at `path`.
    pub fn load(path: &Path) -> IntakeResult<Self> {
        let text = std::fs::read_to_string(path).map_err(IntakeError::ConfigRead)?;
        let config = Self::parse(&text)?;
        tracing::debug!(
            path = %path.display(),
            operators = config.operators.len(),
            "loaded intake config"
        );
        Ok(config)
    }

    pub fn spreadsheet_id(&self) -> &str {
        self.spreadsheet_id.as_str()
    }

    pub fn worksheet(&self) -> &str {
        self.worksheet.as_str()
    }

    pub fn operators(&self) -> &OperatorDirectory {
        &self.operators
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct IntakeConfigWire {
    spreadsheet_id: NonEmptyText,
    #[serde(default)]
    worksheet: Option<NonEmptyText>,
    #[serde(default)]
    operators: BTreeMap<String, NonEmptyText>,
    #[serde(default)]
    request_timeout_secs: Option<u64>,
}

/// Resolve the config file path from an optional override (flag or `INTAKE_CONFIG`).
pub fn resolve_config_path(override_path: Option<PathBuf>) -> PathBuf {
    override_path
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME))
}

/// Pick the local account name from the values of `USER` and `USERNAME`.
///
/// `USER` wins when both are set; empty values are ignored.
pub fn operator_username_from_env_values(
    user: Option<String>,
    username: Option<String>,
) -> Option<String> {
    [user, username]
        .into_iter()
        .flatten()
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}
