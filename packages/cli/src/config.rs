//! Config file loading and `--param` overrides.

use std::path::Path;

use serde::Deserialize;
use species_map_atlas::{AtlasConfig, AtlasError};
use species_map_params::{Reporter, set_param};
use species_map_params_models::RawMapParams;
use thiserror::Error;

/// Errors from the command-line front end.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Atlas(#[from] AtlasError),

    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A `--param` that is not `key=value`.
    #[error("Expected key=value, got '{0}'")]
    InvalidParam(String),

    /// A `[params]` entry holding an array, table or datetime.
    #[error("Parameter '{0}' must be a string, number or boolean")]
    InvalidParamValue(String),

    #[error("Invalid bounding box '{0}': expected south,west,north,east")]
    InvalidBbox(String),

    #[error("Give either --tvk or both --lat and --lon")]
    MissingTarget,
}

/// Contents of the `--config` file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliConfig {
    pub params: RawMapParams,
    pub atlas: AtlasConfig,
}

/// The file as written. `[params]` stays a plain table until each key
/// has been checked.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    params: toml::Table,
    atlas: AtlasConfig,
}

/// Text form of a scalar `[params]` value. Booleans become `1`/`0`.
fn scalar_text(key: &str, value: &toml::Value) -> Result<String, CliError> {
    match value {
        toml::Value::String(text) => Ok(text.clone()),
        toml::Value::Integer(number) => Ok(number.to_string()),
        toml::Value::Float(number) => Ok(number.to_string()),
        toml::Value::Boolean(flag) => Ok(String::from(if *flag { "1" } else { "0" })),
        toml::Value::Datetime(_) | toml::Value::Array(_) | toml::Value::Table(_) => {
            Err(CliError::InvalidParamValue(key.to_string()))
        }
    }
}

impl CliConfig {
    /// Reads `path`, or returns the defaults when there is none.
    ///
    /// # Errors
    ///
    /// Returns [`CliError`] if the file cannot be read or is not valid TOML.
    pub fn load(path: Option<&Path>, reporter: &dyn Reporter) -> Result<Self, CliError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        log::debug!("Loading config from {}", path.display());
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source, reporter)
    }

    /// Parses a config document. Unknown `[params]` keys are reported and
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Toml`] if `source` is not a valid config, or
    /// [`CliError::InvalidParamValue`] for a non-scalar parameter.
    pub fn parse(source: &str, reporter: &dyn Reporter) -> Result<Self, CliError> {
        let file: ConfigFile = toml::from_str(source)?;
        let mut params = RawMapParams::default();
        for (key, value) in &file.params {
            set_param(&mut params, key, scalar_text(key, value)?, reporter);
        }
        Ok(Self {
            params,
            atlas: file.atlas,
        })
    }

    /// Applies `key=value` overrides on top of the `[params]` table.
    ///
    /// Unknown keys are reported and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::InvalidParam`] for an override without `=`.
    pub fn apply_overrides(
        &mut self,
        overrides: &[String],
        reporter: &dyn Reporter,
    ) -> Result<(), CliError> {
        for entry in overrides {
            let (key, value) = entry
                .split_once('=')
                .ok_or_else(|| CliError::InvalidParam(entry.clone()))?;
            set_param(&mut self.params, key.trim(), value, reporter);
        }
        Ok(())
    }
}
