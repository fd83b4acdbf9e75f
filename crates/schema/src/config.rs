//! Catalog configuration defaults & deserializer.
//!
//! - All config fields that *can* have a default *should* have a default
//! - All config fields should be listed and documented in `default-config.toml`

use dai_util::logging::{LoggingConfig, LoggingPreset};
use serde::Deserialize;
use serde_json::json;
use std::{fs::File, io::Write, path::Path};
use thiserror::Error;

use crate::shape::Record;

/// An error we encounter while loading a [`CatalogConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("could not read config file")]
	Io(#[from] std::io::Error),

	#[error("could not parse config file")]
	Parse(#[from] toml::de::Error),
}

/// Catalog configuration
#[derive(Deserialize, Debug, Clone)]
pub struct CatalogConfig {
	#[serde(default)]
	pub catalog: CatalogOptions,

	/// Default global properties.
	/// Every new pipeline starts from these.
	#[serde(default = "CatalogConfig::default_global_defaults")]
	pub global_defaults: Record,

	#[serde(default)]
	pub logging: LoggingOptions,
}

impl Default for CatalogConfig {
	fn default() -> Self {
		Self {
			catalog: CatalogOptions::default(),
			global_defaults: Self::default_global_defaults(),
			logging: LoggingOptions::default(),
		}
	}
}

impl CatalogConfig {
	const DEFAULT_CONFIG: &'static str = include_str!("./default-config.toml");

	fn default_global_defaults() -> Record {
		let mut r = Record::new();
		r.insert("leonOsFrequencyKhz".into(), json!(600_000));
		r.insert("leonRtFrequencyKhz".into(), json!(600_000));
		r
	}

	/// Write the default config to the given path, overwriting if it already exists.
	pub fn create_default_config(path: &Path) -> Result<(), std::io::Error> {
		let mut file = File::create(path)?;
		file.write_all(Self::DEFAULT_CONFIG.as_bytes())?;
		return Ok(());
	}

	/// Load a config from a file
	pub fn load_from_file(config_path: &Path) -> Result<Self, ConfigError> {
		let config_string = std::fs::read_to_string(config_path)?;
		return Self::from_toml_str(&config_string);
	}

	/// Parse a config from a toml string
	pub fn from_toml_str(config: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(config)?;
		return Ok(config);
	}

	/// The log filter config for this catalog
	pub fn logging_config(&self) -> LoggingConfig {
		self.logging.preset.get_config()
	}
}

/// Catalog loading settings
#[derive(Deserialize, Debug, Clone, Default)]
pub struct CatalogOptions {
	/// If true, a port that references a datatype missing from the
	/// hierarchy is a load error. If false, that datatype is dropped
	/// from the port and a warning is logged.
	#[serde(default)]
	pub strict_datatypes: bool,
}

/// Logging settings
#[derive(Deserialize, Debug, Clone, Default)]
pub struct LoggingOptions {
	#[serde(default)]
	pub preset: LoggingPreset,
}
