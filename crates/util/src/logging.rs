//! Logging presets, turned into `tracing` filters

use serde::Deserialize;
use std::fmt::Display;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum LogLevel {
	Trace,
	Debug,
	#[default]
	Info,
	Warn,
	Error,
}

impl Display for LogLevel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Trace => write!(f, "trace"),
			Self::Debug => write!(f, "debug"),
			Self::Info => write!(f, "info"),
			Self::Warn => write!(f, "warn"),
			Self::Error => write!(f, "error"),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum LoggingPreset {
	#[default]
	Default,
	Verbose,
	Develop,
	Trace,
}

impl LoggingPreset {
	pub fn get_config(&self) -> LoggingConfig {
		match self {
			Self::Default => LoggingConfig {
				other: LogLevel::Warn,
				schema: LogLevel::Info,
				pipeline: LogLevel::Info,
			},

			Self::Verbose => LoggingConfig {
				other: LogLevel::Warn,
				schema: LogLevel::Debug,
				pipeline: LogLevel::Debug,
			},

			Self::Develop => LoggingConfig {
				other: LogLevel::Debug,
				schema: LogLevel::Trace,
				pipeline: LogLevel::Trace,
			},

			Self::Trace => LoggingConfig {
				other: LogLevel::Trace,
				schema: LogLevel::Trace,
				pipeline: LogLevel::Trace,
			},
		}
	}
}

/// Per-target log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggingConfig {
	/// Everything that isn't ours
	pub other: LogLevel,

	/// Catalog loading (`dai_schema`)
	pub schema: LogLevel,

	/// Pipeline building (`dai_pipeline`)
	pub pipeline: LogLevel,
}

impl LoggingConfig {
	/// The filter directives for this config, in `RUST_LOG` syntax
	pub fn to_directives(&self) -> String {
		[
			format!("dai_schema={}", self.schema),
			format!("dai_pipeline={}", self.pipeline),
			self.other.to_string(),
		]
		.join(",")
	}
}

impl From<LoggingConfig> for EnvFilter {
	fn from(value: LoggingConfig) -> Self {
		EnvFilter::new(value.to_directives())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_preset_directives() {
		assert_eq!(
			LoggingPreset::Default.get_config().to_directives(),
			"dai_schema=info,dai_pipeline=info,warn"
		);
	}

	#[test]
	fn presets_build_filters() {
		for preset in [
			LoggingPreset::Default,
			LoggingPreset::Verbose,
			LoggingPreset::Develop,
			LoggingPreset::Trace,
		] {
			let filter: EnvFilter = preset.get_config().into();
			assert!(filter.to_string().contains("dai_pipeline"));
		}
	}
}
