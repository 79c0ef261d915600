// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Logging configuration section.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Pretty,
	#[default]
	Compact,
	Json,
}

impl FromStr for LogFormat {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"pretty" => Ok(Self::Pretty),
			"compact" => Ok(Self::Compact),
			"json" => Ok(Self::Json),
			other => Err(format!("unknown log format '{other}'")),
		}
	}
}

impl fmt::Display for LogFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Pretty => f.write_str("pretty"),
			Self::Compact => f.write_str("compact"),
			Self::Json => f.write_str("json"),
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfigLayer {
	pub level: Option<String>,
	pub format: Option<LogFormat>,
}

impl LoggingConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.level.is_some() {
			self.level = other.level;
		}
		if other.format.is_some() {
			self.format = other.format;
		}
	}

	pub fn finalize(self) -> LoggingConfig {
		LoggingConfig {
			level: self.level.unwrap_or_else(|| "info".to_string()),
			format: self.format.unwrap_or_default(),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
	/// Default filter directive when `RUST_LOG` is not set
	pub level: String,
	pub format: LogFormat,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::Compact,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_values() {
		let config = LoggingConfigLayer::default().finalize();
		assert_eq!(config, LoggingConfig::default());
		assert_eq!(config.level, "info");
		assert_eq!(config.format, LogFormat::Compact);
	}

	#[test]
	fn test_log_format_parse() {
		assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
		assert_eq!("pretty".parse::<LogFormat>(), Ok(LogFormat::Pretty));
		assert!("xml".parse::<LogFormat>().is_err());
	}

	#[test]
	fn test_merge_overwrites() {
		let mut base = LoggingConfigLayer {
			level: Some("info".to_string()),
			format: Some(LogFormat::Pretty),
		};
		base.merge(LoggingConfigLayer {
			level: Some("debug".to_string()),
			format: None,
		});
		assert_eq!(base.level.as_deref(), Some("debug"));
		assert_eq!(base.format, Some(LogFormat::Pretty));
	}

	#[test]
	fn test_deserialize_layer() {
		let layer: LoggingConfigLayer = toml::from_str("format = \"json\"").unwrap();
		assert_eq!(layer.format, Some(LogFormat::Json));
		assert!(layer.level.is_none());
	}
}
