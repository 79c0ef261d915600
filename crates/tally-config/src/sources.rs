// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, TOML files and environment
//! variables.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::TallyConfigLayer;
use crate::sections::{
	BucketRule, BucketsConfigLayer, LogFormat, LoggingConfigLayer, ReportConfigLayer,
};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<TallyConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<TallyConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(TallyConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file is not an error.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/tally/tally.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<TallyConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(TallyConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: TallyConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: TALLY_<SECTION>_<FIELD>, except for logging which uses
/// `TALLY_LOG_LEVEL` and `TALLY_LOG_FORMAT`.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<TallyConfigLayer, ConfigError> {
		debug!("loading environment variables");
		layer_from_env(&|name: &str| std::env::var(name).ok())
	}
}

type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn layer_from_env(lookup: Lookup<'_>) -> Result<TallyConfigLayer, ConfigError> {
	let env = Env(lookup);
	Ok(TallyConfigLayer {
		report: Some(ReportConfigLayer {
			num_days: env.parse("TALLY_REPORT_NUM_DAYS", "u32")?,
		}),
		buckets: Some(BucketsConfigLayer {
			builtin: env.bool("TALLY_BUCKETS_BUILTIN"),
			extra: env
				.var("TALLY_BUCKETS_EXTRA")
				.map(|v| parse_bucket_rules("TALLY_BUCKETS_EXTRA", &v))
				.transpose()?,
		}),
		logging: Some(LoggingConfigLayer {
			level: env.var("TALLY_LOG_LEVEL"),
			format: env
				.var("TALLY_LOG_FORMAT")
				.map(|v| {
					v.parse::<LogFormat>().map_err(|message| ConfigError::InvalidValue {
						key: "TALLY_LOG_FORMAT".to_string(),
						message,
					})
				})
				.transpose()?,
		}),
	})
}

struct Env<'a>(Lookup<'a>);

impl Env<'_> {
	fn var(&self, name: &str) -> Option<String> {
		(self.0)(name).filter(|s| !s.is_empty())
	}

	fn bool(&self, name: &str) -> Option<bool> {
		self.var(name)
			.map(|v| v.eq_ignore_ascii_case("true") || v == "1")
	}

	fn parse<T: std::str::FromStr>(
		&self,
		name: &str,
		kind: &str,
	) -> Result<Option<T>, ConfigError> {
		match self.var(name) {
			Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
				key: name.to_string(),
				message: format!("invalid {kind} value '{v}'"),
			}),
			None => Ok(None),
		}
	}
}

/// Parses `pattern=label` pairs separated by commas.
fn parse_bucket_rules(key: &str, value: &str) -> Result<Vec<BucketRule>, ConfigError> {
	value
		.split(',')
		.map(str::trim)
		.filter(|item| !item.is_empty())
		.map(|item| match item.split_once('=') {
			Some((pattern, label)) => Ok(BucketRule {
				pattern: pattern.trim().to_string(),
				label: label.trim().to_string(),
			}),
			None => Err(ConfigError::InvalidValue {
				key: key.to_string(),
				message: format!("expected 'pattern=label', got '{item}'"),
			}),
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn env_layer(vars: &[(&str, &str)]) -> Result<TallyConfigLayer, ConfigError> {
		let vars: HashMap<String, String> = vars
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		layer_from_env(&move |name: &str| vars.get(name).cloned())
	}

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Environment > Precedence::ConfigFile);
		assert!(Precedence::ConfigFile > Precedence::Defaults);
	}

	#[test]
	fn test_defaults_source_returns_empty_layer() {
		let layer = DefaultsSource.load().unwrap();
		assert!(layer.report.is_none());
		assert!(layer.buckets.is_none());
		assert!(layer.logging.is_none());
	}

	#[test]
	fn test_toml_source_missing_file_returns_empty() {
		let source = TomlSource::new("/nonexistent/tally.toml");
		let layer = source.load().unwrap();
		assert!(layer.report.is_none());
	}

	#[test]
	fn test_toml_source_reports_parse_errors() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("tally.toml");
		std::fs::write(&path, "[report\nnum_days = 3").unwrap();
		let err = TomlSource::new(&path).load().unwrap_err();
		assert!(matches!(err, ConfigError::TomlParse { .. }));
	}

	#[test]
	fn test_env_values() {
		let layer = env_layer(&[
			("TALLY_REPORT_NUM_DAYS", "30"),
			("TALLY_BUCKETS_BUILTIN", "0"),
			("TALLY_BUCKETS_EXTRA", "t.co=Twitter, *.example.org = Example"),
			("TALLY_LOG_LEVEL", "debug"),
			("TALLY_LOG_FORMAT", "json"),
		])
		.unwrap();

		assert_eq!(layer.report.unwrap().num_days, Some(30));
		let buckets = layer.buckets.unwrap();
		assert_eq!(buckets.builtin, Some(false));
		assert_eq!(
			buckets.extra.unwrap(),
			vec![
				BucketRule {
					pattern: "t.co".to_string(),
					label: "Twitter".to_string(),
				},
				BucketRule {
					pattern: "*.example.org".to_string(),
					label: "Example".to_string(),
				},
			]
		);
		let logging = layer.logging.unwrap();
		assert_eq!(logging.level.as_deref(), Some("debug"));
		assert_eq!(logging.format, Some(LogFormat::Json));
	}

	#[test]
	fn test_env_empty_values_are_unset() {
		let layer = env_layer(&[("TALLY_REPORT_NUM_DAYS", ""), ("TALLY_LOG_LEVEL", "")]).unwrap();
		assert_eq!(layer.report.unwrap().num_days, None);
		assert_eq!(layer.logging.unwrap().level, None);
	}

	#[test]
	fn test_env_invalid_values() {
		let err = env_layer(&[("TALLY_REPORT_NUM_DAYS", "seven")]).unwrap_err();
		assert!(err.to_string().contains("TALLY_REPORT_NUM_DAYS"));

		let err = env_layer(&[("TALLY_LOG_FORMAT", "xml")]).unwrap_err();
		assert!(matches!(err, ConfigError::InvalidValue { .. }));

		let err = env_layer(&[("TALLY_BUCKETS_EXTRA", "t.co")]).unwrap_err();
		assert!(err.to_string().contains("pattern=label"));
	}
}
