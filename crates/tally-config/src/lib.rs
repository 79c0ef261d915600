// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration management for Tally.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`TALLY_*`)
//!
//! # Usage
//!
//! ```ignore
//! use tally_config::load_config;
//!
//! let config = load_config()?;
//! println!("reporting over {} days", config.report.num_days);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::TallyConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use std::path::PathBuf;

use tracing::{debug, info};

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TallyConfig {
	pub report: ReportConfig,
	pub buckets: BucketsConfig,
	pub logging: LoggingConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`TALLY_*`)
/// 2. Config file (`/etc/tally/tally.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<TallyConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(config_path: impl Into<PathBuf>) -> Result<TallyConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

/// Merge `sources` in order of precedence and finalize the result.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<TallyConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = TallyConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: TallyConfigLayer) -> Result<TallyConfig, ConfigError> {
	let report = layer.report.unwrap_or_default().finalize();
	let buckets = layer.buckets.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	let config = TallyConfig {
		report,
		buckets,
		logging,
	};
	validate_config(&config)?;

	info!(
		num_days = config.report.num_days,
		builtin_buckets = config.buckets.builtin,
		extra_buckets = config.buckets.extra.len(),
		log_level = %config.logging.level,
		log_format = %config.logging.format,
		"configuration loaded"
	);

	Ok(config)
}

/// Validate cross-field configuration rules.
fn validate_config(config: &TallyConfig) -> Result<(), ConfigError> {
	if config.report.num_days == 0 {
		return Err(ConfigError::validation(
			"report.num_days must be at least 1",
		));
	}
	if config.report.num_days > MAX_NUM_DAYS {
		return Err(ConfigError::validation(format!(
			"report.num_days must be at most {MAX_NUM_DAYS}"
		)));
	}
	config.buckets.entries()?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Fixed(TallyConfigLayer, Precedence);

	impl ConfigSource for Fixed {
		fn name(&self) -> &'static str {
			"fixed"
		}

		fn precedence(&self) -> Precedence {
			self.1
		}

		fn load(&self) -> Result<TallyConfigLayer, ConfigError> {
			Ok(self.0.clone())
		}
	}

	fn days(num_days: u32) -> TallyConfigLayer {
		TallyConfigLayer {
			report: Some(ReportConfigLayer {
				num_days: Some(num_days),
			}),
			..Default::default()
		}
	}

	#[test]
	fn test_defaults() {
		let config = load_from_sources(vec![Box::new(DefaultsSource)]).unwrap();
		assert_eq!(config, TallyConfig::default());
		assert_eq!(config.report.num_days, 7);
	}

	#[test]
	fn test_higher_precedence_wins_regardless_of_order() {
		let config = load_from_sources(vec![
			Box::new(Fixed(days(30), Precedence::Environment)),
			Box::new(Fixed(days(14), Precedence::ConfigFile)),
		])
		.unwrap();
		assert_eq!(config.report.num_days, 30);
	}

	#[test]
	fn test_zero_days_rejected() {
		let err = load_from_sources(vec![Box::new(Fixed(days(0), Precedence::ConfigFile))])
			.unwrap_err();
		assert!(err.to_string().contains("num_days"));
	}

	#[test]
	fn test_num_days_upper_bound() {
		let config =
			load_from_sources(vec![Box::new(Fixed(days(MAX_NUM_DAYS), Precedence::ConfigFile))])
				.unwrap();
		assert_eq!(config.report.num_days, MAX_NUM_DAYS);

		let err = load_from_sources(vec![Box::new(Fixed(days(u32::MAX), Precedence::ConfigFile))])
			.unwrap_err();
		assert!(matches!(err, ConfigError::Validation(_)));
		assert!(err.to_string().contains("at most"));
	}

	#[test]
	fn test_invalid_bucket_rejected() {
		let layer = TallyConfigLayer {
			buckets: Some(BucketsConfigLayer {
				builtin: None,
				extra: Some(vec![BucketRule {
					pattern: "bad pattern".to_string(),
					label: "Bad".to_string(),
				}]),
			}),
			..Default::default()
		};
		let err = load_from_sources(vec![Box::new(Fixed(layer, Precedence::ConfigFile))])
			.unwrap_err();
		assert!(matches!(err, ConfigError::Bucket(_)));
	}
}
