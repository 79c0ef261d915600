// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration error types.

use std::path::PathBuf;

use tally_stats_core::BucketError;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// Config file exists but could not be read
	#[error("failed to read config file {path}: {source}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// TOML parsing error
	#[error("TOML parse error in {path}: {source}")]
	TomlParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	/// Environment variable with an unusable value
	#[error("invalid value for {key}: {message}")]
	InvalidValue { key: String, message: String },

	/// Configured referrer bucket that cannot be used
	#[error("invalid referrer bucket: {0}")]
	Bucket(#[from] BucketError),

	/// Validation error
	#[error("validation error: {0}")]
	Validation(String),
}

impl ConfigError {
	pub fn validation(msg: impl Into<String>) -> Self {
		Self::Validation(msg.into())
	}
}
