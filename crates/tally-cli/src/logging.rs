// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use tally_config::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber. Logs go to stderr; stdout carries the
/// command output.
pub fn init_tracing(config: &LoggingConfig) {
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
	let registry = tracing_subscriber::registry().with(filter);

	match config.format {
		LogFormat::Json => registry
			.with(fmt::layer().json().with_writer(std::io::stderr))
			.init(),
		LogFormat::Pretty => registry
			.with(fmt::layer().pretty().with_writer(std::io::stderr))
			.init(),
		LogFormat::Compact => registry
			.with(fmt::layer().compact().with_writer(std::io::stderr))
			.init(),
	}
}
