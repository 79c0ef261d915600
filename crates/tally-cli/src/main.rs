// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tally command line: computes statistics over an event export and prints
//! them as JSON.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tally_config::{load_config, load_config_with_file, LogFormat};
use tally_stats_core::buckets;

mod commands;
mod input;
mod logging;

use commands::{EventsArgs, ReportArgs, RetentionArgs, ReturningArgs};

/// Tally - privacy-preserving web analytics statistics.
#[derive(Parser, Debug)]
#[command(name = "tally", about = "Web analytics statistics over event exports", version)]
struct Args {
	/// Config file (defaults to /etc/tally/tally.toml)
	#[arg(long, global = true, env = "TALLY_CONFIG")]
	config: Option<PathBuf>,

	/// Log filter directive, overrides logging.level
	#[arg(long, global = true)]
	log_level: Option<String>,

	/// Emit logs as JSON
	#[arg(long, global = true)]
	json_logs: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Default dashboard report over the last days
	Report(ReportArgs),
	/// Every single-input metric over all events
	Summary(EventsArgs),
	/// Retention matrix over consecutive chunks of days
	Retention(RetentionArgs),
	/// Share of users in a range that were seen before
	Returning(ReturningArgs),
	/// Show the bucket a referrer host is placed in
	Bucket {
		/// Referrer host, e.g. www.google.com
		host: String,
	},
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	let mut config = match &args.config {
		Some(path) => load_config_with_file(path),
		None => load_config(),
	}
	.context("failed to load configuration")?;

	if let Some(level) = args.log_level {
		config.logging.level = level;
	}
	if args.json_logs {
		config.logging.format = LogFormat::Json;
	}
	logging::init_tracing(&config.logging);

	let table = config
		.buckets
		.table()
		.context("invalid referrer bucket configuration")?;
	buckets::install(table).context("failed to install referrer buckets")?;

	let output = match args.command {
		Command::Report(report) => commands::report(report, &config).await?,
		Command::Summary(events) => commands::summarize(events).await?,
		Command::Retention(retention) => commands::retention(retention).await?,
		Command::Returning(returning) => commands::returning(returning).await?,
		Command::Bucket { host } => commands::bucket(&host),
	};

	let mut stdout = std::io::stdout().lock();
	serde_json::to_writer_pretty(&mut stdout, &output).context("failed to write output")?;
	writeln!(stdout).context("failed to write output")?;
	Ok(())
}
