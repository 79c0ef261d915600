// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Subcommand handlers. Each handler returns the JSON document to print.

use std::path::PathBuf;

use anyhow::{ensure, Context};
use chrono::{DateTime, Utc};
use clap::Args;
use serde_json::{json, Value};
use tally_config::{TallyConfig, MAX_NUM_DAYS};
use tally_stats::{chunk_by_days, default_stats, stats, summary, Pending, ReportQuery};
use tally_stats_core::buckets;
use tracing::{info, instrument};

use crate::input::read_events;

/// Upper bound for `--chunks`.
const MAX_CHUNKS: u32 = 520;

#[derive(Debug, Clone, Args)]
pub struct EventsArgs {
	/// Event export, as a JSON array or one JSON event per line
	#[arg(long)]
	pub events: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct ReportArgs {
	#[command(flatten)]
	pub input: EventsArgs,

	/// Number of days covered by the report (defaults to report.num_days)
	#[arg(long)]
	pub days: Option<u32>,

	/// End of the report window, RFC 3339 (defaults to now)
	#[arg(long)]
	pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Args)]
pub struct RetentionArgs {
	#[command(flatten)]
	pub input: EventsArgs,

	/// Length of a single chunk in days
	#[arg(long, default_value_t = 7)]
	pub chunk_days: u32,

	/// Number of consecutive chunks
	#[arg(long, default_value_t = 4)]
	pub chunks: u32,

	/// End of the last chunk, RFC 3339 (defaults to now)
	#[arg(long)]
	pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Args)]
pub struct ReturningArgs {
	/// Events of the time range in question
	#[arg(long)]
	pub range: PathBuf,

	/// All known events, including the range
	#[arg(long)]
	pub events: PathBuf,
}

fn to_json(value: &impl serde::Serialize) -> anyhow::Result<Value> {
	serde_json::to_value(value).context("failed to serialize result")
}

#[instrument(skip_all, fields(events = %args.input.events.display()))]
pub async fn report(args: ReportArgs, config: &TallyConfig) -> anyhow::Result<Value> {
	let num_days = args.days.unwrap_or(config.report.num_days);
	ensure!(
		(1..=MAX_NUM_DAYS).contains(&num_days),
		"--days must be between 1 and {MAX_NUM_DAYS}"
	);
	let query = ReportQuery::new(args.now.unwrap_or_else(Utc::now), num_days);

	let events = Pending::deferred(read_events(args.input.events));
	let stats = default_stats(events, query)
		.await
		.context("failed to compute default stats")?;
	info!(
		unique_users = stats.unique_users,
		unique_sessions = stats.unique_sessions,
		"report ready"
	);
	to_json(&stats)
}

#[instrument(skip_all, fields(events = %args.events.display()))]
pub async fn summarize(args: EventsArgs) -> anyhow::Result<Value> {
	let events = Pending::deferred(read_events(args.events));
	let summary = summary(events).await.context("failed to compute summary")?;
	to_json(&summary)
}

#[instrument(skip_all, fields(events = %args.input.events.display()))]
pub async fn retention(args: RetentionArgs) -> anyhow::Result<Value> {
	ensure!(args.chunk_days > 0, "--chunk-days must be at least 1");
	ensure!(
		(1..=MAX_CHUNKS).contains(&args.chunks),
		"--chunks must be between 1 and {MAX_CHUNKS}"
	);
	let events = read_events(args.input.events)
		.await
		.context("failed to load events")?;
	let end = args.now.unwrap_or_else(Utc::now);
	let chunks = chunk_by_days(&events, end, args.chunk_days, args.chunks)
		.into_iter()
		.map(Pending::ready)
		.collect();
	let matrix = stats::retention(chunks)
		.await
		.context("failed to compute retention")?;
	to_json(&matrix)
}

#[instrument(skip_all)]
pub async fn returning(args: ReturningArgs) -> anyhow::Result<Value> {
	let range = Pending::deferred(read_events(args.range));
	let all = Pending::deferred(read_events(args.events));
	let share = stats::returning_users(range, all)
		.await
		.context("failed to compute returning users")?;
	Ok(json!({ "returningUsers": share }))
}

pub fn bucket(host: &str) -> Value {
	json!({ "host": host, "bucket": buckets::place_in_bucket(host) })
}
