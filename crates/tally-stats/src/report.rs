// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Report assembly on top of the wrapped metrics.

use chrono::{DateTime, Days, NaiveDate, Utc};
use futures::future::try_join_all;
use futures::try_join;
use serde::{Deserialize, Serialize};
use tally_stats_core::{Aggregate, Event, PageCount, ReferrerCount};
use tracing::{debug, instrument};

use crate::error::Result;
use crate::pending::Pending;
use crate::stats::{self, Events};

pub const DEFAULT_NUM_DAYS: u32 = 7;

/// The time window of a report: `num_days` UTC days ending with the day of
/// `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportQuery {
	pub now: DateTime<Utc>,
	pub num_days: u32,
}

impl ReportQuery {
	pub fn new(now: DateTime<Utc>, num_days: u32) -> Self {
		Self { now, num_days }
	}

	/// The days covered by the window, oldest first.
	#[must_use]
	pub fn days(&self) -> Vec<NaiveDate> {
		let end = self.now.date_naive();
		(0..self.num_days)
			.rev()
			.filter_map(|offset| end.checked_sub_days(Days::new(u64::from(offset))))
			.collect()
	}
}

impl Default for ReportQuery {
	fn default() -> Self {
		Self::new(Utc::now(), DEFAULT_NUM_DAYS)
	}
}

/// Activity on a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStats {
	pub date: NaiveDate,
	pub accounts: usize,
	pub pageviews: usize,
	pub visitors: usize,
}

/// The default dashboard report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultStats {
	pub unique_users: usize,
	pub unique_accounts: usize,
	pub unique_sessions: usize,
	pub referrers: Vec<ReferrerCount>,
	pub pages: Vec<PageCount>,
	/// One entry per day of the window, oldest first
	pub pageviews: Vec<DayStats>,
	pub bounce_rate: f64,
}

/// Splits `events` into the days of `days` (sorted ascending). Returns the
/// events inside the window and one bucket per day.
fn split_by_day(events: &[Event], days: &[NaiveDate]) -> (Events, Vec<Events>) {
	let mut window = Vec::new();
	let mut per_day = vec![Vec::new(); days.len()];
	for event in events {
		let Some(day) = event.day() else {
			continue;
		};
		if let Ok(index) = days.binary_search(&day) {
			window.push(event.clone());
			per_day[index].push(event.clone());
		}
	}
	(window, per_day)
}

async fn day_stats(date: NaiveDate, events: Events) -> Result<DayStats> {
	let events = Pending::ready(events);
	let (accounts, pageviews, visitors) = try_join!(
		stats::accounts(events.clone()),
		stats::pageviews(events.clone()),
		stats::visitors(events),
	)?;
	Ok(DayStats {
		date,
		accounts,
		pageviews,
		visitors,
	})
}

/// Computes the default report for the window described by `query`.
///
/// Events are placed by their payload timestamp. Events without a valid
/// timestamp or outside the window are ignored.
#[instrument(skip_all, fields(num_days = query.num_days))]
pub async fn default_stats(
	events: impl Into<Pending<Events>>,
	query: ReportQuery,
) -> Result<DefaultStats> {
	let events = events.into().resolve().await?;
	let days = query.days();
	let (window, per_day) = split_by_day(&events, &days);
	debug!(
		events = events.len(),
		in_window = window.len(),
		"assembling default stats"
	);

	let window = Pending::ready(window);
	let aggregate = window.clone().map(|events| Aggregate::build(events));
	let daily = days
		.iter()
		.zip(per_day)
		.map(|(date, events)| day_stats(*date, events));

	let (
		unique_users,
		unique_accounts,
		unique_sessions,
		referrers,
		pages,
		pageviews,
		bounce_rate,
	) = try_join!(
		stats::visitors(window.clone()),
		stats::accounts(window),
		stats::unique_sessions(aggregate.clone()),
		stats::referrers(aggregate.clone()),
		stats::pages(aggregate.clone()),
		try_join_all(daily),
		stats::bounce_rate(aggregate),
	)?;

	Ok(DefaultStats {
		unique_users,
		unique_accounts,
		unique_sessions,
		referrers,
		pages,
		pageviews,
		bounce_rate,
	})
}

/// Splits `events` into `chunks` consecutive chunks of `chunk_days` UTC days
/// each, the last chunk ending with the day of `end`. The oldest chunk comes
/// first. Events outside the covered days are dropped.
///
/// Returns no chunks at all when `chunk_days` is 0 or the covered days reach
/// past the representable date range.
#[must_use]
pub fn chunk_by_days(
	events: &[Event],
	end: DateTime<Utc>,
	chunk_days: u32,
	chunks: u32,
) -> Vec<Events> {
	if chunk_days == 0 || chunks == 0 {
		return Vec::new();
	}
	let span = u64::from(chunk_days) * u64::from(chunks);
	let Some(start) = end.date_naive().checked_sub_days(Days::new(span - 1)) else {
		return Vec::new();
	};
	let mut result = vec![Vec::new(); chunks as usize];

	for event in events {
		let Some(day) = event.day() else {
			continue;
		};
		let offset = (day - start).num_days();
		if offset < 0 || offset as u64 >= span {
			continue;
		}
		let index = offset as usize / chunk_days as usize;
		result[index].push(event.clone());
	}
	result
}

/// Every single-input metric over one set of events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
	pub loss: f64,
	pub pageviews: usize,
	pub visitors: usize,
	pub accounts: usize,
	pub unique_sessions: usize,
	pub bounce_rate: f64,
	pub avg_pageload: Option<f64>,
	pub avg_page_depth: Option<f64>,
	pub mobile_share: Option<f64>,
	pub referrers: Vec<ReferrerCount>,
	pub campaigns: Vec<ReferrerCount>,
	pub sources: Vec<ReferrerCount>,
	pub pages: Vec<PageCount>,
	pub active_pages: Vec<PageCount>,
	pub landing_pages: Vec<PageCount>,
	pub exit_pages: Vec<PageCount>,
}

/// Runs every single-input metric over `events` concurrently.
#[instrument(skip_all)]
pub async fn summary(events: impl Into<Pending<Events>>) -> Result<Summary> {
	let events = events.into();
	let aggregate = events.clone().map(|events| Aggregate::build(events));

	let (loss, pageviews, visitors, accounts) = try_join!(
		stats::loss(events.clone()),
		stats::pageviews(events.clone()),
		stats::visitors(events.clone()),
		stats::accounts(events),
	)?;
	let (unique_sessions, bounce_rate, avg_pageload, avg_page_depth, mobile_share) = try_join!(
		stats::unique_sessions(aggregate.clone()),
		stats::bounce_rate(aggregate.clone()),
		stats::avg_pageload(aggregate.clone()),
		stats::avg_page_depth(aggregate.clone()),
		stats::mobile_share(aggregate.clone()),
	)?;
	let (referrers, campaigns, sources, pages, active_pages, landing_pages, exit_pages) = try_join!(
		stats::referrers(aggregate.clone()),
		stats::campaigns(aggregate.clone()),
		stats::sources(aggregate.clone()),
		stats::pages(aggregate.clone()),
		stats::active_pages(aggregate.clone()),
		stats::landing_pages(aggregate.clone()),
		stats::exit_pages(aggregate),
	)?;

	Ok(Summary {
		loss,
		pageviews,
		visitors,
		accounts,
		unique_sessions,
		bounce_rate,
		avg_pageload,
		avg_page_depth,
		mobile_share,
		referrers,
		campaigns,
		sources,
		pages,
		active_pages,
		landing_pages,
		exit_pages,
	})
}
