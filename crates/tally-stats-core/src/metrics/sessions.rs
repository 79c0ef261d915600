// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session and device metrics over an [`Aggregate`].

use crate::aggregate::Aggregate;

/// Number of distinct non-null session ids.
#[must_use]
pub fn unique_sessions(aggregate: &Aggregate) -> usize {
	aggregate.sessions().len()
}

/// Share of sessions that consist of a single event.
///
/// Returns 0 when there are no sessions.
#[must_use]
pub fn bounce_rate(aggregate: &Aggregate) -> f64 {
	let sessions = aggregate.sessions();
	if sessions.is_empty() {
		return 0.0;
	}
	let bounces = sessions.iter().filter(|s| s.is_bounce()).count();
	bounces as f64 / sessions.len() as f64
}

/// Mean of all positive page load times, `None` when there are none.
#[must_use]
pub fn avg_pageload(aggregate: &Aggregate) -> Option<f64> {
	let (sum, count) = aggregate
		.pageloads()
		.iter()
		.flatten()
		.filter(|&&ms| ms > 0.0)
		.fold((0.0, 0usize), |(sum, count), ms| (sum + ms, count + 1));
	if count == 0 {
		return None;
	}
	Some(sum / count as f64)
}

/// Average number of events per session, `None` when there are no sessions.
#[must_use]
pub fn avg_page_depth(aggregate: &Aggregate) -> Option<f64> {
	let sessions = aggregate.sessions();
	if sessions.is_empty() {
		return None;
	}
	let events: usize = sessions.iter().map(|s| s.len).sum();
	Some(events as f64 / sessions.len() as f64)
}

/// Share of events flagged as mobile, `None` for an empty aggregate.
///
/// Events that carry no flag count as non-mobile.
#[must_use]
pub fn mobile_share(aggregate: &Aggregate) -> Option<f64> {
	let flags = aggregate.is_mobiles();
	if flags.is_empty() {
		return None;
	}
	let mobile = flags.iter().filter(|flag| **flag == Some(true)).count();
	Some(mobile as f64 / flags.len() as f64)
}
