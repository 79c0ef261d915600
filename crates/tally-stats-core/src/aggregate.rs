// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Column-oriented view over a batch of events.
//!
//! An [`Aggregate`] holds one column per field of interest. All columns have
//! the same length as the input and index `i` in every column describes the
//! same source event. No sorting, filtering or deduplication happens here;
//! each metric decides on its own granularity (per event, per session or per
//! user).

use std::collections::HashMap;

use tracing::trace;

use crate::event::Event;
use crate::page_url::PageUrl;

/// Index-aligned columns derived from a sequence of events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
	account_ids: Vec<Option<String>>,
	secret_ids: Vec<Option<String>>,
	event_ids: Vec<Option<String>>,
	session_ids: Vec<Option<String>>,
	hrefs: Vec<Option<PageUrl>>,
	referrers: Vec<Option<PageUrl>>,
	pageloads: Vec<Option<f64>>,
	is_mobiles: Vec<Option<bool>>,
}

/// Where a single session appears within an [`Aggregate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSpan<'a> {
	pub id: &'a str,
	/// First index carrying this session id
	pub first: usize,
	/// Last index carrying this session id
	pub last: usize,
	/// Number of events in the session
	pub len: usize,
}

impl SessionSpan<'_> {
	/// A bounce is a session with exactly one event.
	#[must_use]
	pub fn is_bounce(&self) -> bool {
		self.len == 1
	}
}

impl Aggregate {
	/// Builds the columns for `events`, preserving input order.
	#[must_use]
	pub fn build(events: &[Event]) -> Self {
		let n = events.len();
		let mut aggregate = Self {
			account_ids: Vec::with_capacity(n),
			secret_ids: Vec::with_capacity(n),
			event_ids: Vec::with_capacity(n),
			session_ids: Vec::with_capacity(n),
			hrefs: Vec::with_capacity(n),
			referrers: Vec::with_capacity(n),
			pageloads: Vec::with_capacity(n),
			is_mobiles: Vec::with_capacity(n),
		};

		let mut dropped_urls = 0usize;
		for event in events {
			let href = event.href().and_then(PageUrl::parse);
			let referrer = event.referrer().and_then(PageUrl::parse);
			dropped_urls += usize::from(event.href().is_some() && href.is_none());
			dropped_urls += usize::from(event.referrer().is_some() && referrer.is_none());

			aggregate.account_ids.push(event.account_id().map(str::to_owned));
			aggregate.secret_ids.push(event.secret_id().map(str::to_owned));
			aggregate.event_ids.push(event.event_id().map(str::to_owned));
			aggregate.session_ids.push(event.session_id().map(str::to_owned));
			aggregate.hrefs.push(href);
			aggregate.referrers.push(referrer);
			aggregate.pageloads.push(event.pageload());
			aggregate.is_mobiles.push(event.is_mobile());
		}

		trace!(events = n, dropped_urls, "built aggregate");
		aggregate
	}

	/// Number of source events.
	#[must_use]
	pub fn len(&self) -> usize {
		self.session_ids.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.session_ids.is_empty()
	}

	#[must_use]
	pub fn account_ids(&self) -> &[Option<String>] {
		&self.account_ids
	}

	#[must_use]
	pub fn secret_ids(&self) -> &[Option<String>] {
		&self.secret_ids
	}

	#[must_use]
	pub fn event_ids(&self) -> &[Option<String>] {
		&self.event_ids
	}

	#[must_use]
	pub fn session_ids(&self) -> &[Option<String>] {
		&self.session_ids
	}

	#[must_use]
	pub fn hrefs(&self) -> &[Option<PageUrl>] {
		&self.hrefs
	}

	#[must_use]
	pub fn referrers(&self) -> &[Option<PageUrl>] {
		&self.referrers
	}

	#[must_use]
	pub fn pageloads(&self) -> &[Option<f64>] {
		&self.pageloads
	}

	#[must_use]
	pub fn is_mobiles(&self) -> &[Option<bool>] {
		&self.is_mobiles
	}

	/// Distinct non-null session ids in order of first appearance.
	///
	/// `first` is the first index found by a linear scan over the column,
	/// which is not necessarily the chronologically first event when the
	/// input is unordered.
	#[must_use]
	pub fn sessions(&self) -> Vec<SessionSpan<'_>> {
		let mut positions: HashMap<&str, usize> = HashMap::new();
		let mut spans: Vec<SessionSpan<'_>> = Vec::new();

		for (index, session_id) in self.session_ids.iter().enumerate() {
			let Some(id) = session_id.as_deref() else {
				continue;
			};
			match positions.get(id).copied() {
				Some(pos) => {
					let span = &mut spans[pos];
					span.last = index;
					span.len += 1;
				}
				None => {
					positions.insert(id, spans.len());
					spans.push(SessionSpan {
						id,
						first: index,
						last: index,
						len: 1,
					});
				}
			}
		}

		spans
	}
}

impl From<&[Event]> for Aggregate {
	fn from(events: &[Event]) -> Self {
		Self::build(events)
	}
}

/// Builds an [`Aggregate`] from `events`.
#[must_use]
pub fn build_aggregate(events: &[Event]) -> Aggregate {
	Aggregate::build(events)
}
