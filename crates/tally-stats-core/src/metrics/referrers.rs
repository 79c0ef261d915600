// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Referrer, campaign and source breakdowns.
//!
//! All three group sessions by a value taken from the session's referrer.
//! Per session, the referrer and href are read at the first index carrying
//! the session id. Sessions without a referrer, and sessions whose referrer
//! host equals the href host (navigation within the same site), are skipped.

use crate::aggregate::Aggregate;
use crate::buckets::{self, BucketTable};
use crate::page_url::PageUrl;

use super::{rank_descending, KeyCount, ReferrerCount, Tally};

/// Which value of a referrer sessions are grouped by.
#[derive(Debug, Clone, Copy)]
pub enum ReferrerKey<'a> {
	/// Referrer host placed into its bucket
	Host(&'a BucketTable),
	/// The `utm_campaign` query parameter
	Campaign,
	/// The `utm_source` query parameter
	Source,
}

impl ReferrerKey<'_> {
	fn extract(&self, referrer: &PageUrl) -> Option<String> {
		let value = match self {
			ReferrerKey::Host(table) => {
				let host = referrer.host();
				let raw = if host.is_empty() {
					referrer.href()
				} else {
					host.as_str()
				};
				Some(table.classify(raw).to_string())
			}
			ReferrerKey::Campaign => referrer.query_param("utm_campaign"),
			ReferrerKey::Source => referrer.query_param("utm_source"),
		};
		value.filter(|v| !v.is_empty())
	}
}

/// Groups sessions by `key`, emitting `(sessions, mean events per session)`
/// per group, sorted by number of sessions, descending.
#[must_use]
pub fn group_referrers(aggregate: &Aggregate, key: ReferrerKey<'_>) -> Vec<ReferrerCount> {
	// (sessions, events) per group
	let mut groups: Tally<(usize, usize)> = Tally::default();

	for span in aggregate.sessions() {
		let Some(referrer) = aggregate.referrers()[span.first].as_ref() else {
			continue;
		};
		let href_host = aggregate.hrefs()[span.first].as_ref().map(PageUrl::host);
		if href_host.as_deref() == Some(referrer.host().as_str()) {
			continue;
		}
		let Some(value) = key.extract(referrer) else {
			continue;
		};
		let group = groups.entry(&value);
		group.0 += 1;
		group.1 += span.len;
	}

	let mut rows: Vec<ReferrerCount> = groups
		.into_entries()
		.into_iter()
		.map(|(key, (sessions, events))| KeyCount {
			key,
			count: (sessions, events as f64 / sessions as f64),
		})
		.collect();
	rank_descending(&mut rows, |row| row.count.0);
	rows
}

/// Sessions grouped by referrer host, using the process-wide bucket table.
#[must_use]
pub fn referrers(aggregate: &Aggregate) -> Vec<ReferrerCount> {
	referrers_with(aggregate, buckets::active())
}

/// Sessions grouped by referrer host, using an explicit bucket table.
#[must_use]
pub fn referrers_with(aggregate: &Aggregate, table: &BucketTable) -> Vec<ReferrerCount> {
	group_referrers(aggregate, ReferrerKey::Host(table))
}

/// Sessions grouped by the referrer's `utm_campaign`.
#[must_use]
pub fn campaigns(aggregate: &Aggregate) -> Vec<ReferrerCount> {
	group_referrers(aggregate, ReferrerKey::Campaign)
}

/// Sessions grouped by the referrer's `utm_source`.
#[must_use]
pub fn sources(aggregate: &Aggregate) -> Vec<ReferrerCount> {
	group_referrers(aggregate, ReferrerKey::Source)
}
