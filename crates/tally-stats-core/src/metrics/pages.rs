// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Page breakdowns. URLs are cleaned to origin and path before grouping, so
//! query strings and fragments never split a page into several rows.

use crate::aggregate::Aggregate;

use super::{rank_descending, KeyCount, PageCount, Tally};

/// Which events contribute to a page breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSelection {
	/// Every event with a URL
	EveryEvent,
	/// The last event of every session
	LastPerSession,
}

/// Counts cleaned URLs per account, flattened and sorted by count,
/// descending. Events without a URL are skipped.
#[must_use]
pub fn group_pages(aggregate: &Aggregate, selection: PageSelection) -> Vec<PageCount> {
	let indices: Vec<usize> = match selection {
		PageSelection::EveryEvent => (0..aggregate.len()).collect(),
		PageSelection::LastPerSession => aggregate.sessions().iter().map(|s| s.last).collect(),
	};

	let mut by_account: Tally<Tally<usize>> = Tally::default();
	for index in indices {
		let Some(href) = aggregate.hrefs()[index].as_ref() else {
			continue;
		};
		let account = aggregate.account_ids()[index].as_deref().unwrap_or_default();
		*by_account.entry(account).entry(&href.clean()) += 1;
	}

	let mut rows: Vec<PageCount> = by_account
		.into_entries()
		.into_iter()
		.flat_map(|(_, pages)| pages.into_rows())
		.collect();
	rank_descending(&mut rows, |row| row.count);
	rows
}

/// All pageviews grouped by page.
#[must_use]
pub fn pages(aggregate: &Aggregate) -> Vec<PageCount> {
	group_pages(aggregate, PageSelection::EveryEvent)
}

/// The page each session was last seen on.
#[must_use]
pub fn active_pages(aggregate: &Aggregate) -> Vec<PageCount> {
	group_pages(aggregate, PageSelection::LastPerSession)
}

/// The first page of every session, in order of first appearance.
#[must_use]
pub fn landing_pages(aggregate: &Aggregate) -> Vec<PageCount> {
	let mut counts: Tally<usize> = Tally::default();
	for span in aggregate.sessions() {
		if let Some(href) = aggregate.hrefs()[span.first].as_ref() {
			*counts.entry(&href.clean()) += 1;
		}
	}
	counts.into_rows()
}

/// The last page of every session with more than one event, sorted by
/// count, descending. Bounces have no exit page.
#[must_use]
pub fn exit_pages(aggregate: &Aggregate) -> Vec<PageCount> {
	let mut counts: Tally<usize> = Tally::default();
	for span in aggregate.sessions().iter().filter(|s| !s.is_bounce()) {
		if let Some(href) = aggregate.hrefs()[span.last].as_ref() {
			*counts.entry(&href.clean()) += 1;
		}
	}
	let mut rows = counts.into_rows();
	rank_descending(&mut rows, |row| row.count);
	rows
}
