// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Returning users and retention matrices.

use std::collections::HashSet;

use crate::event::Event;

fn distinct_users(events: &[Event]) -> HashSet<&str> {
	events.iter().filter_map(Event::secret_id).collect()
}

/// Share of users in `range` that were already seen before it.
///
/// The range starts at its lowest event id; every user with an event in
/// `all_events` below that id counts as known. Returns 0 when the range has
/// no identified users.
#[must_use]
pub fn returning_users(range: &[Event], all_events: &[Event]) -> f64 {
	let in_range = distinct_users(range);
	if in_range.is_empty() {
		return 0.0;
	}

	let known: HashSet<&str> = match range.iter().filter_map(Event::event_id).min() {
		Some(oldest) => all_events
			.iter()
			.filter(|e| e.event_id().is_some_and(|id| id < oldest))
			.filter_map(Event::secret_id)
			.collect(),
		None => HashSet::new(),
	};

	let new_users = in_range.iter().filter(|id| !known.contains(*id)).count();
	1.0 - (new_users as f64 / in_range.len() as f64)
}

/// Retention matrix for consecutive chunks of events.
///
/// Row `i` describes the users of chunk `i`: the first cell is 1 if the
/// chunk has any identified user (else 0), cell `j` is the share of those
/// users seen again in chunk `i + j`. Nothing is assumed about how the chunks
/// are spread in time.
#[must_use]
pub fn retention<C: AsRef<[Event]>>(chunks: &[C]) -> Vec<Vec<f64>> {
	let users: Vec<HashSet<&str>> = chunks
		.iter()
		.map(|chunk| distinct_users(chunk.as_ref()))
		.collect();

	users
		.iter()
		.enumerate()
		.map(|(i, reference)| {
			let mut row = Vec::with_capacity(users.len() - i);
			row.push(if reference.is_empty() { 0.0 } else { 1.0 });
			for later in &users[i + 1..] {
				let share = if reference.is_empty() {
					0.0
				} else {
					later.intersection(reference).count() as f64 / reference.len() as f64
				};
				row.push(share);
			}
			row
		})
		.collect()
}
