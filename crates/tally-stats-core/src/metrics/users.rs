// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User and account counts over raw events.

use std::collections::HashSet;

use crate::event::Event;

/// Share of anonymous events, i.e. events without a user identifier.
///
/// Returns 0 for an empty set of events.
#[must_use]
pub fn loss(events: &[Event]) -> f64 {
	if events.is_empty() {
		return 0.0;
	}
	let identified = pageviews(events);
	1.0 - (identified as f64 / events.len() as f64)
}

/// Number of events that can be attributed to a user.
#[must_use]
pub fn pageviews(events: &[Event]) -> usize {
	events.iter().filter(|e| e.is_identified()).count()
}

/// Number of distinct users.
#[must_use]
pub fn visitors(events: &[Event]) -> usize {
	events
		.iter()
		.filter_map(Event::secret_id)
		.collect::<HashSet<_>>()
		.len()
}

/// Number of distinct accounts.
#[must_use]
pub fn accounts(events: &[Event]) -> usize {
	events
		.iter()
		.filter_map(Event::account_id)
		.collect::<HashSet<_>>()
		.len()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::event::Payload;

	fn user(id: &str) -> Event {
		Event::new().with_secret_id(id)
	}

	fn account(id: &str) -> Event {
		Event::new().with_account_id(id)
	}

	#[test]
	fn test_loss_counts_anonymous_share() {
		let events = vec![
			user("user-a"),
			user("user-b"),
			Event::new().with_payload(Payload::new().with_title("anonymous")),
			user("user-d"),
		];
		assert_eq!(loss(&events), 0.25);
	}

	#[test]
	fn test_loss_empty() {
		assert_eq!(loss(&[]), 0.0);
	}

	#[test]
	fn test_loss_anonymous_only() {
		assert_eq!(loss(&[Event::new(), Event::new()]), 1.0);
	}

	#[test]
	fn test_pageviews_counts_identified_events() {
		let events = vec![
			user("user-b"),
			user("user-a"),
			Event {
				secret_id: None,
				..Default::default()
			},
			user("user-b"),
			user("user-c"),
			Event::new(),
		];
		assert_eq!(pageviews(&events), 4);
		assert_eq!(pageviews(&[]), 0);
	}

	#[test]
	fn test_visitors_counts_distinct_users() {
		let events = vec![
			user("user-b"),
			user("user-a"),
			Event::new(),
			user("user-b"),
			user("user-c"),
			Event::new(),
		];
		assert_eq!(visitors(&events), 3);
		assert_eq!(visitors(&[]), 0);
	}

	#[test]
	fn test_accounts_counts_distinct_accounts() {
		let events = vec![
			account("account-b"),
			account("account-a"),
			Event::new(),
			account("account-b"),
			account("account-c"),
			Event::new(),
		];
		assert_eq!(accounts(&events), 3);
		assert_eq!(accounts(&[]), 0);
	}
}
