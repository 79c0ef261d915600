// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Every metric has a defined result for empty input.

use tally_stats_core::{metrics, Aggregate, BucketTable, Event};

#[test]
fn test_event_metrics_on_empty_input() {
	let events: Vec<Event> = Vec::new();

	assert_eq!(metrics::loss(&events), 0.0);
	assert_eq!(metrics::pageviews(&events), 0);
	assert_eq!(metrics::visitors(&events), 0);
	assert_eq!(metrics::accounts(&events), 0);
	assert_eq!(metrics::returning_users(&events, &events), 0.0);
	assert!(metrics::retention::<Vec<Event>>(&[]).is_empty());
}

#[test]
fn test_aggregate_metrics_on_empty_input() {
	let aggregate = Aggregate::build(&[]);

	assert!(aggregate.is_empty());
	assert_eq!(metrics::unique_sessions(&aggregate), 0);
	assert_eq!(metrics::bounce_rate(&aggregate), 0.0);
	assert_eq!(metrics::avg_pageload(&aggregate), None);
	assert_eq!(metrics::avg_page_depth(&aggregate), None);
	assert_eq!(metrics::mobile_share(&aggregate), None);
	assert!(metrics::referrers_with(&aggregate, &BucketTable::builtin()).is_empty());
	assert!(metrics::campaigns(&aggregate).is_empty());
	assert!(metrics::sources(&aggregate).is_empty());
	assert!(metrics::pages(&aggregate).is_empty());
	assert!(metrics::active_pages(&aggregate).is_empty());
	assert!(metrics::landing_pages(&aggregate).is_empty());
	assert!(metrics::exit_pages(&aggregate).is_empty());
}

#[test]
fn test_events_without_payload() {
	let events = vec![Event::new(), Event::new().with_secret_id("user-a")];
	let aggregate = Aggregate::build(&events);

	assert_eq!(aggregate.len(), 2);
	assert_eq!(metrics::unique_sessions(&aggregate), 0);
	assert_eq!(metrics::bounce_rate(&aggregate), 0.0);
	assert!(metrics::pages(&aggregate).is_empty());
	assert_eq!(metrics::loss(&events), 0.5);
}
