// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Every metric of [`tally_stats_core::metrics`] in its asynchronous form.
//!
//! Each function takes its inputs as anything convertible into a
//! [`Pending`], resolves them and runs the synchronous metric on the values.
//! A failure to resolve an input is returned unchanged; the metric itself
//! never fails.

use tally_stats_core::{metrics, Aggregate, BucketTable, Event, PageCount, ReferrerCount};
use tracing::instrument;

use crate::error::Result;
use crate::pending::{consume, consume2, consume_all, Pending};

/// Raw events as consumed by event-level metrics.
pub type Events = Vec<Event>;

#[instrument(level = "trace", skip_all)]
pub async fn loss(events: impl Into<Pending<Events>>) -> Result<f64> {
	consume(events.into(), |events| metrics::loss(events)).await
}

#[instrument(level = "trace", skip_all)]
pub async fn pageviews(events: impl Into<Pending<Events>>) -> Result<usize> {
	consume(events.into(), |events| metrics::pageviews(events)).await
}

#[instrument(level = "trace", skip_all)]
pub async fn visitors(events: impl Into<Pending<Events>>) -> Result<usize> {
	consume(events.into(), |events| metrics::visitors(events)).await
}

#[instrument(level = "trace", skip_all)]
pub async fn accounts(events: impl Into<Pending<Events>>) -> Result<usize> {
	consume(events.into(), |events| metrics::accounts(events)).await
}

#[instrument(level = "trace", skip_all)]
pub async fn unique_sessions(aggregate: impl Into<Pending<Aggregate>>) -> Result<usize> {
	consume(aggregate.into(), metrics::unique_sessions).await
}

#[instrument(level = "trace", skip_all)]
pub async fn bounce_rate(aggregate: impl Into<Pending<Aggregate>>) -> Result<f64> {
	consume(aggregate.into(), metrics::bounce_rate).await
}

#[instrument(level = "trace", skip_all)]
pub async fn avg_pageload(aggregate: impl Into<Pending<Aggregate>>) -> Result<Option<f64>> {
	consume(aggregate.into(), metrics::avg_pageload).await
}

#[instrument(level = "trace", skip_all)]
pub async fn avg_page_depth(aggregate: impl Into<Pending<Aggregate>>) -> Result<Option<f64>> {
	consume(aggregate.into(), metrics::avg_page_depth).await
}

#[instrument(level = "trace", skip_all)]
pub async fn mobile_share(aggregate: impl Into<Pending<Aggregate>>) -> Result<Option<f64>> {
	consume(aggregate.into(), metrics::mobile_share).await
}

/// Referrers bucketed with the process-wide table.
#[instrument(level = "trace", skip_all)]
pub async fn referrers(aggregate: impl Into<Pending<Aggregate>>) -> Result<Vec<ReferrerCount>> {
	consume(aggregate.into(), metrics::referrers).await
}

#[instrument(level = "trace", skip_all)]
pub async fn referrers_with(
	aggregate: impl Into<Pending<Aggregate>>,
	table: &BucketTable,
) -> Result<Vec<ReferrerCount>> {
	consume(aggregate.into(), |aggregate| metrics::referrers_with(aggregate, table)).await
}

#[instrument(level = "trace", skip_all)]
pub async fn campaigns(aggregate: impl Into<Pending<Aggregate>>) -> Result<Vec<ReferrerCount>> {
	consume(aggregate.into(), metrics::campaigns).await
}

#[instrument(level = "trace", skip_all)]
pub async fn sources(aggregate: impl Into<Pending<Aggregate>>) -> Result<Vec<ReferrerCount>> {
	consume(aggregate.into(), metrics::sources).await
}

#[instrument(level = "trace", skip_all)]
pub async fn pages(aggregate: impl Into<Pending<Aggregate>>) -> Result<Vec<PageCount>> {
	consume(aggregate.into(), metrics::pages).await
}

#[instrument(level = "trace", skip_all)]
pub async fn active_pages(aggregate: impl Into<Pending<Aggregate>>) -> Result<Vec<PageCount>> {
	consume(aggregate.into(), metrics::active_pages).await
}

#[instrument(level = "trace", skip_all)]
pub async fn landing_pages(aggregate: impl Into<Pending<Aggregate>>) -> Result<Vec<PageCount>> {
	consume(aggregate.into(), metrics::landing_pages).await
}

#[instrument(level = "trace", skip_all)]
pub async fn exit_pages(aggregate: impl Into<Pending<Aggregate>>) -> Result<Vec<PageCount>> {
	consume(aggregate.into(), metrics::exit_pages).await
}

/// Share of users in `range` already seen in `all_events` before it. Both
/// inputs are resolved concurrently.
#[instrument(level = "trace", skip_all)]
pub async fn returning_users(
	range: impl Into<Pending<Events>>,
	all_events: impl Into<Pending<Events>>,
) -> Result<f64> {
	consume2(range.into(), all_events.into(), |range, all| {
		metrics::returning_users(range, all)
	})
	.await
}

/// Retention matrix over consecutive chunks. All chunks are resolved
/// concurrently; the matrix follows the order the chunks were given in.
#[instrument(level = "trace", skip_all, fields(chunks = chunks.len()))]
pub async fn retention(chunks: Vec<Pending<Events>>) -> Result<Vec<Vec<f64>>> {
	consume_all(chunks, |chunks| {
		let slices: Vec<&[Event]> = chunks.iter().map(|chunk| chunk.as_slice()).collect();
		metrics::retention(&slices)
	})
	.await
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io;
	use tally_stats_core::{KeyCount, Payload};

	fn visit(secret_id: &str, session_id: &str, href: &str) -> Event {
		Event::new()
			.with_secret_id(secret_id)
			.with_payload(Payload::new().with_session_id(session_id).with_href(href))
	}

	fn deferred_events(events: Events) -> Pending<Events> {
		Pending::deferred(async move {
			tokio::task::yield_now().await;
			Ok::<_, io::Error>(events)
		})
	}

	#[tokio::test]
	async fn test_ready_and_deferred_inputs_agree() {
		let events = vec![visit("user-a", "a", "https://example.net/"), Event::new()];

		let ready = loss(events.clone()).await.unwrap();
		let deferred = loss(deferred_events(events)).await.unwrap();

		assert_eq!(ready, 0.5);
		assert_eq!(ready, deferred);
	}

	#[tokio::test]
	async fn test_aggregate_from_pending_events() {
		let events = deferred_events(vec![
			visit("user-a", "a", "https://example.net/x"),
			visit("user-a", "a", "https://example.net/y"),
			visit("user-b", "b", "https://example.net/x"),
		]);
		let aggregate = events.clone().map(|events| Aggregate::build(events));

		let (sessions, rate, top, users) = futures::try_join!(
			unique_sessions(aggregate.clone()),
			bounce_rate(aggregate.clone()),
			pages(aggregate),
			visitors(events),
		)
		.unwrap();

		assert_eq!(sessions, 2);
		assert_eq!(rate, 0.5);
		assert_eq!(
			top.first(),
			Some(&KeyCount {
				key: "https://example.net/x".to_string(),
				count: 2
			})
		);
		assert_eq!(users, 2);
	}

	#[tokio::test]
	async fn test_resolution_failure_propagates() {
		let failing: Pending<Aggregate> =
			Pending::deferred(async { Err::<Aggregate, _>(io::Error::other("boom")) });
		assert!(bounce_rate(failing.clone()).await.is_err());
		assert!(pages(failing).await.is_err());
	}

	#[tokio::test]
	async fn test_returning_users_with_mixed_inputs() {
		let seen = |event_id: &str, secret_id: &str| {
			Event::new().with_event_id(event_id).with_secret_id(secret_id)
		};
		let range = vec![seen("e-3", "user-a"), seen("e-4", "user-b")];
		let all = deferred_events(vec![
			seen("e-1", "user-a"),
			seen("e-2", "user-c"),
			seen("e-3", "user-a"),
			seen("e-4", "user-b"),
		]);
		assert_eq!(returning_users(range, all).await.unwrap(), 0.5);
	}

	#[tokio::test]
	async fn test_retention_resolves_chunks_in_order() {
		let user = |id: &str| Event::new().with_secret_id(id);
		let chunks = vec![
			Pending::ready(vec![user("user-a"), user("user-b")]),
			deferred_events(vec![user("user-a")]),
			Pending::ready(Vec::new()),
		];
		assert_eq!(
			retention(chunks).await.unwrap(),
			vec![vec![1.0, 0.5, 0.0], vec![1.0, 0.0], vec![0.0]]
		);
	}

	#[tokio::test]
	async fn test_referrers_with_explicit_table() {
		let aggregate = Aggregate::build(&[Event::new().with_payload(
			Payload::new()
				.with_session_id("a")
				.with_href("https://example.net/")
				.with_referrer("https://www.google.com/search"),
		)]);
		let table = BucketTable::builtin();
		let rows = referrers_with(aggregate, &table).await.unwrap();
		assert_eq!(rows[0].key, "Google");
	}
}
