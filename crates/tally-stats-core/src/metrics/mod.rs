// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Pure metric functions over raw events or an [`Aggregate`].
//!
//! Every function here is synchronous and deterministic, never mutates its
//! input and defines an explicit result for empty input instead of dividing
//! by zero.
//!
//! [`Aggregate`]: crate::aggregate::Aggregate

mod pages;
mod referrers;
mod retention;
mod sessions;
mod users;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use pages::{active_pages, exit_pages, group_pages, landing_pages, pages, PageSelection};
pub use referrers::{
	campaigns, group_referrers, referrers, referrers_with, sources, ReferrerKey,
};
pub use retention::{retention, returning_users};
pub use sessions::{avg_page_depth, avg_pageload, bounce_rate, mobile_share, unique_sessions};
pub use users::{accounts, loss, pageviews, visitors};

/// A grouped row in a breakdown table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyCount<C> {
	pub key: String,
	pub count: C,
}

/// Page breakdown row: number of pageviews for a cleaned URL.
pub type PageCount = KeyCount<usize>;

/// Referrer breakdown row: `(sessions, mean events per session)`.
pub type ReferrerCount = KeyCount<(usize, f64)>;

/// Insertion-ordered grouping keyed by string.
struct Tally<V> {
	index: HashMap<String, usize>,
	entries: Vec<(String, V)>,
}

impl<V> Default for Tally<V> {
	fn default() -> Self {
		Self {
			index: HashMap::new(),
			entries: Vec::new(),
		}
	}
}

impl<V: Default> Tally<V> {
	fn entry(&mut self, key: &str) -> &mut V {
		let pos = match self.index.get(key).copied() {
			Some(pos) => pos,
			None => {
				let pos = self.entries.len();
				self.index.insert(key.to_string(), pos);
				self.entries.push((key.to_string(), V::default()));
				pos
			}
		};
		&mut self.entries[pos].1
	}
}

impl<V> Tally<V> {
	fn into_entries(self) -> Vec<(String, V)> {
		self.entries
	}
}

impl Tally<usize> {
	fn into_rows(self) -> Vec<PageCount> {
		self.entries
			.into_iter()
			.map(|(key, count)| KeyCount { key, count })
			.collect()
	}
}

/// Orders rows by descending key. Ties end up in reverse insertion order,
/// the result of a stable ascending sort followed by a reversal.
fn rank_descending<T, K: Ord>(rows: &mut [T], key: impl FnMut(&T) -> K) {
	rows.sort_by_key(key);
	rows.reverse();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_tally_keeps_insertion_order() {
		let mut tally: Tally<usize> = Tally::default();
		*tally.entry("b") += 1;
		*tally.entry("a") += 1;
		*tally.entry("b") += 1;
		let rows = tally.into_rows();
		assert_eq!(
			rows,
			vec![
				KeyCount {
					key: "b".to_string(),
					count: 2
				},
				KeyCount {
					key: "a".to_string(),
					count: 1
				},
			]
		);
	}

	#[test]
	fn test_rank_descending_reverses_ties() {
		let mut rows = vec![("x", 1), ("y", 2), ("z", 1)];
		rank_descending(&mut rows, |r| r.1);
		assert_eq!(rows, vec![("y", 2), ("z", 1), ("x", 1)]);
	}

	#[test]
	fn test_referrer_row_serializes_count_as_pair() {
		let row: ReferrerCount = KeyCount {
			key: "www.example.net".to_string(),
			count: (2, 1.5),
		};
		let json = serde_json::to_value(&row).unwrap();
		assert_eq!(
			json,
			serde_json::json!({ "key": "www.example.net", "count": [2, 1.5] })
		);
	}
}
