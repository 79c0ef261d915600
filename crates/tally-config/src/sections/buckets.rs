// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Referrer bucket configuration section.

use serde::{Deserialize, Serialize};
use tally_stats_core::{BucketEntry, BucketError, BucketTable};

/// A configured bucket: `pattern` is an exact host (`t.co`) or a domain
/// with its subdomains (`*.example.com`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BucketRule {
	pub pattern: String,
	pub label: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BucketsConfigLayer {
	pub builtin: Option<bool>,
	pub extra: Option<Vec<BucketRule>>,
}

impl BucketsConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.builtin.is_some() {
			self.builtin = other.builtin;
		}
		if other.extra.is_some() {
			self.extra = other.extra;
		}
	}

	pub fn finalize(self) -> BucketsConfig {
		BucketsConfig {
			builtin: self.builtin.unwrap_or(true),
			extra: self.extra.unwrap_or_default(),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BucketsConfig {
	/// Start from the built-in table of well-known referrers
	pub builtin: bool,
	/// Added on top of the built-in table, replacing equal patterns
	pub extra: Vec<BucketRule>,
}

impl Default for BucketsConfig {
	fn default() -> Self {
		Self {
			builtin: true,
			extra: Vec::new(),
		}
	}
}

impl BucketsConfig {
	pub fn entries(&self) -> Result<Vec<BucketEntry>, BucketError> {
		self.extra
			.iter()
			.map(|rule| BucketEntry::parse(&rule.pattern, &rule.label))
			.collect()
	}

	/// Builds the lookup table described by this section.
	pub fn table(&self) -> Result<BucketTable, BucketError> {
		let base = if self.builtin {
			BucketTable::builtin()
		} else {
			BucketTable::empty()
		};
		Ok(base.with_entries(self.entries()?))
	}
}
