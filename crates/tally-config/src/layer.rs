// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration as produced by a single source.

use serde::{Deserialize, Serialize};

use crate::sections::{BucketsConfigLayer, LoggingConfigLayer, ReportConfigLayer};

/// One layer of configuration. Every field is optional; layers are merged in
/// order of precedence and the result is finalized into a `TallyConfig`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TallyConfigLayer {
	pub report: Option<ReportConfigLayer>,
	pub buckets: Option<BucketsConfigLayer>,
	pub logging: Option<LoggingConfigLayer>,
}

impl TallyConfigLayer {
	/// Merges `other` into `self`; values set in `other` win.
	pub fn merge(&mut self, other: Self) {
		merge_section(&mut self.report, other.report, ReportConfigLayer::merge);
		merge_section(&mut self.buckets, other.buckets, BucketsConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}

fn merge_section<T>(base: &mut Option<T>, other: Option<T>, merge: fn(&mut T, T)) {
	let Some(other) = other else {
		return;
	};
	match base {
		Some(base) => merge(base, other),
		None => *base = Some(other),
	}
}
