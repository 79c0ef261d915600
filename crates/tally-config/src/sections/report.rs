// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Report configuration section.

use serde::{Deserialize, Serialize};

const DEFAULT_NUM_DAYS: u32 = 7;

/// Upper bound for `num_days`, about ten years.
pub const MAX_NUM_DAYS: u32 = 3660;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReportConfigLayer {
	pub num_days: Option<u32>,
}

impl ReportConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.num_days.is_some() {
			self.num_days = other.num_days;
		}
	}

	pub fn finalize(self) -> ReportConfig {
		ReportConfig {
			num_days: self.num_days.unwrap_or(DEFAULT_NUM_DAYS),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportConfig {
	/// Number of UTC days covered by the default report
	pub num_days: u32,
}

impl Default for ReportConfig {
	fn default() -> Self {
		Self {
			num_days: DEFAULT_NUM_DAYS,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_values() {
		assert_eq!(ReportConfig::default().num_days, 7);
		assert_eq!(ReportConfigLayer::default().finalize(), ReportConfig::default());
	}

	#[test]
	fn test_merge_overwrites() {
		let mut base = ReportConfigLayer { num_days: Some(7) };
		base.merge(ReportConfigLayer { num_days: Some(30) });
		assert_eq!(base.num_days, Some(30));
	}

	#[test]
	fn test_merge_preserves_base_when_none() {
		let mut base = ReportConfigLayer { num_days: Some(14) };
		base.merge(ReportConfigLayer::default());
		assert_eq!(base.num_days, Some(14));
	}

	#[test]
	fn test_deserialize_layer_partial() {
		let layer: ReportConfigLayer = toml::from_str("num_days = 12").unwrap();
		assert_eq!(layer.finalize().num_days, 12);
	}
}
