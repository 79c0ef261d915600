// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the statistics engine.
//!
//! Malformed event data never surfaces here; it is normalized to absent
//! values during aggregation. The only fallible operations are the ones that
//! configure the referrer bucket table.

use thiserror::Error;

/// Errors that can occur while configuring referrer buckets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BucketError {
	/// Pattern is empty, contains whitespace, or uses an unsupported wildcard
	#[error("invalid bucket pattern: {0:?}")]
	InvalidPattern(String),

	/// Label is empty
	#[error("bucket label for pattern {0:?} is empty")]
	EmptyLabel(String),

	/// A table has already been installed for this process
	#[error("a bucket table has already been installed")]
	AlreadyInstalled,
}
