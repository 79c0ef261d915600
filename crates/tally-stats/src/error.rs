// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use thiserror::Error;

/// Failure while resolving the inputs of a metric.
///
/// Cloneable so the same failure can be handed to every metric sharing a
/// pending input.
#[derive(Debug, Clone, Error)]
pub enum StatsError {
	#[error("failed to resolve metric input: {0}")]
	Resolution(#[source] Arc<dyn std::error::Error + Send + Sync>),
}

impl StatsError {
	pub fn resolution<E>(err: E) -> Self
	where
		E: std::error::Error + Send + Sync + 'static,
	{
		Self::Resolution(Arc::new(err))
	}
}

pub type Result<T> = std::result::Result<T, StatsError>;
