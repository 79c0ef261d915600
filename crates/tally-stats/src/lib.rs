// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Asynchronous metrics and reports for Tally web analytics.
//!
//! The metrics in `tally-stats-core` are synchronous. This crate exposes each
//! of them behind a uniform async contract: every input may be passed ready
//! or still pending, inputs are resolved concurrently and a failure to
//! produce an input is propagated to the caller.
//!
//! # Example
//!
//! ```ignore
//! use tally_stats::{default_stats, Pending, ReportQuery};
//!
//! let events = Pending::deferred(load_events_from_store());
//! let report = default_stats(events, ReportQuery::default()).await?;
//! ```

pub mod error;
pub mod pending;
pub mod report;
pub mod stats;

pub use error::{Result, StatsError};
pub use pending::{consume, consume2, consume_all, Pending};
pub use report::{
	chunk_by_days, default_stats, summary, DayStats, DefaultStats, ReportQuery, Summary,
	DEFAULT_NUM_DAYS,
};
pub use stats::Events;
