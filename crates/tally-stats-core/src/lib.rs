// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Event aggregation and statistics for Tally web analytics.
//!
//! This crate holds the synchronous core: raw [`Event`]s are reshaped into a
//! columnar [`Aggregate`], and the functions in [`metrics`] derive summary
//! numbers and breakdown tables from either form.
//!
//! # Architecture
//!
//! - `event` - the raw event record as delivered by the collector
//! - `aggregate` - index-aligned columns and session spans
//! - `page_url` - parsed absolute URLs with a cleaned form used for grouping
//! - `buckets` - maps referrer hosts to well-known service labels
//! - `metrics` - pure metric functions
//!
//! # Example
//!
//! ```
//! use tally_stats_core::{metrics, Aggregate, Event, Payload};
//!
//! let events = vec![
//!     Event::new()
//!         .with_secret_id("user-a")
//!         .with_payload(Payload::new().with_session_id("s-1").with_href("https://example.net/")),
//!     Event::new(),
//! ];
//! let aggregate = Aggregate::build(&events);
//!
//! assert_eq!(metrics::loss(&events), 0.5);
//! assert_eq!(metrics::unique_sessions(&aggregate), 1);
//! ```

pub mod aggregate;
pub mod buckets;
pub mod error;
pub mod event;
pub mod metrics;
pub mod page_url;

pub use aggregate::{build_aggregate, Aggregate, SessionSpan};
pub use buckets::{place_in_bucket, BucketEntry, BucketPattern, BucketTable};
pub use error::BucketError;
pub use event::{Event, Payload};
pub use metrics::{KeyCount, PageCount, ReferrerCount};
pub use page_url::PageUrl;
