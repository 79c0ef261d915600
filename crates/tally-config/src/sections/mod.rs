// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod buckets;
mod logging;
mod report;

pub use buckets::{BucketRule, BucketsConfig, BucketsConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use report::{ReportConfig, ReportConfigLayer, MAX_NUM_DAYS};
