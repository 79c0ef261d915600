// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Reading event exports from disk.
//!
//! An export is either a JSON array of events or newline-delimited JSON with
//! one event per line.

use std::path::{Path, PathBuf};

use tally_stats_core::Event;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum InputError {
	#[error("failed to read {path}: {source}")]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid event in {path} at line {line}: {source}")]
	Parse {
		path: PathBuf,
		line: usize,
		#[source]
		source: serde_json::Error,
	},
}

/// Reads all events from `path`.
pub async fn read_events(path: PathBuf) -> Result<Vec<Event>, InputError> {
	let content = tokio::fs::read_to_string(&path)
		.await
		.map_err(|source| InputError::Read {
			path: path.clone(),
			source,
		})?;
	let events = parse_events(&path, &content)?;
	debug!(path = %path.display(), events = events.len(), "read events");
	Ok(events)
}

fn parse_events(path: &Path, content: &str) -> Result<Vec<Event>, InputError> {
	if content.trim_start().starts_with('[') {
		return serde_json::from_str(content).map_err(|source| InputError::Parse {
			path: path.to_path_buf(),
			line: source.line(),
			source,
		});
	}

	content
		.lines()
		.enumerate()
		.filter(|(_, line)| !line.trim().is_empty())
		.map(|(index, line)| {
			serde_json::from_str(line).map_err(|source| InputError::Parse {
				path: path.to_path_buf(),
				line: index + 1,
				source,
			})
		})
		.collect()
}
