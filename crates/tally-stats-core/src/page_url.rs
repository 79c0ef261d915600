// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Parsed page and referrer URLs.

use url::Url;

/// An absolute URL taken from an event payload.
///
/// Only absolute URLs are accepted; relative paths, empty strings and
/// anything else the URL parser rejects are treated as "no URL".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageUrl(Url);

impl PageUrl {
	/// Parses `raw` as an absolute URL, returning `None` when it is malformed.
	#[must_use]
	pub fn parse(raw: &str) -> Option<Self> {
		Url::parse(raw).ok().map(Self)
	}

	/// Hostname including a non-default port, e.g. `localhost:8080`.
	///
	/// Empty for URLs without a host such as `file:` URLs.
	#[must_use]
	pub fn host(&self) -> String {
		match (self.0.host_str(), self.0.port()) {
			(Some(host), Some(port)) => format!("{host}:{port}"),
			(Some(host), None) => host.to_string(),
			(None, _) => String::new(),
		}
	}

	/// The serialized URL.
	#[must_use]
	pub fn href(&self) -> &str {
		self.0.as_str()
	}

	/// Origin and path, with query string and fragment stripped.
	#[must_use]
	pub fn clean(&self) -> String {
		format!("{}{}", self.0.origin().ascii_serialization(), self.0.path())
	}

	/// First value of the query parameter `name`, if present.
	#[must_use]
	pub fn query_param(&self, name: &str) -> Option<String> {
		self.0
			.query_pairs()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.into_owned())
	}

	#[must_use]
	pub fn as_url(&self) -> &Url {
		&self.0
	}
}

impl std::fmt::Display for PageUrl {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}
