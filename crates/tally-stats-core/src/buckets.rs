// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Referrer bucket classification.
//!
//! Well-known referrer hosts (search engines, social networks, app webviews)
//! are mapped to a human-friendly label. Patterns are either an exact host
//! (`t.co`) or a domain with all of its subdomains (`*.reddit.com`, which
//! also matches `reddit.com` itself). An exact host wins over any domain
//! pattern; among domain patterns the longest one wins. Matching is
//! case-sensitive and never falls back to substring search.
//!
//! The active table is installed once at process start (see [`install`]) and
//! never mutated afterwards. Without an explicit install the built-in table
//! is used.

use std::collections::HashMap;
use std::sync::OnceLock;

use tracing::debug;

use crate::error::BucketError;

const BUILTIN: &[(&str, &str)] = &[
	// Search engines
	("*.google.com", "Google"),
	("www.google.de", "Google"),
	("www.google.co.uk", "Google"),
	("www.google.fr", "Google"),
	("www.google.es", "Google"),
	("www.google.it", "Google"),
	("www.google.nl", "Google"),
	("www.google.be", "Google"),
	("www.google.ch", "Google"),
	("www.google.at", "Google"),
	("www.google.pl", "Google"),
	("www.google.se", "Google"),
	("www.google.dk", "Google"),
	("www.google.no", "Google"),
	("www.google.fi", "Google"),
	("www.google.pt", "Google"),
	("www.google.ie", "Google"),
	("www.google.ca", "Google"),
	("www.google.com.au", "Google"),
	("www.google.co.in", "Google"),
	("www.google.co.jp", "Google"),
	("www.google.com.br", "Google"),
	("www.google.com.mx", "Google"),
	("www.google.ru", "Google"),
	("com.google.android.googlequicksearchbox", "Google"),
	("mail.google.com", "Gmail"),
	("com.google.android.gm", "Gmail"),
	("*.bing.com", "Bing"),
	("*.duckduckgo.com", "DuckDuckGo"),
	("*.yahoo.com", "Yahoo!"),
	("*.ecosia.org", "Ecosia"),
	("*.qwant.com", "Qwant"),
	("*.startpage.com", "Startpage"),
	("search.brave.com", "Brave Search"),
	("*.baidu.com", "Baidu"),
	("*.yandex.ru", "Yandex"),
	("*.yandex.com", "Yandex"),
	// Social networks and messengers
	("*.facebook.com", "Facebook"),
	("com.facebook.katana", "Facebook"),
	("*.instagram.com", "Instagram"),
	("t.co", "Twitter"),
	("*.twitter.com", "Twitter"),
	("x.com", "Twitter"),
	("com.twitter.android", "Twitter"),
	("*.linkedin.com", "LinkedIn"),
	("lnkd.in", "LinkedIn"),
	("com.linkedin.android", "LinkedIn"),
	("*.reddit.com", "Reddit"),
	("com.reddit.frontpage", "Reddit"),
	("*.pinterest.com", "Pinterest"),
	("*.youtube.com", "YouTube"),
	("youtu.be", "YouTube"),
	("*.xing.com", "XING"),
	("*.whatsapp.com", "WhatsApp"),
	("com.whatsapp", "WhatsApp"),
	("t.me", "Telegram"),
	("org.telegram.messenger", "Telegram"),
	("app.slack.com", "Slack"),
	("com.slack", "Slack"),
	// Communities
	("news.ycombinator.com", "Hacker News"),
	("github.com", "GitHub"),
	("*.producthunt.com", "Product Hunt"),
	("*.stackoverflow.com", "Stack Overflow"),
	("*.wikipedia.org", "Wikipedia"),
];

/// How a bucket pattern is matched against a host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BucketPattern {
	/// Matches the host exactly
	Host(String),
	/// Matches the domain and any of its subdomains
	Domain(String),
}

impl BucketPattern {
	#[must_use]
	pub fn matches(&self, host: &str) -> bool {
		match self {
			BucketPattern::Host(h) => host == h,
			BucketPattern::Domain(d) => domain_matches(d, host),
		}
	}
}

fn domain_matches(domain: &str, host: &str) -> bool {
	host == domain
		|| host
			.strip_suffix(domain)
			.is_some_and(|rest| rest.ends_with('.'))
}

impl std::str::FromStr for BucketPattern {
	type Err = BucketError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let invalid = || BucketError::InvalidPattern(s.to_string());
		if s.is_empty() || s.chars().any(char::is_whitespace) {
			return Err(invalid());
		}
		match s.strip_prefix("*.") {
			Some(domain) if domain.is_empty() || domain.contains('*') => Err(invalid()),
			Some(domain) => Ok(BucketPattern::Domain(domain.to_string())),
			None if s.contains('*') => Err(invalid()),
			None => Ok(BucketPattern::Host(s.to_string())),
		}
	}
}

impl std::fmt::Display for BucketPattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			BucketPattern::Host(h) => write!(f, "{h}"),
			BucketPattern::Domain(d) => write!(f, "*.{d}"),
		}
	}
}

/// A pattern paired with the label of its bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketEntry {
	pub pattern: BucketPattern,
	pub label: String,
}

impl BucketEntry {
	/// Parses a pattern and validates the label.
	pub fn parse(pattern: &str, label: &str) -> Result<Self, BucketError> {
		let pattern: BucketPattern = pattern.parse()?;
		if label.trim().is_empty() {
			return Err(BucketError::EmptyLabel(pattern.to_string()));
		}
		Ok(Self {
			pattern,
			label: label.to_string(),
		})
	}
}

/// Immutable lookup table from referrer host to bucket label.
#[derive(Debug, Clone, Default)]
pub struct BucketTable {
	hosts: HashMap<String, String>,
	/// Kept sorted by descending domain length so the longest match wins.
	domains: Vec<(String, String)>,
}

impl BucketTable {
	/// A table without any entries; every host maps to itself.
	#[must_use]
	pub fn empty() -> Self {
		Self::default()
	}

	/// The built-in table of well-known referrers.
	#[must_use]
	pub fn builtin() -> Self {
		let entries = BUILTIN.iter().map(|(pattern, label)| {
			// The built-in patterns are literals that always parse.
			let pattern = match pattern.strip_prefix("*.") {
				Some(domain) => BucketPattern::Domain(domain.to_string()),
				None => BucketPattern::Host(pattern.to_string()),
			};
			BucketEntry {
				pattern,
				label: label.to_string(),
			}
		});
		Self::empty().with_entries(entries)
	}

	/// Adds `entries` to the table. Later entries replace earlier ones with
	/// the same pattern.
	#[must_use]
	pub fn with_entries(mut self, entries: impl IntoIterator<Item = BucketEntry>) -> Self {
		for entry in entries {
			match entry.pattern {
				BucketPattern::Host(host) => {
					self.hosts.insert(host, entry.label);
				}
				BucketPattern::Domain(domain) => {
					match self.domains.iter_mut().find(|(d, _)| *d == domain) {
						Some(existing) => existing.1 = entry.label,
						None => self.domains.push((domain, entry.label)),
					}
				}
			}
		}
		self.domains.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
		self
	}

	/// Number of patterns in the table.
	#[must_use]
	pub fn len(&self) -> usize {
		self.hosts.len() + self.domains.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns the label for `host_or_href`, or the input unchanged when no
	/// pattern matches.
	#[must_use]
	pub fn classify<'a>(&'a self, host_or_href: &'a str) -> &'a str {
		if let Some(label) = self.hosts.get(host_or_href) {
			return label;
		}
		self.domains
			.iter()
			.find(|(domain, _)| domain_matches(domain, host_or_href))
			.map(|(_, label)| label.as_str())
			.unwrap_or(host_or_href)
	}
}

static ACTIVE: OnceLock<BucketTable> = OnceLock::new();

/// Installs the process-wide table. Fails if a table is already active.
pub fn install(table: BucketTable) -> Result<(), BucketError> {
	let patterns = table.len();
	ACTIVE
		.set(table)
		.map_err(|_| BucketError::AlreadyInstalled)?;
	debug!(patterns, "installed referrer bucket table");
	Ok(())
}

/// The process-wide table, falling back to [`BucketTable::builtin`].
pub fn active() -> &'static BucketTable {
	ACTIVE.get_or_init(BucketTable::builtin)
}

/// Places a referrer host (or full href for host-less referrers) into its
/// bucket using the process-wide table.
#[must_use]
pub fn place_in_bucket(host_or_href: &str) -> &str {
	active().classify(host_or_href)
}
