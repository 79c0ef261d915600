// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Raw event records as handed over by the event store.
//!
//! Events are recorded client side and may be incomplete: anonymous events
//! carry no `secretId`, and the payload may be missing altogether. Every
//! accessor here treats an empty string the same as an absent value.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded page interaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
	/// Site/tenant the event was recorded for
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub account_id: Option<String>,
	/// Pseudonymous user identifier (None for anonymous events)
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub secret_id: Option<String>,
	/// Sortable by creation order
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub event_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub payload: Option<Payload>,
}

/// Pageview details collected by the tracking script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub session_id: Option<String>,
	/// Absolute URL of the visited page
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub href: Option<String>,
	/// Absolute URL of the referring page
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub referrer: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	/// RFC 3339 datetime; without an offset it is read as UTC
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub timestamp: Option<String>,
	/// Page load time in milliseconds
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pageload: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub is_mobile: Option<bool>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
	value.as_deref().filter(|s| !s.is_empty())
}

impl Event {
	/// Creates an event without identifiers or payload.
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
		self.account_id = Some(account_id.into());
		self
	}

	pub fn with_secret_id(mut self, secret_id: impl Into<String>) -> Self {
		self.secret_id = Some(secret_id.into());
		self
	}

	pub fn with_event_id(mut self, event_id: impl Into<String>) -> Self {
		self.event_id = Some(event_id.into());
		self
	}

	pub fn with_payload(mut self, payload: Payload) -> Self {
		self.payload = Some(payload);
		self
	}

	#[must_use]
	pub fn account_id(&self) -> Option<&str> {
		non_empty(&self.account_id)
	}

	#[must_use]
	pub fn secret_id(&self) -> Option<&str> {
		non_empty(&self.secret_id)
	}

	#[must_use]
	pub fn event_id(&self) -> Option<&str> {
		non_empty(&self.event_id)
	}

	/// Whether the event can be attributed to a (pseudonymous) user.
	#[must_use]
	pub fn is_identified(&self) -> bool {
		self.secret_id().is_some()
	}

	#[must_use]
	pub fn session_id(&self) -> Option<&str> {
		self.payload.as_ref().and_then(|p| non_empty(&p.session_id))
	}

	#[must_use]
	pub fn href(&self) -> Option<&str> {
		self.payload.as_ref().and_then(|p| non_empty(&p.href))
	}

	#[must_use]
	pub fn referrer(&self) -> Option<&str> {
		self.payload.as_ref().and_then(|p| non_empty(&p.referrer))
	}

	#[must_use]
	pub fn pageload(&self) -> Option<f64> {
		self.payload.as_ref().and_then(|p| p.pageload)
	}

	#[must_use]
	pub fn is_mobile(&self) -> Option<bool> {
		self.payload.as_ref().and_then(|p| p.is_mobile)
	}

	/// Parsed payload timestamp. A datetime without an offset is taken as
	/// UTC. Unparsable values count as absent.
	#[must_use]
	pub fn timestamp(&self) -> Option<DateTime<Utc>> {
		let raw = self.payload.as_ref().and_then(|p| non_empty(&p.timestamp))?;
		match DateTime::parse_from_rfc3339(raw) {
			Ok(ts) => Some(ts.with_timezone(&Utc)),
			Err(_) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
				.ok()
				.map(|ts| ts.and_utc()),
		}
	}

	/// UTC calendar day the event was recorded on.
	#[must_use]
	pub fn day(&self) -> Option<NaiveDate> {
		self.timestamp().map(|ts| ts.date_naive())
	}
}

impl Payload {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
		self.session_id = Some(session_id.into());
		self
	}

	pub fn with_href(mut self, href: impl Into<String>) -> Self {
		self.href = Some(href.into());
		self
	}

	pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
		self.referrer = Some(referrer.into());
		self
	}

	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
		self.timestamp = Some(timestamp.to_rfc3339());
		self
	}

	pub fn with_pageload(mut self, pageload: f64) -> Self {
		self.pageload = Some(pageload);
		self
	}

	pub fn with_is_mobile(mut self, is_mobile: bool) -> Self {
		self.is_mobile = Some(is_mobile);
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;

	#[test]
	fn test_deserialize_full_event() {
		let json = r#"{
			"accountId": "account-a",
			"secretId": "user-a",
			"eventId": "e-01",
			"payload": {
				"type": "PAGEVIEW",
				"sessionId": "session-a",
				"href": "https://www.example.net/foo",
				"referrer": "https://www.example.com/",
				"title": "Foo",
				"timestamp": "2026-01-19T12:00:00.000Z",
				"pageload": 220,
				"isMobile": true
			}
		}"#;
		let event: Event = serde_json::from_str(json).unwrap();
		assert_eq!(event.account_id(), Some("account-a"));
		assert_eq!(event.secret_id(), Some("user-a"));
		assert_eq!(event.session_id(), Some("session-a"));
		assert_eq!(event.pageload(), Some(220.0));
		assert_eq!(event.is_mobile(), Some(true));
		assert_eq!(
			event.timestamp(),
			Some(Utc.with_ymd_and_hms(2026, 1, 19, 12, 0, 0).unwrap())
		);
	}

	#[test]
	fn test_deserialize_missing_payload() {
		let event: Event = serde_json::from_str(r#"{"secretId": null}"#).unwrap();
		assert!(event.payload.is_none());
		assert!(!event.is_identified());
		assert_eq!(event.session_id(), None);
		assert_eq!(event.href(), None);
		assert_eq!(event.day(), None);
	}

	#[test]
	fn test_empty_strings_are_absent() {
		let event = Event::new()
			.with_secret_id("")
			.with_payload(Payload::new().with_referrer("").with_session_id(""));
		assert_eq!(event.secret_id(), None);
		assert_eq!(event.referrer(), None);
		assert_eq!(event.session_id(), None);
	}

	#[test]
	fn test_malformed_timestamp_is_absent() {
		let event = Event::new().with_payload(Payload {
			timestamp: Some("yesterday".to_string()),
			..Default::default()
		});
		assert_eq!(event.timestamp(), None);
	}

	#[test]
	fn test_day_uses_utc() {
		let event = Event::new().with_payload(Payload {
			timestamp: Some("2026-01-19T23:30:00-02:00".to_string()),
			..Default::default()
		});
		assert_eq!(event.day(), NaiveDate::from_ymd_opt(2026, 1, 20));
	}

	#[test]
	fn test_timestamp_without_offset_is_utc() {
		let at = |raw: &str| {
			Event::new()
				.with_payload(Payload {
					timestamp: Some(raw.to_string()),
					..Default::default()
				})
				.timestamp()
		};
		let expected = DateTime::parse_from_rfc3339("2026-01-19T12:00:00Z")
			.unwrap()
			.with_timezone(&Utc);
		assert_eq!(at("2026-01-19T12:00:00"), Some(expected));
		assert_eq!(at("2026-01-19T12:00:00.000"), Some(expected));
		assert_eq!(at("2026-01-19"), None);
	}
}
