use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use time::{
	Date, OffsetDateTime, PrimitiveDateTime,
	format_description::well_known::{Iso8601, Rfc3339},
};

use crate::{Error, Result};

/// An agent as read from the registry.
///
/// Only `reputationScore`, `registeredAt`, and `services` feed the ranker. Every field may be
/// absent on the wire; a missing `registeredAt` ranks with zero recency. Everything the registry
/// sends beyond the named fields is carried through `extra` untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRecord {
	#[serde(default)]
	pub id: String,
	#[serde(default)]
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default)]
	pub reputation_score: f64,
	#[serde(default)]
	pub registered_at: RegisteredAt,
	/// Serialized service list, normally a JSON array. A bare array on the wire is re-encoded.
	#[serde(default = "empty_services", deserialize_with = "deserialize_services")]
	pub services: String,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}
impl AgentRecord {
	pub fn new(id: impl Into<String>, registered_at: RegisteredAt) -> Self {
		Self {
			id: id.into(),
			name: String::new(),
			description: None,
			reputation_score: 0.0,
			registered_at,
			services: empty_services(),
			extra: Map::new(),
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegisteredAt {
	EpochMillis(i64),
	FractionalEpochMillis(f64),
	Text(String),
	/// Absent or `null` on the wire. Never parses.
	#[default]
	Missing,
}
impl RegisteredAt {
	pub fn from_datetime(at: OffsetDateTime) -> Self {
		Self::EpochMillis((at.unix_timestamp_nanos() / 1_000_000) as i64)
	}

	/// Accepts epoch milliseconds (integer, fractional, or a string of digits) and ISO 8601
	/// text. Text without an offset is read as UTC; a bare date is midnight UTC.
	pub fn parse(&self) -> Result<OffsetDateTime> {
		let parsed = match self {
			Self::EpochMillis(millis) => from_epoch_millis(*millis),
			Self::FractionalEpochMillis(millis) => from_fractional_epoch_millis(*millis),
			Self::Text(raw) => parse_text(raw.trim()),
			Self::Missing => None,
		};

		parsed.ok_or_else(|| Error::InvalidTimestamp { value: self.to_string() })
	}

	/// Milliseconds elapsed between registration and `now`. Negative for future registrations.
	pub fn age_millis(&self, now: OffsetDateTime) -> Result<f64> {
		let registered_at = self.parse()?;

		Ok((now - registered_at).whole_milliseconds() as f64)
	}
}
impl Display for RegisteredAt {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		match self {
			Self::EpochMillis(millis) => write!(f, "{millis}"),
			Self::FractionalEpochMillis(millis) => write!(f, "{millis}"),
			Self::Text(raw) => f.write_str(raw),
			Self::Missing => f.write_str("<missing>"),
		}
	}
}
impl From<OffsetDateTime> for RegisteredAt {
	fn from(at: OffsetDateTime) -> Self {
		Self::from_datetime(at)
	}
}

fn from_epoch_millis(millis: i64) -> Option<OffsetDateTime> {
	OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()
}

fn from_fractional_epoch_millis(millis: f64) -> Option<OffsetDateTime> {
	if !millis.is_finite() {
		return None;
	}

	OffsetDateTime::from_unix_timestamp_nanos((millis * 1_000_000.0).round() as i128).ok()
}

fn parse_text(raw: &str) -> Option<OffsetDateTime> {
	if raw.is_empty() {
		return None;
	}
	if raw.bytes().all(|byte| byte.is_ascii_digit()) {
		return raw.parse::<i64>().ok().and_then(from_epoch_millis);
	}

	OffsetDateTime::parse(raw, &Rfc3339)
		.or_else(|_| OffsetDateTime::parse(raw, &Iso8601::DEFAULT))
		.ok()
		.or_else(|| PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT).ok().map(|at| at.assume_utc()))
		.or_else(|| Date::parse(raw, &Iso8601::DEFAULT).ok().map(|day| day.midnight().assume_utc()))
}

fn empty_services() -> String {
	"[]".to_string()
}

fn deserialize_services<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	match Value::deserialize(deserializer)? {
		Value::String(raw) => Ok(raw),
		Value::Null => Ok(empty_services()),
		other => Ok(other.to_string()),
	}
}

#[cfg(test)]
mod tests {
	use time::macros::datetime;

	use super::*;

	#[test]
	fn parses_rfc3339_and_epoch_forms() {
		let expected = datetime!(2025-01-02 03:04:05 UTC);
		let millis = (expected.unix_timestamp_nanos() / 1_000_000) as i64;

		assert_eq!(
			RegisteredAt::Text("2025-01-02T03:04:05Z".to_string()).parse().expect("rfc3339"),
			expected
		);
		assert_eq!(RegisteredAt::EpochMillis(millis).parse().expect("millis"), expected);
		assert_eq!(RegisteredAt::Text(millis.to_string()).parse().expect("digits"), expected);
	}

	#[test]
	fn rejects_garbage_timestamps() {
		for raw in ["", "yesterday", "2025-13-40T00:00:00Z", "2025-05-31T25:00:00"] {
			let err = RegisteredAt::Text(raw.to_string()).parse().expect_err(raw);

			assert!(matches!(err, Error::InvalidTimestamp { .. }));
		}

		assert!(RegisteredAt::Missing.parse().is_err());
		assert!(RegisteredAt::FractionalEpochMillis(f64::NAN).parse().is_err());
	}

	#[test]
	fn parses_iso8601_without_offset_as_utc() {
		assert_eq!(
			RegisteredAt::Text("2025-05-31T12:00:00".to_string()).parse().expect("local"),
			datetime!(2025-05-31 12:00:00 UTC)
		);
		assert_eq!(
			RegisteredAt::Text("2025-05-31".to_string()).parse().expect("date"),
			datetime!(2025-05-31 00:00:00 UTC)
		);
		assert_eq!(
			RegisteredAt::Text("2025-05-31T14:00:00+02:00".to_string()).parse().expect("offset"),
			datetime!(2025-05-31 12:00:00 UTC)
		);
	}

	#[test]
	fn fractional_epoch_numbers_deserialize_and_parse() {
		let registered_at: RegisteredAt =
			serde_json::from_str("1717243200000.0").expect("fractional epoch");

		assert_eq!(registered_at, RegisteredAt::FractionalEpochMillis(1_717_243_200_000.0));
		assert_eq!(registered_at.parse().expect("parse"), datetime!(2024-06-01 12:00:00 UTC));

		let registered_at: RegisteredAt = serde_json::from_str("1717243200000").expect("epoch");

		assert_eq!(registered_at, RegisteredAt::EpochMillis(1_717_243_200_000));
	}

	#[test]
	fn record_without_id_or_registration_deserializes() {
		let record: AgentRecord =
			serde_json::from_str(r#"{"reputationScore": 10, "services": "[]"}"#).expect("record");

		assert!(record.id.is_empty());
		assert_eq!(record.registered_at, RegisteredAt::Missing);

		let record: AgentRecord =
			serde_json::from_str(r#"{"registeredAt": null}"#).expect("null registration");

		assert_eq!(record.registered_at, RegisteredAt::Missing);
		assert!(record.registered_at.parse().is_err());
	}

	#[test]
	fn age_is_signed_milliseconds() {
		let now = datetime!(2025-01-02 00:00:00 UTC);
		let past = RegisteredAt::from_datetime(datetime!(2025-01-01 23:00:00 UTC));
		let future = RegisteredAt::from_datetime(datetime!(2025-01-02 00:00:01 UTC));

		assert_eq!(past.age_millis(now).expect("past"), 3_600_000.0);
		assert_eq!(future.age_millis(now).expect("future"), -1_000.0);
	}

	#[test]
	fn record_keeps_unknown_fields_and_accepts_array_services() {
		let raw = serde_json::json!({
			"id": "agent-1",
			"name": "Pricing bot",
			"reputationScore": 12.5,
			"registeredAt": "2025-01-02T03:04:05Z",
			"services": [{"name": "quote"}, "swap"],
			"owner": "0xabc",
		});
		let record: AgentRecord = serde_json::from_value(raw).expect("record");

		assert_eq!(record.reputation_score, 12.5);
		assert_eq!(record.services, r#"[{"name":"quote"},"swap"]"#);
		assert_eq!(record.extra.get("owner"), Some(&Value::String("0xabc".to_string())));
		assert!(record.description.is_none());

		let encoded = serde_json::to_value(&record).expect("encode");

		assert_eq!(encoded["owner"], "0xabc");
		assert_eq!(encoded["registeredAt"], "2025-01-02T03:04:05Z");
	}
}
