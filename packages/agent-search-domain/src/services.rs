//! Decoding of the serialized `services` field carried on agent records.

use serde_json::Value;

use crate::{Error, Result};

pub fn decode(raw: &str) -> Result<Vec<Value>> {
	serde_json::from_str::<Vec<Value>>(raw)
		.map_err(|err| Error::InvalidServices { message: err.to_string() })
}

/// Number of declared services. Undecodable payloads count as zero.
pub fn service_count(raw: &str) -> usize {
	match decode(raw) {
		Ok(services) => services.len(),
		Err(err) => {
			tracing::debug!(error = %err, "Treating undecodable services as empty.");

			0
		},
	}
}

/// Human-readable service names: string entries, or the `name` field of object entries.
pub fn service_names(raw: &str) -> Vec<String> {
	let Ok(services) = decode(raw) else {
		return Vec::new();
	};

	services
		.into_iter()
		.filter_map(|service| match service {
			Value::String(name) => Some(name),
			Value::Object(mut fields) => match fields.remove("name") {
				Some(Value::String(name)) => Some(name),
				_ => None,
			},
			_ => None,
		})
		.collect()
}
