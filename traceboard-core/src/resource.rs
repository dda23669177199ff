// Copyright 2025 Traceboard Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Resource attribute resolution.
//!
//! Producers emit resource attributes in two encodings: the OTLP structured
//! form (a sequence of `{key, value: {stringValue}}` records) and a flat
//! key-to-string mapping. Both are resolved here, once, so the analyzers
//! never see the difference.

use serde_json::Value;

/// Service name used when a ResourceSpan carries no resolvable `service.name`.
pub const UNKNOWN_SERVICE: &str = "Unknown Service";

const SERVICE_NAME_KEY: &str = "service.name";

/// Resolve the `service.name` attribute of a ResourceSpan value.
///
/// The structured record sequence is tried first, then the mapping form.
/// Absent or unrecognizable attributes resolve to [`UNKNOWN_SERVICE`].
pub fn resolve_service_name(resource_span: &Value) -> String {
    let attributes = resource_span
        .get("resource")
        .and_then(|resource| resource.get("attributes"));

    let resolved = match attributes {
        Some(Value::Array(entries)) => entries
            .iter()
            .find(|entry| entry.get("key").and_then(Value::as_str) == Some(SERVICE_NAME_KEY))
            .and_then(|entry| entry.get("value"))
            .and_then(|value| value.get("stringValue"))
            .and_then(Value::as_str),
        Some(Value::Object(map)) => map.get(SERVICE_NAME_KEY).and_then(Value::as_str),
        _ => None,
    };

    resolved.unwrap_or(UNKNOWN_SERVICE).to_string()
}
