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

//! Normalized span records.
//!
//! Trace producers disagree on the details: timestamps arrive as integers or
//! as numeric strings, error status as the integer `2` or the literal
//! `"STATUS_CODE_ERROR"`, ids as empty-string placeholders. All of that is
//! normalized exactly once, here, when the record is built; analyzers only
//! ever see a [`SpanRecord`].

use serde::Deserialize;
use serde_json::Value;

/// Operation name used when a span carries none.
pub const UNKNOWN_OPERATION: &str = "Unknown Operation";

/// Span fields as found in a trace export, before normalization.
///
/// Every field is optional; unknown fields (attributes, events, kind, ...)
/// are ignored. Decoding fails only for shapes that cannot be a span at all,
/// and the walker skips those.
#[derive(Debug, Deserialize)]
pub(crate) struct RawSpan {
    pub name: Option<String>,
    #[serde(rename = "spanId")]
    pub span_id: Option<String>,
    #[serde(rename = "parentSpanId")]
    pub parent_span_id: Option<String>,
    #[serde(rename = "startTimeUnixNano")]
    pub start_time_unix_nano: Option<Value>,
    #[serde(rename = "endTimeUnixNano")]
    pub end_time_unix_nano: Option<Value>,
    pub status: Option<RawStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawStatus {
    pub code: Option<Value>,
    pub message: Option<Value>,
}

/// One span paired with its resolved service, normalized for analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanRecord {
    /// Span name; `None` when absent or empty. Extractors skip unnamed
    /// spans, analyzers fall back to [`UNKNOWN_OPERATION`].
    pub name: Option<String>,
    /// Service resolved from the enclosing ResourceSpan's resource.
    pub service: String,
    pub span_id: Option<String>,
    pub parent_span_id: Option<String>,
    /// Parsed nanosecond tick; `None` when missing or unparseable.
    pub start_unix_nano: Option<i64>,
    pub end_unix_nano: Option<i64>,
    /// True for either error encoding (`2` or `"STATUS_CODE_ERROR"`).
    pub error: bool,
    /// Raw status code rendered to a string, e.g. `"STATUS_CODE_ERROR"`
    /// or `"2"`.
    pub status_code: Option<String>,
    pub status_message: Option<String>,
}

impl SpanRecord {
    pub(crate) fn from_raw(raw: RawSpan, service: &str) -> Self {
        let status = raw.status.unwrap_or_default();
        Self {
            name: raw.name.filter(|name| !name.is_empty()),
            service: service.to_string(),
            span_id: raw.span_id.filter(|id| !id.is_empty()),
            parent_span_id: raw.parent_span_id.filter(|id| !id.is_empty()),
            start_unix_nano: parse_time_nanos(raw.start_time_unix_nano.as_ref()),
            end_unix_nano: parse_time_nanos(raw.end_time_unix_nano.as_ref()),
            error: status_is_error(status.code.as_ref()),
            status_code: status_code_string(status.code.as_ref()),
            status_message: status
                .message
                .as_ref()
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }

    /// Span name, defaulting to [`UNKNOWN_OPERATION`].
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_OPERATION)
    }

    /// Start/end pair, present only when both timestamps parsed and
    /// `start < end`. A span without timing is invalid for timeline and
    /// chart output.
    pub fn timing(&self) -> Option<(i64, i64)> {
        match (self.start_unix_nano, self.end_unix_nano) {
            (Some(start), Some(end)) if start < end => Some((start, end)),
            _ => None,
        }
    }

    /// Duration in nanoseconds, for spans with valid timing.
    pub fn duration_nanos(&self) -> Option<i64> {
        self.timing().map(|(start, end)| end - start)
    }
}

/// Parse a nanosecond timestamp given as a JSON number or numeric string.
fn parse_time_nanos(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(number) => {
            if let Some(ticks) = number.as_i64() {
                Some(ticks)
            } else if let Some(ticks) = number.as_u64() {
                i64::try_from(ticks).ok()
            } else {
                // Integral floats only; fractional nanoseconds don't exist.
                number
                    .as_f64()
                    .filter(|ticks| ticks.is_finite() && ticks.fract() == 0.0)
                    .map(|ticks| ticks as i64)
            }
        }
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn status_is_error(code: Option<&Value>) -> bool {
    match code {
        Some(Value::Number(number)) => number.as_i64() == Some(2),
        Some(Value::String(text)) => text == "STATUS_CODE_ERROR",
        _ => false,
    }
}

fn status_code_string(code: Option<&Value>) -> Option<String> {
    match code {
        Some(Value::String(text)) => Some(text.clone()),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    }
}
