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

//! Span tree walker.
//!
//! Flattens the nested export layout (ResourceSpanGroup -> ResourceSpan ->
//! ScopeSpan -> Span) into normalized records in document order. Missing
//! collections are empty collections, malformed elements are skipped with a
//! log line, and the walk itself never fails: a `null` or non-array export
//! simply yields nothing.

use serde_json::Value;
use tracing::{debug, warn};

use crate::resource::resolve_service_name;
use crate::span::{RawSpan, SpanRecord};

/// One ResourceSpan flattened: its resolved service plus every span beneath
/// it, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSpans {
    pub service: String,
    pub spans: Vec<SpanRecord>,
}

/// Walk the export's ResourceSpans in document order.
///
/// Each ResourceSpan's service is resolved once and attached to all of its
/// spans. A ResourceSpan with no spans still produces a (service, empty)
/// entry; per-service call counting depends on that.
pub fn walk_service_spans(export: &Value) -> Vec<ServiceSpans> {
    let Some(groups) = export.as_array() else {
        if !export.is_null() {
            debug!("trace export is not an array, treating as empty");
        }
        return Vec::new();
    };

    let mut walked = Vec::new();
    for group in groups {
        for resource_span in collection(group, "resourceSpans") {
            let service = resolve_service_name(resource_span);
            let mut spans = Vec::new();
            for scope_span in collection(resource_span, "scopeSpans") {
                for span in collection(scope_span, "spans") {
                    match serde_json::from_value::<RawSpan>(span.clone()) {
                        Ok(raw) => spans.push(SpanRecord::from_raw(raw, &service)),
                        Err(err) => warn!(service = %service, "skipping malformed span: {}", err),
                    }
                }
            }
            walked.push(ServiceSpans { service, spans });
        }
    }
    walked
}

/// Flatten a trace export into every reachable span in document order.
pub fn walk_spans(export: &Value) -> Vec<SpanRecord> {
    walk_service_spans(export)
        .into_iter()
        .flat_map(|group| group.spans)
        .collect()
}

/// A named child array, or empty when absent or of the wrong shape.
fn collection<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
