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

//! Load-time trace summary: the stats panel shown when an export is opened.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use traceboard_core::walk_spans;

use crate::timeline::TimeRange;

/// Headline statistics for one trace export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceSummary {
    pub total_spans: usize,
    /// Distinct services, first-encounter order.
    pub services: Vec<String>,
    /// Distinct span names, first-encounter order.
    pub span_types: Vec<String>,
    pub errors: usize,
    pub time_range: TimeRange,
}

/// Summarize an export in one walk.
///
/// Counts every decoded span; the time range covers only spans with valid
/// timing and falls back to the `{start: 0, end: 0}` sentinel when none
/// exists.
pub fn summarize_trace(export: &Value) -> TraceSummary {
    let mut summary = TraceSummary::default();
    let mut range: Option<(i64, i64)> = None;

    for span in walk_spans(export) {
        summary.total_spans += 1;
        if !summary.services.contains(&span.service) {
            summary.services.push(span.service.clone());
        }
        let name = span.display_name();
        if !summary.span_types.iter().any(|known| known == name) {
            summary.span_types.push(name.to_string());
        }
        if span.error {
            summary.errors += 1;
        }
        if let Some((start, end)) = span.timing() {
            range = Some(match range {
                Some((lo, hi)) => (lo.min(start), hi.max(end)),
                None => (start, end),
            });
        }
    }

    let (start, end) = range.unwrap_or((0, 0));
    summary.time_range = TimeRange { start, end };
    summary
}
