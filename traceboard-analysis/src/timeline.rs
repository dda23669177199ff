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

//! Timeline view: valid spans in start-time order with the global range.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use traceboard_core::walk_spans;

use crate::{MAX_TIMELINE_ENTRIES, NANOS_PER_MILLI};

/// One timed operation on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub name: String,
    pub service: String,
    pub start_time: i64,
    pub end_time: i64,
    /// Milliseconds.
    pub duration: f64,
    /// `"error"` or `"success"`.
    pub status: String,
}

/// Global `[min(startTime), max(endTime)]` over the valid spans.
///
/// `{start: 0, end: 0}` when no valid span exists; unbounded sentinels never
/// leak to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

impl Default for TimeRange {
    fn default() -> Self {
        Self { start: 0, end: 0 }
    }
}

/// Timeline view over one trace export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineReport {
    pub total_spans: usize,
    pub timeline: Vec<TimelineEntry>,
    pub time_range: TimeRange,
}

/// Order every valid span by start time.
///
/// The sort is stable, so spans sharing a start time keep encounter order.
/// The list is truncated to [`MAX_TIMELINE_ENTRIES`]; `totalSpans` and
/// `timeRange` still cover the full valid set.
pub fn analyze_timeline(export: &Value) -> TimelineReport {
    let mut timeline = Vec::new();
    let mut range: Option<(i64, i64)> = None;

    for span in walk_spans(export) {
        let Some((start, end)) = span.timing() else {
            continue;
        };
        range = Some(match range {
            Some((lo, hi)) => (lo.min(start), hi.max(end)),
            None => (start, end),
        });
        timeline.push(TimelineEntry {
            name: span.display_name().to_string(),
            status: if span.error { "error" } else { "success" }.to_string(),
            service: span.service,
            start_time: start,
            end_time: end,
            duration: (end - start) as f64 / NANOS_PER_MILLI,
        });
    }

    let total_spans = timeline.len();
    timeline.sort_by_key(|entry| entry.start_time);
    timeline.truncate(MAX_TIMELINE_ENTRIES);

    let (start, end) = range.unwrap_or((0, 0));
    TimelineReport {
        total_spans,
        timeline,
        time_range: TimeRange { start, end },
    }
}
