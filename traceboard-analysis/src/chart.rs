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

//! Chart-data extraction: Gantt intervals and scatter points.
//!
//! Both extractors share one filtered walk. Validation happens before the
//! data-type predicate: a span missing its name or valid timing is skipped,
//! and a single malformed span never aborts the extraction.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use traceboard_core::{walk_service_spans, SpanRecord};

use crate::{BOTTLENECK_THRESHOLD_NANOS, NANOS_PER_MILLI};

const STATUS_CODE_OK: &str = "STATUS_CODE_OK";

/// Which spans a chart extraction keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChartDataKind {
    #[default]
    All,
    Errors,
    Bottlenecks,
}

impl ChartDataKind {
    fn keeps(self, span: &SpanRecord, duration_nanos: i64) -> bool {
        match self {
            Self::All => true,
            Self::Errors => span.error,
            Self::Bottlenecks => duration_nanos > BOTTLENECK_THRESHOLD_NANOS,
        }
    }
}

impl From<&str> for ChartDataKind {
    /// The host's `dataType` argument; anything unrecognized means all spans.
    fn from(data_type: &str) -> Self {
        match data_type {
            "errors" => Self::Errors,
            "bottlenecks" => Self::Bottlenecks,
            _ => Self::All,
        }
    }
}

/// One Gantt interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GanttEntry {
    pub name: String,
    pub start_time: i64,
    pub end_time: i64,
    /// Nanoseconds.
    pub duration: i64,
    pub service: String,
    pub status: String,
}

/// One duration-over-time scatter point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    /// Duration in milliseconds.
    pub x: f64,
    /// Start time in milliseconds.
    pub y: f64,
    pub service: String,
    pub name: String,
    pub status: String,
}

/// Extract Gantt intervals, sorted ascending by start time (stable).
pub fn extract_gantt_data(
    export: &Value,
    data_type: &str,
    service_filter: Option<&str>,
) -> Vec<GanttEntry> {
    let mut entries: Vec<GanttEntry> = filtered_spans(export, data_type.into(), service_filter)
        .into_iter()
        .map(|(span, (start, end))| GanttEntry {
            name: span.display_name().to_string(),
            start_time: start,
            end_time: end,
            duration: end - start,
            status: chart_status(&span),
            service: span.service,
        })
        .collect();
    entries.sort_by_key(|entry| entry.start_time);
    entries
}

/// Extract scatter points in document order.
pub fn extract_scatter_data(
    export: &Value,
    data_type: &str,
    service_filter: Option<&str>,
) -> Vec<ScatterPoint> {
    filtered_spans(export, data_type.into(), service_filter)
        .into_iter()
        .map(|(span, (start, end))| ScatterPoint {
            x: (end - start) as f64 / NANOS_PER_MILLI,
            y: start as f64 / NANOS_PER_MILLI,
            name: span.display_name().to_string(),
            status: chart_status(&span),
            service: span.service,
        })
        .collect()
}

/// The shared walk: service filter at the ResourceSpan level, then per-span
/// validation, then the data-type predicate.
fn filtered_spans(
    export: &Value,
    kind: ChartDataKind,
    service_filter: Option<&str>,
) -> Vec<(SpanRecord, (i64, i64))> {
    let mut kept = Vec::new();
    for group in walk_service_spans(export) {
        if let Some(filter) = service_filter {
            if group.service != filter {
                continue;
            }
        }
        for span in group.spans {
            if span.name.is_none() {
                continue;
            }
            let Some((start, end)) = span.timing() else {
                continue;
            };
            if kind.keeps(&span, end - start) {
                kept.push((span, (start, end)));
            }
        }
    }
    kept
}

fn chart_status(span: &SpanRecord) -> String {
    span.status_code
        .clone()
        .unwrap_or_else(|| STATUS_CODE_OK.to_string())
}
