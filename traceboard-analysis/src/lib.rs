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

//! Traceboard Analysis
//!
//! Analytical views over a trace export: bottlenecks, errors, timeline,
//! service dependencies, chart-data extraction, and the load-time summary.
//! Every function here is a pure reduction of a borrowed JSON export; empty
//! or malformed input degrades to the documented zero-value shapes rather
//! than failing.

pub mod bottleneck;
pub mod chart;
pub mod dependency;
pub mod dispatch;
pub mod errors;
pub mod summary;
pub mod timeline;


pub use bottleneck::{analyze_bottlenecks, Bottleneck, BottleneckReport};
pub use chart::{extract_gantt_data, extract_scatter_data, ChartDataKind, GanttEntry, ScatterPoint};
pub use dependency::{
    analyze_dependency_edges, resolve_service_dependencies, DependencyEdge,
    DependencyEdgesReport, ServiceDependencies, ServiceDependencyReport,
};
pub use dispatch::{analyze_trace_performance, AnalysisKind, AnalysisReport, UnknownAnalysisKind};
pub use errors::{analyze_errors, ErrorRecord, ErrorReport};
pub use summary::{summarize_trace, TraceSummary};
pub use timeline::{analyze_timeline, TimeRange, TimelineEntry, TimelineReport};

/// Nanoseconds above which a span counts as a bottleneck (strictly greater).
pub const BOTTLENECK_THRESHOLD_NANOS: i64 = 1_000_000_000;

/// Entries kept by the bottleneck view; the full count is still reported.
pub const MAX_BOTTLENECKS: usize = 10;

/// Error records kept by the error view; per-service counts stay complete.
pub const MAX_ERRORS: usize = 10;

/// Entries kept by the timeline view after sorting.
pub const MAX_TIMELINE_ENTRIES: usize = 50;

/// Structural edges kept by the aggregate dependency view.
pub const MAX_DEPENDENCY_EDGES: usize = 20;

pub(crate) const NANOS_PER_MILLI: f64 = 1_000_000.0;
pub(crate) const NANOS_PER_SECOND: f64 = 1_000_000_000.0;
