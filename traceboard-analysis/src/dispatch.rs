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

//! The `analyzeTracePerformance` dispatch surface.
//!
//! The host's chat actions hand over an analysis type as a string; it is
//! parsed into a typed kind here, and an unrecognized string becomes an
//! explicit `{error}` sentinel the renderer can display instead of a fault.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::bottleneck::{analyze_bottlenecks, BottleneckReport};
use crate::dependency::{resolve_service_dependencies, ServiceDependencyReport};
use crate::errors::{analyze_errors, ErrorReport};
use crate::timeline::{analyze_timeline, TimelineReport};

/// The analytical views selectable through `analyzeTracePerformance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisKind {
    Bottlenecks,
    Errors,
    Timeline,
    Dependencies,
}

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Bottlenecks => "bottlenecks",
            AnalysisKind::Errors => "errors",
            AnalysisKind::Timeline => "timeline",
            AnalysisKind::Dependencies => "dependencies",
        }
    }

    /// Run this view over an export.
    ///
    /// `Dependencies` runs the resolved form; the aggregate census stays
    /// available as [`crate::analyze_dependency_edges`] for callers that
    /// want structural counts.
    pub fn run(self, export: &Value) -> AnalysisReport {
        match self {
            AnalysisKind::Bottlenecks => AnalysisReport::Bottlenecks(analyze_bottlenecks(export)),
            AnalysisKind::Errors => AnalysisReport::Errors(analyze_errors(export)),
            AnalysisKind::Timeline => AnalysisReport::Timeline(analyze_timeline(export)),
            AnalysisKind::Dependencies => {
                AnalysisReport::Dependencies(resolve_service_dependencies(export))
            }
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Analysis type string the host passed that names no known view.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown analysis type: {0:?}")]
pub struct UnknownAnalysisKind(pub String);

impl FromStr for AnalysisKind {
    type Err = UnknownAnalysisKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bottlenecks" => Ok(AnalysisKind::Bottlenecks),
            "errors" => Ok(AnalysisKind::Errors),
            "timeline" => Ok(AnalysisKind::Timeline),
            "dependencies" => Ok(AnalysisKind::Dependencies),
            other => Err(UnknownAnalysisKind(other.to_string())),
        }
    }
}

/// Result of one `analyzeTracePerformance` call.
///
/// Serializes untagged, so the JSON handed to the renderer is exactly the
/// per-kind report shape, or `{"error": ...}` for the unknown case.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisReport {
    Bottlenecks(BottleneckReport),
    Errors(ErrorReport),
    Timeline(TimelineReport),
    Dependencies(ServiceDependencyReport),
    Unknown { error: String },
}

/// Dispatch an analysis request from the host's string-typed arguments.
pub fn analyze_trace_performance(analysis_type: &str, export: &Value) -> AnalysisReport {
    match analysis_type.parse::<AnalysisKind>() {
        Ok(kind) => kind.run(export),
        Err(err) => {
            warn!("{}", err);
            AnalysisReport::Unknown {
                error: "Unknown analysis type".to_string(),
            }
        }
    }
}
