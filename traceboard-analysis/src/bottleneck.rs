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

//! Bottleneck analysis: spans slower than a fixed one-second threshold.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use traceboard_core::walk_spans;

use crate::{BOTTLENECK_THRESHOLD_NANOS, MAX_BOTTLENECKS, NANOS_PER_SECOND};

/// One span that crossed the bottleneck threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bottleneck {
    pub name: String,
    /// Seconds.
    pub duration: f64,
    pub service: String,
}

/// Bottleneck view over one trace export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BottleneckReport {
    pub total_bottlenecks: usize,
    pub bottlenecks: Vec<Bottleneck>,
}

/// Rank spans whose duration strictly exceeds [`BOTTLENECK_THRESHOLD_NANOS`].
///
/// `totalBottlenecks` counts every qualifying span; the list keeps the top
/// [`MAX_BOTTLENECKS`] by duration descending, ties in encounter order.
/// Spans without valid timing never qualify.
pub fn analyze_bottlenecks(export: &Value) -> BottleneckReport {
    let mut bottlenecks: Vec<Bottleneck> = Vec::new();
    for span in walk_spans(export) {
        let Some(duration) = span.duration_nanos() else {
            continue;
        };
        if duration > BOTTLENECK_THRESHOLD_NANOS {
            bottlenecks.push(Bottleneck {
                name: span.display_name().to_string(),
                duration: duration as f64 / NANOS_PER_SECOND,
                service: span.service,
            });
        }
    }

    let total_bottlenecks = bottlenecks.len();
    bottlenecks.sort_by(|a, b| b.duration.total_cmp(&a.duration));
    bottlenecks.truncate(MAX_BOTTLENECKS);

    BottleneckReport {
        total_bottlenecks,
        bottlenecks,
    }
}
