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

//! Error analysis: errored spans and their per-service distribution.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use traceboard_core::walk_spans;

use crate::MAX_ERRORS;

/// One errored span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub name: String,
    pub service: String,
    pub message: String,
}

/// Error view over one trace export.
///
/// `errorByService` covers every service with at least one error, so
/// `sum(errorByService.values()) == totalErrors` always holds, even though
/// the record list is capped at [`MAX_ERRORS`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub total_errors: usize,
    pub errors: Vec<ErrorRecord>,
    pub error_by_service: BTreeMap<String, u64>,
}

/// Collect errored spans in encounter order.
pub fn analyze_errors(export: &Value) -> ErrorReport {
    let mut report = ErrorReport::default();
    for span in walk_spans(export) {
        if !span.error {
            continue;
        }
        report.total_errors += 1;
        *report.error_by_service.entry(span.service.clone()).or_insert(0) += 1;
        if report.errors.len() < MAX_ERRORS {
            report.errors.push(ErrorRecord {
                name: span.display_name().to_string(),
                message: span
                    .status_message
                    .clone()
                    .unwrap_or_else(|| "Unknown error".to_string()),
                service: span.service,
            });
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn export_with_errors() -> Value {
        json!([
            {
                "resourceSpans": [
                    {
                        "resource": {"attributes": {"service.name": "api"}},
                        "scopeSpans": [{"spans": [
                            {"name": "login", "status": {"code": 2, "message": "bad credentials"}},
                            {"name": "fetch", "status": {"code": 1}},
                            {"name": "save", "status": {"code": "STATUS_CODE_ERROR"}}
                        ]}]
                    },
                    {
                        "resource": {"attributes": {"service.name": "worker"}},
                        "scopeSpans": [{"spans": [
                            {"name": "job", "status": {"code": 2}}
                        ]}]
                    }
                ]
            }
        ])
    }

    #[test]
    fn test_both_encodings_and_message_default() {
        let report = analyze_errors(&export_with_errors());
        assert_eq!(report.total_errors, 3);
        assert_eq!(report.errors[0].message, "bad credentials");
        assert_eq!(report.errors[1].name, "save");
        assert_eq!(report.errors[1].message, "Unknown error");
        assert_eq!(report.errors[2].service, "worker");
    }

    #[test]
    fn test_counts_cover_all_services() {
        let report = analyze_errors(&export_with_errors());
        assert_eq!(report.error_by_service.get("api"), Some(&2));
        assert_eq!(report.error_by_service.get("worker"), Some(&1));
        let summed: u64 = report.error_by_service.values().sum();
        assert_eq!(summed, report.total_errors as u64);
    }

    #[test]
    fn test_record_list_is_capped_counts_are_not() {
        let spans: Vec<Value> = (0..25)
            .map(|i| json!({"name": format!("op-{}", i), "status": {"code": 2}}))
            .collect();
        let export = json!([
            {"resourceSpans": [{
                "resource": {"attributes": {"service.name": "svc"}},
                "scopeSpans": [{"spans": spans}]
            }]}
        ]);
        let report = analyze_errors(&export);
        assert_eq!(report.total_errors, 25);
        assert_eq!(report.errors.len(), MAX_ERRORS);
        assert_eq!(report.errors[0].name, "op-0");
        assert_eq!(report.error_by_service.get("svc"), Some(&25));
    }

    #[test]
    fn test_zero_value_shape() {
        assert_eq!(analyze_errors(&json!(null)), ErrorReport::default());
        assert_eq!(analyze_errors(&json!([])), ErrorReport::default());
    }
}
