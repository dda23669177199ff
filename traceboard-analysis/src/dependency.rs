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

//! Service dependency views reconstructed from parent-span back-references.
//!
//! Two views exist because the callers want different things: the aggregate
//! form is a cheap structural census (who was called, how often, which spans
//! have parents), the resolved form actually chases each `parentSpanId` to
//! the service that owns it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use traceboard_core::{walk_service_spans, walk_spans, SpanRecord};

use crate::MAX_DEPENDENCY_EDGES;

/// Structural parent-child edge. The parent span is not resolved to a
/// service; the edge only records that the span has one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Always `"Parent Operation"`.
    pub from: String,
    pub to: String,
    pub service: String,
    /// Always `"parent-child"`.
    #[serde(rename = "type")]
    pub edge_type: String,
}

/// Aggregate dependency view over one trace export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEdgesReport {
    pub total_services: usize,
    pub dependencies: Vec<DependencyEdge>,
    pub service_call_count: BTreeMap<String, u64>,
}

/// Census of services and parent-child structure.
///
/// `serviceCallCount` increments once per ResourceSpan (not per span); the
/// edge list keeps the first [`MAX_DEPENDENCY_EDGES`] in document order.
pub fn analyze_dependency_edges(export: &Value) -> DependencyEdgesReport {
    let mut report = DependencyEdgesReport::default();
    for group in walk_service_spans(export) {
        *report.service_call_count.entry(group.service.clone()).or_insert(0) += 1;
        for span in group.spans {
            if span.parent_span_id.is_none() {
                continue;
            }
            if report.dependencies.len() < MAX_DEPENDENCY_EDGES {
                report.dependencies.push(DependencyEdge {
                    from: "Parent Operation".to_string(),
                    to: span.display_name().to_string(),
                    service: group.service.clone(),
                    edge_type: "parent-child".to_string(),
                });
            }
        }
    }
    report.total_services = report.service_call_count.len();
    report
}

/// A service and the distinct parent services it depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDependencies {
    pub service: String,
    pub dependencies: Vec<String>,
}

/// Resolved dependency view over one trace export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDependencyReport {
    pub dependencies: Vec<ServiceDependencies>,
    pub total_services: usize,
}

/// Resolve which services each service depends on.
///
/// Every service owning at least one span appears, in first-encounter
/// order, possibly with an empty list. For each span carrying a
/// `parentSpanId`, the parent's owning service is found by a full linear
/// re-scan of the export in document order; the first span with a matching
/// id wins. A service never depends on itself and each parent appears once.
///
/// The re-scan makes this O(N^2) in span count. Fine at demo scale; an id
/// index would be linear but has to reproduce the first-match semantics
/// under duplicate span ids, so the scan stays until someone needs it gone.
pub fn resolve_service_dependencies(export: &Value) -> ServiceDependencyReport {
    let spans = walk_spans(export);
    let mut services: Vec<ServiceDependencies> = Vec::new();

    for span in &spans {
        let position = match services.iter().position(|entry| entry.service == span.service) {
            Some(position) => position,
            None => {
                services.push(ServiceDependencies {
                    service: span.service.clone(),
                    dependencies: Vec::new(),
                });
                services.len() - 1
            }
        };

        let Some(parent_id) = span.parent_span_id.as_deref() else {
            continue;
        };
        let Some(parent_service) = find_service_by_span_id(&spans, parent_id) else {
            continue;
        };
        if parent_service != span.service
            && !services[position].dependencies.iter().any(|dep| dep == parent_service)
        {
            let parent_service = parent_service.to_string();
            services[position].dependencies.push(parent_service);
        }
    }

    ServiceDependencyReport {
        total_services: services.len(),
        dependencies: services,
    }
}

/// Owning service of the first span with the given id, in document order.
fn find_service_by_span_id<'a>(spans: &'a [SpanRecord], span_id: &str) -> Option<&'a str> {
    spans
        .iter()
        .find(|span| span.span_id.as_deref() == Some(span_id))
        .map(|span| span.service.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn two_service_export() -> Value {
        json!([
            {
                "resourceSpans": [
                    {
                        "resource": {"attributes": {"service.name": "svc1"}},
                        "scopeSpans": [{"spans": [
                            {"name": "root", "spanId": "b"}
                        ]}]
                    },
                    {
                        "resource": {"attributes": {"service.name": "svc2"}},
                        "scopeSpans": [{"spans": [
                            {"name": "child", "spanId": "c", "parentSpanId": "b"},
                            {"name": "sibling", "spanId": "d", "parentSpanId": "c"}
                        ]}]
                    }
                ]
            }
        ])
    }

    #[test]
    fn test_resolved_cross_service_dependency() {
        let report = resolve_service_dependencies(&two_service_export());
        assert_eq!(report.total_services, 2);
        assert_eq!(report.dependencies[0].service, "svc1");
        assert!(report.dependencies[0].dependencies.is_empty());
        assert_eq!(report.dependencies[1].service, "svc2");
        assert_eq!(report.dependencies[1].dependencies, vec!["svc1"]);
    }

    #[test]
    fn test_self_loops_excluded_and_no_duplicates() {
        // "sibling" depends on "child" within svc2: a self-loop, excluded.
        let report = resolve_service_dependencies(&two_service_export());
        let svc2 = &report.dependencies[1];
        assert!(!svc2.dependencies.contains(&"svc2".to_string()));

        // Several children of the same foreign parent add it once.
        let export = json!([
            {"resourceSpans": [
                {
                    "resource": {"attributes": {"service.name": "up"}},
                    "scopeSpans": [{"spans": [{"name": "p", "spanId": "p1"}]}]
                },
                {
                    "resource": {"attributes": {"service.name": "down"}},
                    "scopeSpans": [{"spans": [
                        {"name": "c1", "spanId": "x", "parentSpanId": "p1"},
                        {"name": "c2", "spanId": "y", "parentSpanId": "p1"}
                    ]}]
                }
            ]}
        ]);
        let report = resolve_service_dependencies(&export);
        assert_eq!(report.dependencies[1].dependencies, vec!["up"]);
    }

    #[test]
    fn test_duplicate_span_ids_resolve_to_first_match() {
        let export = json!([
            {"resourceSpans": [
                {
                    "resource": {"attributes": {"service.name": "first"}},
                    "scopeSpans": [{"spans": [{"name": "dup", "spanId": "same"}]}]
                },
                {
                    "resource": {"attributes": {"service.name": "second"}},
                    "scopeSpans": [{"spans": [{"name": "dup", "spanId": "same"}]}]
                },
                {
                    "resource": {"attributes": {"service.name": "leaf"}},
                    "scopeSpans": [{"spans": [{"name": "c", "spanId": "z", "parentSpanId": "same"}]}]
                }
            ]}
        ]);
        let report = resolve_service_dependencies(&export);
        assert_eq!(report.dependencies[2].service, "leaf");
        assert_eq!(report.dependencies[2].dependencies, vec!["first"]);
    }

    #[test]
    fn test_unresolvable_parent_adds_nothing() {
        let export = json!([
            {"resourceSpans": [{
                "resource": {"attributes": {"service.name": "only"}},
                "scopeSpans": [{"spans": [
                    {"name": "orphan", "spanId": "o", "parentSpanId": "ghost"}
                ]}]
            }]}
        ]);
        let report = resolve_service_dependencies(&export);
        assert_eq!(report.total_services, 1);
        assert!(report.dependencies[0].dependencies.is_empty());
    }

    #[test]
    fn test_aggregate_edges_and_call_counts() {
        let report = analyze_dependency_edges(&two_service_export());
        assert_eq!(report.total_services, 2);
        assert_eq!(report.service_call_count.get("svc1"), Some(&1));
        assert_eq!(report.service_call_count.get("svc2"), Some(&1));
        assert_eq!(report.dependencies.len(), 2);
        assert_eq!(report.dependencies[0].from, "Parent Operation");
        assert_eq!(report.dependencies[0].to, "child");
        assert_eq!(report.dependencies[0].service, "svc2");
        assert_eq!(report.dependencies[0].edge_type, "parent-child");
    }

    #[test]
    fn test_aggregate_counts_resource_spans_not_spans() {
        let export = json!([
            {"resourceSpans": [
                {
                    "resource": {"attributes": {"service.name": "svc"}},
                    "scopeSpans": [{"spans": [
                        {"name": "a"}, {"name": "b"}, {"name": "c"}
                    ]}]
                },
                {"resource": {"attributes": {"service.name": "svc"}}}
            ]}
        ]);
        let report = analyze_dependency_edges(&export);
        assert_eq!(report.service_call_count.get("svc"), Some(&2));
    }

    #[test]
    fn test_aggregate_edge_list_is_capped() {
        let spans: Vec<Value> = (0..30)
            .map(|i| json!({"name": format!("op-{}", i), "spanId": format!("s{}", i), "parentSpanId": "root"}))
            .collect();
        let export = json!([
            {"resourceSpans": [{
                "resource": {"attributes": {"service.name": "svc"}},
                "scopeSpans": [{"spans": spans}]
            }]}
        ]);
        let report = analyze_dependency_edges(&export);
        assert_eq!(report.dependencies.len(), MAX_DEPENDENCY_EDGES);
        assert_eq!(report.dependencies[0].to, "op-0");
    }

    #[test]
    fn test_zero_value_shapes() {
        assert_eq!(analyze_dependency_edges(&json!(null)), DependencyEdgesReport::default());
        assert_eq!(
            resolve_service_dependencies(&json!([])),
            ServiceDependencyReport::default()
        );
    }
}
