//! Approximate nearest neighbor probe.
//!
//! Nearest neighbor terms that use a global filter force the content node to
//! evaluate the filter part of the query up front, before matching starts.
//! The probe finds the nearest neighbor blueprints in the node's execution
//! plan and measures the global filter step in its timeline.

use super::model::NodeTrace;
use crate::value::TraceValue;

/// A nearest neighbor term from the optimized execution plan.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnBlueprint {
    pub attribute: String,
    pub algorithm: String,
    pub target_hits: i64,
    /// Fraction of the corpus passing the global filter, if one was computed.
    pub hit_ratio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnProbe {
    pub blueprints: Vec<AnnBlueprint>,
    pub global_filter_ms: f64,
    pub node_duration_ms: f64,
}

impl AnnProbe {
    pub fn new<V: TraceValue>(trace: &NodeTrace<V>) -> Self {
        let mut blueprints = Vec::new();
        if let Some(plan) = trace.execution_plan() {
            collect_blueprints(&plan, &mut blueprints);
        }
        let global_filter_ms = trace
            .timeline()
            .gaps()
            .filter(|(event, _)| event.label.to_lowercase().contains("global filter"))
            .map(|(_, gap)| gap)
            .sum();
        Self {
            blueprints,
            global_filter_ms,
            node_duration_ms: trace.duration_ms(),
        }
    }

    /// Milliseconds the node spent on nearest neighbor global filtering.
    /// Zero when the plan has no nearest neighbor terms.
    pub fn impact(&self) -> f64 {
        if self.blueprints.is_empty() {
            0.0
        } else {
            self.global_filter_ms
        }
    }

    /// [`Self::impact`] as a fraction of the node's total time.
    pub fn fraction(&self) -> f64 {
        if self.node_duration_ms > 0.0 {
            self.impact() / self.node_duration_ms
        } else {
            0.0
        }
    }
}

fn collect_blueprints<V: TraceValue>(value: &V, out: &mut Vec<AnnBlueprint>) {
    if value
        .field("[type]")
        .as_string()
        .contains("NearestNeighborBlueprint")
    {
        let hit_ratio = value.field("global_filter").field("hit_ratio");
        out.push(AnnBlueprint {
            attribute: value.field("attribute_tensor").as_string(),
            algorithm: value.field("algorithm").as_string(),
            target_hits: value.field("target_hits").as_long(),
            hit_ratio: hit_ratio.valid().then(|| hit_ratio.as_double()),
        });
    }
    for (_, child) in value.fields() {
        collect_blueprints(&child, out);
    }
    for child in value.entries() {
        collect_blueprints(&child, out);
    }
}
