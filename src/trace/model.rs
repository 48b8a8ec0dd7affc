//! Typed views over the trace tree: content node traces, their matching
//! threads, and the searches (groups) they answered.

use super::profile::{PerformanceProfile, QueryPerf};
use super::timeline::Timeline;
use crate::value::TraceValue;

/// Execution trace of one content node.
#[derive(Debug, Clone)]
pub struct NodeTrace<V> {
    pub distribution_key: i64,
    pub document_type: String,
    root: V,
    timeline: Timeline,
}

impl<V: TraceValue> NodeTrace<V> {
    pub fn new(root: V) -> Self {
        let timeline = Timeline::extract(&root.field("traces"));
        Self {
            distribution_key: root.field("distribution-key").as_long(),
            document_type: root.field("document-type").as_string(),
            root,
            timeline,
        }
    }

    /// Reported `duration_ms`, else the last timeline timestamp.
    pub fn duration_ms(&self) -> f64 {
        let reported = self.root.field("duration_ms");
        if reported.valid() {
            return reported.as_double();
        }
        self.timeline.last_timestamp_ms().unwrap_or(0.0)
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Matching threads, numbered by position.
    pub fn find_thread_traces(&self) -> Vec<ThreadTrace> {
        let Some(execution) = find_tag(&self.root.field("traces"), "query_execution") else {
            return Vec::new();
        };
        execution
            .field("threads")
            .entries()
            .iter()
            .enumerate()
            .map(|(id, thread)| ThreadTrace::new(id, thread))
            .collect()
    }

    /// Query setup cost per query tree node.
    pub fn extract_query(&self) -> QueryPerf {
        let profile = find_tag(&self.root.field("traces"), "query_profiling")
            .map(|entry| PerformanceProfile::extract(&entry))
            .unwrap_or_default();
        QueryPerf::from_profile(&profile)
    }

    /// The optimized blueprint tree, if the node traced it.
    pub fn execution_plan(&self) -> Option<V> {
        find_tag(&self.root.field("traces"), "query_execution_plan")
            .map(|entry| entry.field("optimized"))
            .filter(|plan| plan.valid())
    }
}

/// One matching/ranking thread within a content node.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadTrace {
    pub id: usize,
    pub timeline: Timeline,
    pub match_perf: PerformanceProfile,
    pub first_phase_perf: PerformanceProfile,
    pub second_phase_perf: PerformanceProfile,
}

impl ThreadTrace {
    pub fn new<V: TraceValue>(id: usize, thread: &V) -> Self {
        let traces = thread.field("traces");
        let profile = |tag: &str| {
            find_tag(&traces, tag)
                .map(|entry| PerformanceProfile::extract(&entry))
                .unwrap_or_default()
        };
        Self {
            id,
            timeline: Timeline::extract(&traces),
            match_perf: profile("match_profiling"),
            first_phase_perf: profile("first_phase_profiling"),
            second_phase_perf: profile("second_phase_profiling"),
        }
    }

    pub fn match_time_ms(&self) -> f64 {
        self.match_perf.total_ms
    }

    pub fn first_phase_time_ms(&self) -> f64 {
        self.first_phase_perf.total_ms
    }

    pub fn second_phase_time_ms(&self) -> f64 {
        self.second_phase_perf.total_ms
    }

    /// Total profiled time; what thread selection ranks by.
    pub fn prof_time_ms(&self) -> f64 {
        self.match_time_ms() + self.first_phase_time_ms() + self.second_phase_time_ms()
    }
}

/// Content node traces answering one search.
#[derive(Debug, Clone)]
pub struct TraceGroup<V> {
    pub id: usize,
    pub traces: Vec<NodeTrace<V>>,
}

impl<V: TraceValue> TraceGroup<V> {
    /// The slowest node bounds the back-end time.
    pub fn duration_ms(&self) -> f64 {
        self.traces
            .iter()
            .map(NodeTrace::duration_ms)
            .fold(0.0, f64::max)
    }

    pub fn document_type(&self) -> &str {
        self.traces
            .first()
            .map(|t| t.document_type.as_str())
            .unwrap_or("")
    }

    /// Accepts `trace` unless it belongs to another search: a different
    /// document type, or a node that already answered this one.
    fn try_add(&mut self, trace: NodeTrace<V>) -> Result<(), NodeTrace<V>> {
        let same_search = trace.document_type == self.document_type()
            && self
                .traces
                .iter()
                .all(|t| t.distribution_key != trace.distribution_key);
        if same_search {
            self.traces.push(trace);
            Ok(())
        } else {
            Err(trace)
        }
    }
}

/// Every node trace in the tree, in document order.
///
/// An object with both `distribution-key` and `document-type` is a node
/// trace; the search does not descend into it.
pub fn find_node_traces<V: TraceValue>(root: &V) -> Vec<NodeTrace<V>> {
    let mut traces = Vec::new();
    collect_node_traces(root, &mut traces);
    log::debug!("Found {} content node traces", traces.len());
    traces
}

fn collect_node_traces<V: TraceValue>(value: &V, traces: &mut Vec<NodeTrace<V>>) {
    if value.field("distribution-key").valid() && value.field("document-type").valid() {
        traces.push(NodeTrace::new(value.clone()));
        return;
    }
    for (_, child) in value.fields() {
        collect_node_traces(&child, traces);
    }
    for child in value.entries() {
        collect_node_traces(&child, traces);
    }
}

/// Split node traces into searches, keeping encounter order.
pub fn group_node_traces<V: TraceValue>(traces: Vec<NodeTrace<V>>) -> Vec<TraceGroup<V>> {
    let mut groups: Vec<TraceGroup<V>> = Vec::new();
    for trace in traces {
        let rejected = match groups.last_mut() {
            Some(group) => group.try_add(trace).err(),
            None => Some(trace),
        };
        if let Some(trace) = rejected {
            groups.push(TraceGroup {
                id: groups.len(),
                traces: vec![trace],
            });
        }
    }
    log::debug!("Grouped node traces into {} searches", groups.len());
    groups
}

/// First entry tagged `tag` in a `traces` array, searching nested sections.
pub(crate) fn find_tag<V: TraceValue>(traces: &V, tag: &str) -> Option<V> {
    for entry in traces.entries() {
        if entry.field("tag").as_string() == tag {
            return Some(entry);
        }
        let nested = entry.field("traces");
        if nested.valid()
            && let Some(found) = find_tag(&nested, tag)
        {
            return Some(found);
        }
    }
    None
}
