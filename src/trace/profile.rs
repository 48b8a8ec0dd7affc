//! Profiler output embedded in traces.
//!
//! The search backend emits profiles either as a tree (`roots`, each node
//! with `children`) or as a flat list (`flat`). Both are read into a
//! [`PerformanceProfile`]: a depth-first list of samples.
//!
//! [`QueryPerf`] regroups samples per query tree node. Sample names look like
//! `/0/1/AndBlueprint/fetchPostings`: the numeric prefix is the node's path
//! in the query tree, then the component type, then the operation. Query setup
//! and matching both use that path, so a thread's matching cost can be
//! imported next to the setup cost of the same node.

use indexmap::IndexMap;

use super::model::ThreadTrace;
use crate::value::TraceValue;

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSample {
    pub name: String,
    /// Nesting depth in the profile tree; 0 for roots and flat entries.
    pub depth: usize,
    pub count: i64,
    pub total_ms: f64,
    pub self_ms: f64,
}

/// Named time breakdown from one profiler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceProfile {
    pub total_ms: f64,
    pub samples: Vec<ProfileSample>,
}

impl PerformanceProfile {
    /// Read a profile entry. Absent entries give an empty profile.
    pub fn extract<V: TraceValue>(entry: &V) -> Self {
        let mut samples = Vec::new();
        let roots = entry.field("roots");
        if roots.valid() {
            collect_tree(&roots, 0, &mut samples);
        } else {
            for item in entry.field("flat").entries() {
                let self_ms = item.field("self_time_ms").as_double();
                samples.push(ProfileSample {
                    name: item.field("name").as_string(),
                    depth: 0,
                    count: item.field("count").as_long(),
                    total_ms: self_ms,
                    self_ms,
                });
            }
        }
        Self {
            total_ms: entry.field("total_time_ms").as_double(),
            samples,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

fn collect_tree<V: TraceValue>(nodes: &V, depth: usize, samples: &mut Vec<ProfileSample>) {
    for node in nodes.entries() {
        samples.push(ProfileSample {
            name: node.field("name").as_string(),
            depth,
            count: node.field("count").as_long(),
            total_ms: node.field("total_time_ms").as_double(),
            self_ms: node.field("self_time_ms").as_double(),
        });
        collect_tree(&node.field("children"), depth + 1, samples);
    }
}

/// Cost attributed to one query tree node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePerf {
    /// Component types seen for this node, in encounter order.
    pub types: Vec<String>,
    pub seeks: i64,
    pub setup_ms: f64,
    pub seek_ms: f64,
    pub unpack_ms: f64,
    pub other_ms: f64,
}

impl NodePerf {
    fn add_type(&mut self, ty: &str) {
        if !self.types.iter().any(|t| t == ty) {
            self.types.push(ty.to_string());
        }
    }
}

/// Per-node view of query setup, optionally merged with one thread's matching.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPerf {
    pub nodes: IndexMap<String, NodePerf>,
}

impl QueryPerf {
    /// Seed from a `query_profiling` profile; every operation counts as setup.
    pub fn from_profile(profile: &PerformanceProfile) -> Self {
        let mut perf = Self::default();
        for sample in &profile.samples {
            if let Some((path, ty, _op)) = split_sample_name(&sample.name) {
                let node = perf.nodes.entry(path).or_default();
                node.add_type(ty);
                node.setup_ms += sample.self_ms;
            }
        }
        perf
    }

    /// Merge the matching cost of `thread` into this view.
    pub fn import_match_perf(&mut self, thread: &ThreadTrace) {
        for sample in &thread.match_perf.samples {
            let Some((path, ty, op)) = split_sample_name(&sample.name) else {
                continue;
            };
            let node = self.nodes.entry(path).or_default();
            node.add_type(ty);
            match op {
                "doSeek" => {
                    node.seeks += sample.count;
                    node.seek_ms += sample.self_ms;
                }
                "doUnpack" => node.unpack_ms += sample.self_ms,
                _ => node.other_ms += sample.self_ms,
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Split `/0/1/Type/op` into (`/0/1`, `Type`, `op`).
fn split_sample_name(name: &str) -> Option<(String, &str, &str)> {
    let segments: Vec<&str> = name.strip_prefix('/')?.split('/').collect();
    let numeric = segments
        .iter()
        .take_while(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
        .count();
    match &segments[numeric..] {
        [ty, op] if numeric > 0 && !ty.is_empty() && !op.is_empty() => {
            let path: String = segments[..numeric].iter().map(|s| format!("/{s}")).collect();
            Some((path, *ty, *op))
        }
        _ => None,
    }
}
