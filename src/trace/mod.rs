//! Query trace analysis.
//!
//! Reads the trace a distributed search backend attaches to a query result
//! and reports the critical path: which search, which content node and which
//! matching thread took the longest, with per-stage timing and profiler
//! breakdowns for the slowest of each.
//!
//! The tree is read through [`crate::value::TraceValue`], so the analysis
//! works on any parsed document that can be adapted to it.
//!
//! # Usage
//!
//! ```ignore
//! use tracedoctor::trace::Context;
//! use tracedoctor::value::JsonValue;
//!
//! let doc: serde_json::Value = serde_json::from_str(&input)?;
//! Context::new(JsonValue::new(&doc)).analyze(std::io::stdout().lock())?;
//! ```

pub mod analyze;
pub mod ann;
pub mod display;
pub mod model;
pub mod output;
pub mod profile;
pub mod select;
pub mod timeline;
pub mod timing;

// Re-export main types for convenience
pub use analyze::Context;
pub use model::{NodeTrace, ThreadTrace, TraceGroup, find_node_traces, group_node_traces};
pub use select::{Slowest, select_slowest, select_slowest_group};
pub use timing::{Timing, extract_timing};
