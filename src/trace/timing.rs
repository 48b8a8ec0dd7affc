//! Overall query timing from the root of the result.

use crate::value::TraceValue;

/// Top-level timing, converted from seconds to milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub query_ms: f64,
    pub summary_ms: f64,
    pub total_ms: f64,
}

impl Timing {
    /// Time not accounted for by query and summary fetch.
    ///
    /// Negative when the source reports more query+summary time than total;
    /// shown as-is.
    pub fn other_ms(&self) -> f64 {
        self.total_ms - self.query_ms - self.summary_ms
    }
}

/// `None` when the root has no `timing` section.
pub fn extract_timing<V: TraceValue>(root: &V) -> Option<Timing> {
    let obj = root.field("timing");
    if !obj.valid() {
        return None;
    }
    Some(Timing {
        query_ms: obj.field("querytime").as_double() * 1000.0,
        summary_ms: obj.field("summaryfetchtime").as_double() * 1000.0,
        total_ms: obj.field("searchtime").as_double() * 1000.0,
    })
}
