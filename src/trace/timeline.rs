//! Timestamped events of a node or thread trace.

use crate::value::TraceValue;

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEvent {
    pub label: String,
    pub timestamp_ms: f64,
}

/// Events in document order. Nested sections (e.g. `query_setup`) are
/// flattened into the sequence where they appear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    pub events: Vec<TimelineEvent>,
}

impl Timeline {
    /// Build from a `traces` array.
    pub fn extract<V: TraceValue>(traces: &V) -> Self {
        let mut events = Vec::new();
        collect_events(traces, &mut events);
        Self { events }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Timestamp of the last event.
    pub fn last_timestamp_ms(&self) -> Option<f64> {
        self.events.last().map(|e| e.timestamp_ms)
    }

    /// Time from each event to the one after it; the last event has no gap.
    pub fn gaps(&self) -> impl Iterator<Item = (&TimelineEvent, f64)> {
        self.events
            .windows(2)
            .map(|pair| (&pair[0], pair[1].timestamp_ms - pair[0].timestamp_ms))
    }
}

fn collect_events<V: TraceValue>(traces: &V, events: &mut Vec<TimelineEvent>) {
    for entry in traces.entries() {
        let event = entry.field("event");
        if event.valid() {
            events.push(TimelineEvent {
                label: event.as_string(),
                timestamp_ms: entry.field("timestamp_ms").as_double(),
            });
            continue;
        }
        // Thread traces are timelines of their own
        if entry.field("tag").as_string() == "query_execution" {
            continue;
        }
        let nested = entry.field("traces");
        if nested.valid() {
            collect_events(&nested, events);
        }
    }
}
