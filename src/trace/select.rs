//! Critical-path selection: the slowest entity at a level, and how its peers did.

use super::model::TraceGroup;
use crate::value::TraceValue;

/// Outcome of [`select_slowest`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slowest<'a, T> {
    pub count: usize,
    pub slowest: Option<&'a T>,
    /// Mean duration of everything but the slowest. With a single item this
    /// is the remainder (zero) and callers should not report it.
    pub others_ms: f64,
}

/// Find the longest-running item and the average of the rest in one pass.
///
/// Ties go to the first item in order.
pub fn select_slowest<'a, T>(items: &'a [T], duration_ms: impl Fn(&T) -> f64) -> Slowest<'a, T> {
    let mut slowest = None;
    let mut slowest_ms = 0.0;
    let mut total_ms = 0.0;
    for item in items {
        let ms = duration_ms(item);
        total_ms += ms;
        if slowest.is_none() || ms > slowest_ms {
            slowest = Some(item);
            slowest_ms = ms;
        }
    }
    let mut others_ms = total_ms - slowest_ms;
    if items.len() > 1 {
        others_ms /= (items.len() - 1) as f64;
    }
    Slowest {
        count: items.len(),
        slowest,
        others_ms,
    }
}

/// Index of the group with the longest back-end time.
///
/// Unlike [`select_slowest`] this starts from zero rather than the first
/// group, so if no group reports a positive duration the first is chosen.
/// No peer average is computed at this level.
pub fn select_slowest_group<V: TraceValue>(groups: &[TraceGroup<V>]) -> usize {
    let mut slowest_index = 0;
    let mut max_ms = 0.0;
    for (i, group) in groups.iter().enumerate() {
        let ms = group.duration_ms();
        if ms > max_ms {
            max_ms = ms;
            slowest_index = i;
        }
    }
    slowest_index
}
