//! Report tables.
//!
//! One render function per entity. All times are milliseconds with three
//! decimals, in fixed-width columns framed by `+---+` rules.

use std::io::Write;

use super::ann::AnnProbe;
use super::model::{ThreadTrace, TraceGroup};
use super::output::{Output, out};
use super::profile::{PerformanceProfile, QueryPerf};
use super::timeline::Timeline;
use super::timing::Timing;
use crate::config::ReportConfig;
use crate::value::TraceValue;

/// Overall timing; nothing when the result had no timing section.
pub fn render_timing<W: Write>(out: &mut Output<W>, timing: Option<&Timing>) {
    let Some(t) = timing else {
        return;
    };
    out!(out, "+---------+---------------+\n");
    out!(out, "| Total   | {:10.3} ms |\n", t.total_ms);
    out!(out, "+---------+---------------+\n");
    out!(out, "| Query   | {:10.3} ms |\n", t.query_ms);
    out!(out, "| Summary | {:10.3} ms |\n", t.summary_ms);
    out!(out, "| Other   | {:10.3} ms |\n", t.other_ms());
    out!(out, "+---------+---------------+\n");
}

/// One row per search: group id, node count, back-end time, document type.
pub fn render_groups<W: Write, V: TraceValue>(out: &mut Output<W>, groups: &[TraceGroup<V>]) {
    out!(out, "+--------+-------+---------------+\n");
    out!(out, "| search | nodes | back-end time |\n");
    out!(out, "+--------+-------+---------------+\n");
    for group in groups {
        out!(
            out,
            "| {:6} | {:5} | {:10.3} ms | {}\n",
            group.id,
            group.traces.len(),
            group.duration_ms(),
            group.document_type()
        );
    }
    out!(out, "+--------+-------+---------------+\n");
}

pub fn render_timeline<W: Write>(out: &mut Output<W>, timeline: &Timeline) {
    out!(out, "+---------------+\n");
    for event in &timeline.events {
        out!(out, "| {:10.3} ms | {}\n", event.timestamp_ms, event.label);
    }
    out!(out, "+---------------+\n");
}

pub fn render_thread_summary<W: Write>(out: &mut Output<W>, thread: &ThreadTrace) {
    out!(out, "+---------------+---------------+\n");
    out!(out, "| Matching      | {:10.3} ms |\n", thread.match_time_ms());
    out!(out, "| First phase   | {:10.3} ms |\n", thread.first_phase_time_ms());
    out!(out, "| Second phase  | {:10.3} ms |\n", thread.second_phase_time_ms());
    out!(out, "+---------------+---------------+\n");
}

/// Profile samples with tree nesting shown as indentation.
pub fn render_profile<W: Write>(
    out: &mut Output<W>,
    profile: &PerformanceProfile,
    config: &ReportConfig,
) {
    if profile.is_empty() {
        out!(out, "(no profiling data)\n");
        return;
    }
    let visible: Vec<_> = profile
        .samples
        .iter()
        .filter(|s| config.profile_depth.is_none_or(|depth| s.depth < depth))
        .collect();
    let (shown, hidden) = config.limit_rows(visible.len());

    out!(out, "+------------+------------+------------+\n");
    out!(out, "|      count |   total ms |    self ms |\n");
    out!(out, "+------------+------------+------------+\n");
    for sample in &visible[..shown] {
        out!(
            out,
            "| {:>10} | {:10.3} | {:10.3} | {}{}\n",
            sample.count,
            sample.total_ms,
            sample.self_ms,
            "  ".repeat(sample.depth),
            sample.name
        );
    }
    out!(out, "+------------+------------+------------+\n");
    render_hidden(out, hidden);
}

/// Setup and matching cost per query tree node.
pub fn render_query_perf<W: Write>(out: &mut Output<W>, perf: &QueryPerf, config: &ReportConfig) {
    if perf.is_empty() {
        out!(out, "(no profiling data)\n");
        return;
    }
    let (shown, hidden) = config.limit_rows(perf.nodes.len());

    out!(out, "+------------+------------+------------+------------+------------+\n");
    out!(out, "|      seeks |   setup ms |    seek ms |  unpack ms |   other ms |\n");
    out!(out, "+------------+------------+------------+------------+------------+\n");
    for (path, node) in perf.nodes.iter().take(shown) {
        out!(
            out,
            "| {:>10} | {:10.3} | {:10.3} | {:10.3} | {:10.3} | {} {}\n",
            node.seeks,
            node.setup_ms,
            node.seek_ms,
            node.unpack_ms,
            node.other_ms,
            path,
            node.types.join(", ")
        );
    }
    out!(out, "+------------+------------+------------+------------+------------+\n");
    render_hidden(out, hidden);
}

pub fn render_ann<W: Write>(out: &mut Output<W>, probe: &AnnProbe) {
    out!(
        out,
        "\nNearest neighbor global filter took {:.3} ms ({:.1}% of content node time):\n",
        probe.impact(),
        probe.fraction() * 100.0
    );
    out!(out, "+------------+------------+\n");
    out!(out, "|       hits |  hit ratio |\n");
    out!(out, "+------------+------------+\n");
    for bp in &probe.blueprints {
        let ratio = match bp.hit_ratio {
            Some(r) => format!("{r:10.3}"),
            None => format!("{:>10}", "-"),
        };
        out!(
            out,
            "| {:>10} | {} | {} ({})\n",
            bp.target_hits,
            ratio,
            bp.attribute,
            bp.algorithm
        );
    }
    out!(out, "+------------+------------+\n");
}

fn render_hidden<W: Write>(out: &mut Output<W>, hidden: usize) {
    if hidden > 0 {
        out!(out, "({hidden} more entries not shown)\n");
    }
}
