//! Critical-path analysis of one query trace.
//!
//! Straight-line drill-down: overall timing, then the searches, then the
//! slowest content node of the slowest search, then its slowest matching
//! thread. At every level only the single worst performer is followed; the
//! peer average is printed as context for how unusual it is.

use std::io::{self, Write};

use super::ann::AnnProbe;
use super::display::{
    render_ann, render_groups, render_profile, render_query_perf, render_thread_summary,
    render_timeline, render_timing,
};
use super::model::{NodeTrace, ThreadTrace, find_node_traces, group_node_traces};
use super::output::{Output, out};
use super::select::{select_slowest, select_slowest_group};
use super::timing::{Timing, extract_timing};
use crate::config::ReportConfig;
use crate::value::TraceValue;

/// A parsed query result ready to be analyzed.
pub struct Context<V> {
    root: V,
    timing: Option<Timing>,
    config: ReportConfig,
}

impl<V: TraceValue> Context<V> {
    pub fn new(root: V) -> Self {
        Self::with_config(root, ReportConfig::default())
    }

    pub fn with_config(root: V, config: ReportConfig) -> Self {
        let timing = extract_timing(&root);
        Self {
            root,
            timing,
            config,
        }
    }

    pub fn timing(&self) -> Option<&Timing> {
        self.timing.as_ref()
    }

    /// Write the report to `stdout`.
    ///
    /// Returns the first write error; output stops at that point.
    pub fn analyze<W: Write>(&self, stdout: W) -> io::Result<()> {
        let mut out = Output::new(stdout);
        render_timing(&mut out, self.timing.as_ref());

        let groups = group_node_traces(find_node_traces(&self.root));
        if groups.is_empty() {
            log::debug!("No content node traces; nothing to drill into");
            return out.finish();
        }

        out!(out, "found {} search{}:\n", groups.len(), suffix(groups.len(), "es"));
        render_groups(&mut out, &groups);

        let group = &groups[select_slowest_group(&groups)];
        log::debug!("Slowest search is #{} ({})", group.id, group.document_type());
        let selection = select_slowest(&group.traces, NodeTrace::duration_ms);
        if let Some(worst) = selection.slowest {
            out!(
                out,
                "slowest content node was: {}[{}]: {:.3} ms\n",
                worst.document_type,
                worst.distribution_key,
                worst.duration_ms()
            );
            if selection.count > 1 {
                out!(
                    out,
                    "(average of other content nodes for the same search was {:.3} ms)\n",
                    selection.others_ms
                );
            }
            self.analyze_node_trace(worst, &mut out);
        }
        out.finish()
    }

    fn analyze_node_trace<W: Write>(&self, trace: &NodeTrace<V>, out: &mut Output<W>) {
        if self.config.show_timelines {
            render_timeline(out, trace.timeline());
        }
        let threads = trace.find_thread_traces();
        let selection = select_slowest(&threads, ThreadTrace::prof_time_ms);
        let Some(worst) = selection.slowest else {
            log::debug!(
                "Content node {} has no thread traces",
                trace.distribution_key
            );
            return;
        };
        out!(
            out,
            "found {} thread{}, slowest matching/ranking was thread #{}: {:.3} ms\n",
            selection.count,
            suffix(selection.count, "s"),
            worst.id,
            worst.prof_time_ms()
        );
        if selection.count > 1 {
            out!(
                out,
                "(average of other threads was {:.3} ms)\n",
                selection.others_ms
            );
        }
        self.analyze_thread(trace, worst, out);

        let ann = AnnProbe::new(trace);
        if ann.impact() != 0.0 {
            render_ann(out, &ann);
        }
    }

    fn analyze_thread<W: Write>(
        &self,
        trace: &NodeTrace<V>,
        thread: &ThreadTrace,
        out: &mut Output<W>,
    ) {
        if self.config.show_timelines {
            render_timeline(out, &thread.timeline);
        }
        render_thread_summary(out, thread);

        let mut query_perf = trace.extract_query();
        query_perf.import_match_perf(thread);
        out!(
            out,
            "\nMatch profiling for thread #{} (total time was {:.3} ms):\n",
            thread.id,
            thread.match_time_ms()
        );
        render_query_perf(out, &query_perf, &self.config);

        out!(
            out,
            "\nFirst phase rank profiling for thread #{} (total time was {:.3} ms):\n",
            thread.id,
            thread.first_phase_time_ms()
        );
        render_profile(out, &thread.first_phase_perf, &self.config);

        out!(
            out,
            "\nSecond phase rank profiling for thread #{} (total time was {:.3} ms):\n",
            thread.id,
            thread.second_phase_time_ms()
        );
        render_profile(out, &thread.second_phase_perf, &self.config);
    }
}

fn suffix(count: usize, plural: &str) -> &str {
    if count == 1 { "" } else { plural }
}
