//! Structured observability hooks for the evaluation pipeline.
//!
//! Every emitter tags its event with an `event = "..."` field so log
//! pipelines can filter on it. Verbosity follows `RUST_LOG`; JSON output is
//! selected at [`crate::telemetry::init_tracing`].

use tracing::{debug, info, warn};

/// RAII guard that enters a run-scoped tracing span.
///
/// ```ignore
/// let _span = RunSpan::enter("3f0c...");
/// // every event below carries run_id = "3f0c..."
/// ```
pub struct RunSpan {
    _span: tracing::span::EnteredSpan,
}

impl RunSpan {
    /// Create and enter a span tagged with the run_id.
    pub fn enter(run_id: &str) -> Self {
        let span = tracing::info_span!("alloy_eval.run", run_id = %run_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: one sample outcome appended to the recorder.
pub fn emit_outcome_recorded(problem_id: &str, sample_index: usize, passed: bool, seq: usize) {
    debug!(
        event = "outcome.recorded",
        problem_id = %problem_id,
        sample_index = sample_index,
        passed = passed,
        seq = seq,
    );
}

/// Emit event: a requested k exceeded the sample budget and was skipped.
pub fn emit_k_skipped(k: usize, sample_budget: usize) {
    warn!(
        event = "pass_at_k.skipped",
        k = k,
        sample_budget = sample_budget,
        "k is larger than the number of samples, skipping"
    );
}

/// Emit event: a problem has fewer samples than k.
pub fn emit_undersampled_problem(problem_id: &str, samples: usize, k: usize) {
    warn!(
        event = "report.undersampled_problem",
        problem_id = %problem_id,
        samples = samples,
        k = k,
    );
}

/// Emit event: corpus mean computed for one k.
pub fn emit_pass_at_k_computed(k: usize, problems: usize, mean: f64) {
    info!(
        event = "pass_at_k.computed",
        k = k,
        problems = problems,
        mean = mean,
    );
}

/// Emit event: corpus report assembled.
pub fn emit_report_built(total_samples: usize, total_correct: usize, ks: usize, skipped: usize) {
    info!(
        event = "report.built",
        total_samples = total_samples,
        total_correct = total_correct,
        pass_at_k_reports = ks,
        skipped_k = skipped,
    );
}
