//! Append-only outcome log for a single harness run.
//!
//! The recorder takes outcomes in arrival order and derives per-problem
//! tallies on demand. Problem ids are used exactly as given; turning legacy
//! `<id>_solN` keys into `(id, N)` pairs happens before outcomes reach it
//! (see [`crate::ingest`]).

use std::collections::BTreeMap;

use crate::aggregator::{aggregate_tallies, AggregationConfig};
use crate::domain::{CorpusReport, ProblemId, ProblemTally, Result, SampleOutcome};
use crate::metrics::{Counter, METRICS};
use crate::obs;

/// Records sample outcomes for one run.
#[derive(Debug, Clone, Default)]
pub struct OutcomeRecorder {
    outcomes: Vec<SampleOutcome>,
}

impl OutcomeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an outcome.
    ///
    /// Duplicate `sample_index` values within a problem are kept as-is.
    /// Returns the outcome's sequence number in the log.
    pub fn record(&mut self, outcome: SampleOutcome) -> usize {
        let seq = self.outcomes.len();
        obs::emit_outcome_recorded(
            outcome.problem_id.as_str(),
            outcome.sample_index,
            outcome.passed,
            seq,
        );
        METRICS.incr(Counter::OutcomesRecorded);
        self.outcomes.push(outcome);
        seq
    }

    /// Per-problem `(samples, correct)` counts, ordered by problem id.
    pub fn tallies(&self) -> BTreeMap<ProblemId, ProblemTally> {
        let mut tallies: BTreeMap<ProblemId, ProblemTally> = BTreeMap::new();
        for outcome in &self.outcomes {
            let tally = tallies.entry(outcome.problem_id.clone()).or_default();
            tally.samples += 1;
            if outcome.passed {
                tally.correct += 1;
            }
        }
        tallies
    }

    /// Build the corpus report from the current log.
    pub fn report(&self, config: &AggregationConfig) -> Result<CorpusReport> {
        aggregate_tallies(&self.tallies(), config)
    }

    /// All outcomes in arrival order.
    pub fn outcomes(&self) -> &[SampleOutcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

impl Extend<SampleOutcome> for OutcomeRecorder {
    fn extend<I: IntoIterator<Item = SampleOutcome>>(&mut self, iter: I) {
        for outcome in iter {
            self.record(outcome);
        }
    }
}

impl FromIterator<SampleOutcome> for OutcomeRecorder {
    fn from_iter<I: IntoIterator<Item = SampleOutcome>>(iter: I) -> Self {
        let mut recorder = Self::new();
        recorder.extend(iter);
        recorder
    }
}
