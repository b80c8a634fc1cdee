//! Corpus aggregation: tallies in, [`CorpusReport`] out.
//!
//! For every requested k that fits the sample budget, each problem with at
//! least one sample is estimated with its own `(n, c)` and the corpus value
//! is the arithmetic mean of those estimates. k values above the budget are
//! skipped and listed in the report.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{
    CorpusReport, EvalError, PassAtKReport, ProblemId, ProblemTally, Result, SkippedK,
};
use crate::estimator::estimate;
use crate::metrics::{Counter, METRICS};
use crate::obs;

/// Validated aggregation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationConfig {
    k_values: BTreeSet<usize>,
    sample_budget: Option<usize>,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            k_values: BTreeSet::from([1]),
            sample_budget: None,
        }
    }
}

impl AggregationConfig {
    /// Build a config from requested k values and an optional budget.
    ///
    /// An empty k list means `{1}`. Duplicates collapse. `k == 0` and a zero
    /// budget are rejected.
    pub fn new(k_values: &[usize], sample_budget: Option<usize>) -> Result<Self> {
        if let Some(k) = k_values.iter().find(|&&k| k == 0) {
            return Err(EvalError::InvalidConfig(format!(
                "k values must be >= 1, got {k}"
            )));
        }
        if sample_budget == Some(0) {
            return Err(EvalError::InvalidConfig(
                "sample budget must be >= 1".to_string(),
            ));
        }

        let k_values = if k_values.is_empty() {
            BTreeSet::from([1])
        } else {
            k_values.iter().copied().collect()
        };

        Ok(Self {
            k_values,
            sample_budget,
        })
    }

    /// Requested k values, ascending.
    pub fn k_values(&self) -> impl Iterator<Item = usize> + '_ {
        self.k_values.iter().copied()
    }

    pub fn sample_budget(&self) -> Option<usize> {
        self.sample_budget
    }

    /// Budget N used for skip decisions: the configured budget, else the
    /// largest per-problem sample count.
    pub fn resolve_budget(&self, tallies: &BTreeMap<ProblemId, ProblemTally>) -> usize {
        self.sample_budget
            .unwrap_or_else(|| tallies.values().map(|t| t.samples).max().unwrap_or(0))
    }
}

/// Aggregate per-problem tallies into a [`CorpusReport`].
///
/// Every tally is validated before anything is computed: one corrupted tally
/// aborts the whole report with [`EvalError::CorruptedTally`].
pub fn aggregate_tallies(
    tallies: &BTreeMap<ProblemId, ProblemTally>,
    config: &AggregationConfig,
) -> Result<CorpusReport> {
    for (problem_id, tally) in tallies {
        tally.validate(problem_id)?;
    }

    let total_samples: usize = tallies.values().map(|t| t.samples).sum();
    let total_correct: usize = tallies.values().map(|t| t.correct).sum();
    let sample_budget = config.resolve_budget(tallies);

    if total_samples == 0 {
        let report = CorpusReport::empty(sample_budget);
        finish(&report);
        return Ok(report);
    }

    let sampled: Vec<(&ProblemId, &ProblemTally)> =
        tallies.iter().filter(|(_, t)| t.samples > 0).collect();

    let mut pass_at_k = Vec::new();
    let mut skipped_k = Vec::new();

    for k in config.k_values() {
        if k > sample_budget {
            obs::emit_k_skipped(k, sample_budget);
            METRICS.incr(Counter::KSkipped);
            skipped_k.push(SkippedK { k, sample_budget });
            continue;
        }
        pass_at_k.push(pass_at_k_for(&sampled, k)?);
    }

    let report = CorpusReport {
        total_samples,
        total_correct,
        success_rate: Some(total_correct as f64 / total_samples as f64),
        sample_budget,
        pass_at_k,
        skipped_k,
    };
    finish(&report);
    Ok(report)
}

fn pass_at_k_for(sampled: &[(&ProblemId, &ProblemTally)], k: usize) -> Result<PassAtKReport> {
    let mut per_problem = BTreeMap::new();
    let mut undersampled = Vec::new();

    for &(problem_id, tally) in sampled {
        if tally.samples < k {
            obs::emit_undersampled_problem(problem_id.as_str(), tally.samples, k);
            undersampled.push(problem_id.clone());
        }
        let value = estimate(tally.samples, tally.correct, k)?;
        per_problem.insert(problem_id.clone(), value);
    }

    let mean = per_problem.values().sum::<f64>() / per_problem.len() as f64;
    obs::emit_pass_at_k_computed(k, per_problem.len(), mean);

    Ok(PassAtKReport {
        k,
        per_problem,
        mean,
        undersampled,
    })
}

fn finish(report: &CorpusReport) {
    METRICS.incr(Counter::ReportsBuilt);
    obs::emit_report_built(
        report.total_samples,
        report.total_correct,
        report.pass_at_k.len(),
        report.skipped_k.len(),
    );
}
