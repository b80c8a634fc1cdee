//! Aggregated report values produced once per run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::outcome::ProblemId;

/// Pass@k estimates for a single k.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassAtKReport {
    pub k: usize,

    /// Per-problem estimate in `[0, 1]`.
    pub per_problem: BTreeMap<ProblemId, f64>,

    /// Arithmetic mean of `per_problem`.
    pub mean: f64,

    /// Problems whose own sample count was below `k`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub undersampled: Vec<ProblemId>,
}

impl PassAtKReport {
    /// Report key in the conventional `pass@k` form.
    pub fn label(&self) -> String {
        format!("pass@{}", self.k)
    }
}

/// A requested k that exceeded the sample budget and was left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedK {
    pub k: usize,
    pub sample_budget: usize,
}

/// Terminal aggregate of one harness run.
///
/// `success_rate` is `None` when `total_samples == 0`; it serializes as
/// `null` and renders as `N/A`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusReport {
    pub total_samples: usize,
    pub total_correct: usize,
    pub success_rate: Option<f64>,

    /// Budget N the k values were checked against.
    pub sample_budget: usize,

    /// One entry per surviving k, ascending.
    pub pass_at_k: Vec<PassAtKReport>,

    /// Requested k values omitted because `k > sample_budget`.
    pub skipped_k: Vec<SkippedK>,
}

impl CorpusReport {
    /// An empty-corpus report: zero totals, undefined success rate.
    pub fn empty(sample_budget: usize) -> Self {
        Self {
            total_samples: 0,
            total_correct: 0,
            success_rate: None,
            sample_budget,
            pass_at_k: Vec::new(),
            skipped_k: Vec::new(),
        }
    }

    /// Look up the report for a given k.
    pub fn pass_at(&self, k: usize) -> Option<&PassAtKReport> {
        self.pass_at_k.iter().find(|r| r.k == k)
    }

    /// Corpus means keyed as `pass@k`.
    pub fn means(&self) -> BTreeMap<String, f64> {
        self.pass_at_k.iter().map(|r| (r.label(), r.mean)).collect()
    }

    pub fn skipped_values(&self) -> Vec<usize> {
        self.skipped_k.iter().map(|s| s.k).collect()
    }
}
