//! Sample outcomes and the per-problem tallies derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::{EvalError, Result};

/// Opaque identity of a benchmark problem (e.g. a predicate name, possibly
/// domain-prefixed).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProblemId(String);

impl ProblemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProblemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProblemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProblemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One evaluation of one generated candidate for one problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleOutcome {
    /// Problem this candidate was generated for.
    pub problem_id: ProblemId,

    /// Position of the candidate within the problem's sample set.
    pub sample_index: usize,

    /// Verdict reported by the analyzer.
    pub passed: bool,

    /// Failure detail, e.g. "Counterexample found" or "No solution generated".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl SampleOutcome {
    /// A passing outcome.
    pub fn passed(problem_id: impl Into<ProblemId>, sample_index: usize) -> Self {
        Self {
            problem_id: problem_id.into(),
            sample_index,
            passed: true,
            error_detail: None,
        }
    }

    /// A failing outcome without detail.
    pub fn failed(problem_id: impl Into<ProblemId>, sample_index: usize) -> Self {
        Self {
            problem_id: problem_id.into(),
            sample_index,
            passed: false,
            error_detail: None,
        }
    }

    /// Attach an error detail.
    pub fn with_error(mut self, detail: impl Into<String>) -> Self {
        self.error_detail = Some(detail.into());
        self
    }
}

/// Sufficient statistics for one problem: samples drawn and samples correct.
///
/// # Invariants
///
/// `correct <= samples`. Tallies built by the recorder always satisfy this;
/// [`ProblemTally::validate`] checks tallies that arrive from elsewhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemTally {
    pub samples: usize,
    pub correct: usize,
}

impl ProblemTally {
    pub fn new(samples: usize, correct: usize) -> Self {
        Self { samples, correct }
    }

    /// Fail with [`EvalError::CorruptedTally`] when `correct > samples`.
    pub fn validate(&self, problem_id: &ProblemId) -> Result<()> {
        if self.correct > self.samples {
            return Err(EvalError::CorruptedTally {
                problem_id: problem_id.to_string(),
                samples: self.samples,
                correct: self.correct,
            });
        }
        Ok(())
    }
}
