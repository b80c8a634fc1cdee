//! Per-problem failure breakdown.
//!
//! Classifies each outcome as success, counterexample or other failure and
//! counts error details. Candidates the model never produced ("No solution
//! generated") are counted separately and left out of `total`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{ProblemId, SampleOutcome};

/// Error detail recorded when generation produced no candidate.
pub const NO_SOLUTION: &str = "No solution generated";

/// Substring the analyzer collaborator uses for a refuted candidate.
pub const COUNTEREXAMPLE_MARKER: &str = "Counterexample found";

/// Coarse outcome class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeClass {
    Success,
    Counterexample,
    OtherFailure,
    NoSolution,
}

/// Classify one outcome.
pub fn classify(outcome: &SampleOutcome) -> OutcomeClass {
    let detail = outcome.error_detail.as_deref();
    if detail == Some(NO_SOLUTION) {
        return OutcomeClass::NoSolution;
    }
    if outcome.passed {
        return OutcomeClass::Success;
    }
    match detail {
        Some(d) if d.contains(COUNTEREXAMPLE_MARKER) => OutcomeClass::Counterexample,
        _ => OutcomeClass::OtherFailure,
    }
}

/// Counts for one problem (or the whole corpus).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCounts {
    /// Evaluated candidates; excludes `no_solution`.
    pub total: usize,
    pub success: usize,
    pub counterexample: usize,
    pub other_failure: usize,
    pub no_solution: usize,
    /// Failure detail → occurrences.
    pub error_details: BTreeMap<String, usize>,
}

impl ClassCounts {
    fn add(&mut self, outcome: &SampleOutcome) {
        let class = classify(outcome);
        if class == OutcomeClass::NoSolution {
            self.no_solution += 1;
            return;
        }

        self.total += 1;
        match class {
            OutcomeClass::Success => self.success += 1,
            OutcomeClass::Counterexample => self.counterexample += 1,
            _ => self.other_failure += 1,
        }
        if !outcome.passed {
            if let Some(detail) = &outcome.error_detail {
                *self.error_details.entry(detail.clone()).or_insert(0) += 1;
            }
        }
    }

    fn absorb(&mut self, other: &ClassCounts) {
        self.total += other.total;
        self.success += other.success;
        self.counterexample += other.counterexample;
        self.other_failure += other.other_failure;
        self.no_solution += other.no_solution;
        for (detail, count) in &other.error_details {
            *self.error_details.entry(detail.clone()).or_insert(0) += count;
        }
    }

    fn rate(&self, count: usize) -> Option<f64> {
        (self.total > 0).then(|| count as f64 / self.total as f64)
    }

    pub fn success_rate(&self) -> Option<f64> {
        self.rate(self.success)
    }

    pub fn counterexample_rate(&self) -> Option<f64> {
        self.rate(self.counterexample)
    }

    pub fn other_failure_rate(&self) -> Option<f64> {
        self.rate(self.other_failure)
    }

    /// Error details, most frequent first; ties by detail text.
    pub fn top_errors(&self) -> Vec<(&str, usize)> {
        let mut errors: Vec<(&str, usize)> = self
            .error_details
            .iter()
            .map(|(d, c)| (d.as_str(), *c))
            .collect();
        errors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        errors
    }
}

/// Breakdown for a whole outcome set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBreakdown {
    pub per_problem: BTreeMap<ProblemId, ClassCounts>,
    pub overall: ClassCounts,
}

/// Build the breakdown from outcomes in any order.
pub fn breakdown<'a, I>(outcomes: I) -> ErrorBreakdown
where
    I: IntoIterator<Item = &'a SampleOutcome>,
{
    let mut per_problem: BTreeMap<ProblemId, ClassCounts> = BTreeMap::new();
    for outcome in outcomes {
        per_problem
            .entry(outcome.problem_id.clone())
            .or_default()
            .add(outcome);
    }

    let mut overall = ClassCounts::default();
    for counts in per_problem.values() {
        overall.absorb(counts);
    }

    ErrorBreakdown {
        per_problem,
        overall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify(&SampleOutcome::passed("p", 0)), OutcomeClass::Success);
        assert_eq!(
            classify(&SampleOutcome::failed("p", 0).with_error("Counterexample found")),
            OutcomeClass::Counterexample
        );
        assert_eq!(
            classify(&SampleOutcome::failed("p", 0).with_error("Timeout: Alloy check took too long")),
            OutcomeClass::OtherFailure
        );
        assert_eq!(
            classify(&SampleOutcome::failed("p", 0)),
            OutcomeClass::OtherFailure
        );
        assert_eq!(
            classify(&SampleOutcome::failed("p", 0).with_error(NO_SOLUTION)),
            OutcomeClass::NoSolution
        );
    }

    #[test]
    fn test_breakdown_counts() {
        let outcomes = vec![
            SampleOutcome::passed("Reflexive", 0),
            SampleOutcome::failed("Reflexive", 1).with_error("Counterexample found"),
            SampleOutcome::failed("Reflexive", 2).with_error("Counterexample found"),
            SampleOutcome::failed("Reflexive", 3).with_error(NO_SOLUTION),
            SampleOutcome::failed("Acyclic", 0).with_error("Error: syntax error"),
        ];
        let b = breakdown(&outcomes);

        let reflexive = &b.per_problem[&ProblemId::from("Reflexive")];
        assert_eq!(reflexive.total, 3);
        assert_eq!(reflexive.success, 1);
        assert_eq!(reflexive.counterexample, 2);
        assert_eq!(reflexive.other_failure, 0);
        assert_eq!(reflexive.no_solution, 1);
        assert_eq!(reflexive.error_details["Counterexample found"], 2);
        assert!(!reflexive.error_details.contains_key(NO_SOLUTION));

        assert_eq!(b.overall.total, 4);
        assert_eq!(b.overall.other_failure, 1);
        assert_eq!(b.overall.no_solution, 1);
        assert_eq!(b.overall.success_rate(), Some(0.25));
    }

    #[test]
    fn test_rates_undefined_without_evaluated_samples() {
        let outcomes = vec![SampleOutcome::failed("p", 0).with_error(NO_SOLUTION)];
        let b = breakdown(&outcomes);
        assert_eq!(b.overall.total, 0);
        assert_eq!(b.overall.success_rate(), None);
        assert_eq!(b.overall.counterexample_rate(), None);
    }

    #[test]
    fn test_top_errors_sorted_by_count() {
        let outcomes = vec![
            SampleOutcome::failed("p", 0).with_error("Timeout"),
            SampleOutcome::failed("p", 1).with_error("Counterexample found"),
            SampleOutcome::failed("p", 2).with_error("Counterexample found"),
        ];
        let b = breakdown(&outcomes);
        assert_eq!(
            b.overall.top_errors(),
            vec![("Counterexample found", 2), ("Timeout", 1)]
        );
    }
}
