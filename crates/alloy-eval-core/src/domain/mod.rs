//! Domain models for alloy-eval.
//!
//! Canonical definitions for the core entities:
//! - `SampleOutcome`: analyzer verdict for one generated candidate
//! - `ProblemTally`: per-problem (samples, correct) counts
//! - `PassAtKReport` / `CorpusReport`: aggregated run statistics

pub mod error;
pub mod outcome;
pub mod report;

// Re-export main types and errors
pub use error::{EvalError, Result};
pub use outcome::{ProblemId, ProblemTally, SampleOutcome};
pub use report::{CorpusReport, PassAtKReport, SkippedK};
