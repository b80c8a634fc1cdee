//! Domain-level error taxonomy for alloy-eval.

/// Errors produced by estimation and aggregation.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("invalid estimator input: n={n}, c={c}, k={k} (requires c <= n and k >= 1)")]
    InvalidEstimatorInput { n: usize, c: usize, k: usize },

    #[error("corrupted tally for problem {problem_id}: correct={correct} > samples={samples}")]
    CorruptedTally {
        problem_id: String,
        samples: usize,
        correct: usize,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid sample key: {0}")]
    InvalidSampleKey(String),
}

/// Result type for alloy-eval domain operations.
pub type Result<T> = std::result::Result<T, EvalError>;
