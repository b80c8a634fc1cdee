//! alloy-eval core library
//!
//! Turns analyzer verdicts for generated Alloy predicates into run-level
//! statistics: per-problem tallies, unbiased pass@k estimates and corpus
//! means. Generation and analyzer invocation live outside this crate; it
//! consumes their outcomes.

pub mod aggregator;
pub mod breakdown;
pub mod config;
pub mod domain;
pub mod estimator;
pub mod ingest;
pub mod metrics;
pub mod obs;
pub mod recorder;
pub mod reporting;
pub mod telemetry;

pub use aggregator::{aggregate_tallies, AggregationConfig};
pub use breakdown::{breakdown, classify, ClassCounts, ErrorBreakdown, OutcomeClass};
pub use config::HarnessConfig;
pub use domain::{
    CorpusReport, EvalError, PassAtKReport, ProblemId, ProblemTally, Result, SampleOutcome,
    SkippedK,
};
pub use estimator::estimate;
pub use ingest::{load_results, parse_results, LoadedResults, ResultRecord, SampleKey};
pub use recorder::OutcomeRecorder;
pub use reporting::{
    outcomes_digest, read_report_json, render_report_md, write_report_json, write_report_md,
    CorpusReportArtifact,
};

pub use metrics::{Counter, MetricsSnapshot, METRICS};
pub use obs::RunSpan;
pub use telemetry::init_tracing;

/// alloy-eval version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
