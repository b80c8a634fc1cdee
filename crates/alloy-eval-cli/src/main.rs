//! alloy-eval - pass@k reporting for Alloy predicate benchmarks
//!
//! ## Commands
//!
//! - `report`: aggregate a results file into pass@k statistics
//! - `breakdown`: per-problem success / counterexample / failure counts
//! - `estimate`: evaluate the pass@k estimator for one (n, c, k)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use uuid::Uuid;

use alloy_eval_core::{
    breakdown, estimate, load_results, write_report_json, write_report_md, CorpusReport,
    CorpusReportArtifact, ErrorBreakdown, HarnessConfig, OutcomeRecorder, RunSpan, METRICS,
};

#[derive(Parser)]
#[command(name = "alloy-eval")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Pass@k statistics for Alloy benchmark runs", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate a results file into a corpus report
    Report {
        /// Results file (JSON document, JSON array or JSONL)
        results: PathBuf,

        /// k values for pass@k (comma-separated)
        #[arg(short, long, value_delimiter = ',', env = "ALLOY_EVAL_K")]
        k: Vec<usize>,

        /// Candidates generated per problem (default: largest observed)
        #[arg(short, long, env = "ALLOY_EVAL_BUDGET")]
        budget: Option<usize>,

        /// TOML config file; flags override its values
        #[arg(short, long, env = "ALLOY_EVAL_CONFIG")]
        config: Option<PathBuf>,

        /// Model name recorded in the artifact (default: from results file)
        #[arg(long)]
        model: Option<String>,

        /// Write the JSON report artifact here
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write a markdown summary here
        #[arg(long)]
        markdown: Option<PathBuf>,
    },

    /// Show per-problem failure breakdown for a results file
    Breakdown {
        /// Results file (JSON document, JSON array or JSONL)
        results: PathBuf,
    },

    /// Evaluate pass@k for a single problem
    Estimate {
        /// Samples drawn
        #[arg(short, long)]
        n: usize,

        /// Samples correct
        #[arg(short, long)]
        c: usize,

        /// k in pass@k
        #[arg(short, long, default_value = "1")]
        k: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    alloy_eval_core::init_tracing(cli.json, level);

    let result = match cli.command {
        Commands::Report {
            results,
            k,
            budget,
            config,
            model,
            output,
            markdown,
        } => {
            let flags = HarnessConfig {
                model,
                k_values: k,
                sample_budget: budget,
            };
            cmd_report(
                &results,
                config.as_deref(),
                flags,
                output.as_deref(),
                markdown.as_deref(),
            )
        }
        Commands::Breakdown { results } => cmd_breakdown(&results),
        Commands::Estimate { n, c, k } => cmd_estimate(n, c, k),
    };

    METRICS.flush();
    result
}

/// Resolve file config and flags into one config.
fn resolve_config(config_path: Option<&Path>, flags: HarnessConfig) -> Result<HarnessConfig> {
    let base = match config_path {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };
    Ok(base.merge(flags))
}

/// Aggregate a results file and print the summary
fn cmd_report(
    results_path: &Path,
    config_path: Option<&Path>,
    flags: HarnessConfig,
    output: Option<&Path>,
    markdown: Option<&Path>,
) -> Result<()> {
    let config = resolve_config(config_path, flags)?;
    let aggregation = config.aggregation().context("invalid harness config")?;

    let run_id = Uuid::new_v4();
    let _span = RunSpan::enter(&run_id.to_string());

    let loaded = load_results(results_path)?;
    let model = config.model.clone().or(loaded.model);
    let recorder: OutcomeRecorder = loaded.outcomes.into_iter().collect();

    let report = recorder
        .report(&aggregation)
        .context("failed to aggregate outcomes")?;
    let errors = breakdown(recorder.outcomes());

    let artifact = CorpusReportArtifact::new(run_id, model, recorder.outcomes(), report, errors)?;
    info!(
        results = %results_path.display(),
        outcomes = recorder.len(),
        "report built"
    );

    print_report(&artifact.report, artifact.model.as_deref());

    if let Some(path) = output {
        write_report_json(path, &artifact)?;
        println!("\nReport written to {:?}", path);
    }
    if let Some(path) = markdown {
        write_report_md(path, &artifact.report)?;
        println!("Markdown summary written to {:?}", path);
    }

    Ok(())
}

fn percent(rate: Option<f64>) -> String {
    rate.map(|r| format!("{:.2}%", r * 100.0))
        .unwrap_or_else(|| "N/A".to_string())
}

fn print_report(report: &CorpusReport, model: Option<&str>) {
    if let Some(model) = model {
        println!("Model: {}", model);
    }
    println!("Total samples:   {}", report.total_samples);
    println!("Passed:          {}", report.total_correct);
    println!("Success rate:    {}", percent(report.success_rate));
    println!("Sample budget:   {}", report.sample_budget);

    if !report.pass_at_k.is_empty() {
        println!("\nPass@k:");
        for r in &report.pass_at_k {
            println!("  {:<10} {}", r.label(), percent(Some(r.mean)));
            if !r.undersampled.is_empty() {
                println!("    ({} problems with fewer than {} samples)", r.undersampled.len(), r.k);
            }
        }
    }

    for skipped in &report.skipped_k {
        println!(
            "Warning: k={} is larger than number of samples ({}), skipped",
            skipped.k, skipped.sample_budget
        );
    }
}

/// Print per-problem failure breakdown
fn cmd_breakdown(results_path: &Path) -> Result<()> {
    let loaded = load_results(results_path)?;
    let errors = breakdown(&loaded.outcomes);
    if let Some(model) = &loaded.model {
        println!("Model: {}\n", model);
    }
    print!("{}", render_breakdown(&errors));
    Ok(())
}

fn render_breakdown(errors: &ErrorBreakdown) -> String {
    let mut out = format!(
        "{:<32} {:>6} {:>16} {:>16} {:>16}\n",
        "Problem", "Total", "Success", "Counterexample", "Other failure"
    );
    for (problem, counts) in &errors.per_problem {
        if counts.total == 0 {
            continue;
        }
        out.push_str(&format!(
            "{:<32} {:>6} {:>16} {:>16} {:>16}\n",
            problem.as_str(),
            counts.total,
            format!("{} ({})", counts.success, percent(counts.success_rate())),
            format!(
                "{} ({})",
                counts.counterexample,
                percent(counts.counterexample_rate())
            ),
            format!(
                "{} ({})",
                counts.other_failure,
                percent(counts.other_failure_rate())
            ),
        ));
    }

    for (problem, counts) in &errors.per_problem {
        let top = counts.top_errors();
        if top.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{} error types:\n", problem));
        for (detail, count) in top {
            out.push_str(&format!("  {:>4}  {}\n", count, detail));
        }
    }

    let overall = &errors.overall;
    out.push_str(&format!(
        "\nOverall: {} evaluated, {} successful ({}), {} counterexamples ({}), {} other failures ({}), {} without solution\n",
        overall.total,
        overall.success,
        percent(overall.success_rate()),
        overall.counterexample,
        percent(overall.counterexample_rate()),
        overall.other_failure,
        percent(overall.other_failure_rate()),
        overall.no_solution,
    ));
    out
}

/// Print one pass@k estimate
fn cmd_estimate(n: usize, c: usize, k: usize) -> Result<()> {
    let value = estimate(n, c, k)?;
    println!("pass@{} (n={}, c={}) = {:.6}", k, n, c, value);
    Ok(())
}
