//! Reading harness result files into [`SampleOutcome`]s.
//!
//! Accepted layouts:
//! - a JSON document `{ "model": "...", "results": [record, ...] }`
//! - a bare JSON array of records
//! - JSONL, one record per line (blank lines ignored)
//!
//! A record carries `task_id`, `passed` and optionally `error` /
//! `error_message`; other fields (`solution`, `debug_file`, ...) are ignored.
//! Task ids shaped `<base>_sol<N>` become `(base, N)`. Other ids are kept
//! whole and numbered in arrival order within their problem.

use anyhow::{Context, Result as AnyResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::domain::{EvalError, ProblemId, Result, SampleOutcome};

/// One entry of a result file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub task_id: String,

    #[serde(default)]
    pub passed: bool,

    /// Generation-side failure, e.g. "No solution generated".
    #[serde(default)]
    pub error: Option<String>,

    /// Analyzer-side failure, e.g. "Counterexample found".
    #[serde(default)]
    pub error_message: Option<String>,
}

/// The wrapped result-file layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsFile {
    #[serde(default)]
    pub model: Option<String>,
    pub results: Vec<ResultRecord>,
}

/// Outcomes read from a result file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedResults {
    pub model: Option<String>,
    pub outcomes: Vec<SampleOutcome>,
}

/// A task id split into problem identity and optional sample index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleKey {
    pub problem_id: ProblemId,
    pub sample_index: Option<usize>,
}

const SAMPLE_SUFFIX: &str = "_sol";

impl SampleKey {
    /// Split `<base>_sol<N>`; ids without the suffix are returned whole.
    pub fn parse(task_id: &str) -> Result<Self> {
        if task_id.trim().is_empty() {
            return Err(EvalError::InvalidSampleKey("empty task id".to_string()));
        }

        let (base, digits) = match task_id.rsplit_once(SAMPLE_SUFFIX) {
            Some((base, digits))
                if !base.is_empty()
                    && !digits.is_empty()
                    && digits.bytes().all(|b| b.is_ascii_digit()) =>
            {
                (base, digits)
            }
            _ => {
                return Ok(Self {
                    problem_id: ProblemId::new(task_id),
                    sample_index: None,
                })
            }
        };

        let index = digits.parse::<usize>().map_err(|e| {
            EvalError::InvalidSampleKey(format!("{task_id}: sample index {e}"))
        })?;

        Ok(Self {
            problem_id: ProblemId::new(base),
            sample_index: Some(index),
        })
    }
}

/// Convert records into outcomes, preserving record order.
pub fn outcomes_from_records(records: &[ResultRecord]) -> Result<Vec<SampleOutcome>> {
    let mut seen: HashMap<ProblemId, usize> = HashMap::new();
    let mut outcomes = Vec::with_capacity(records.len());

    for record in records {
        let key = SampleKey::parse(&record.task_id)?;
        let arrival = seen.entry(key.problem_id.clone()).or_insert(0);
        let sample_index = key.sample_index.unwrap_or(*arrival);
        *arrival += 1;

        outcomes.push(SampleOutcome {
            problem_id: key.problem_id,
            sample_index,
            passed: record.passed,
            error_detail: record.error.clone().or_else(|| record.error_message.clone()),
        });
    }

    Ok(outcomes)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Wrapped,
    Array,
    Lines,
}

/// Pick the layout from the leading text, so a malformed record is reported
/// against the layout the file actually uses.
fn detect_layout(raw: &str) -> Layout {
    let trimmed = raw.trim_start();
    if trimmed.starts_with('[') {
        return Layout::Array;
    }
    if !trimmed.starts_with('{') {
        return Layout::Lines;
    }
    let first_line = trimmed.lines().next().unwrap_or_default();
    match serde_json::from_str::<serde_json::Value>(first_line) {
        Ok(serde_json::Value::Object(map)) if !map.contains_key("results") => Layout::Lines,
        _ => Layout::Wrapped,
    }
}

/// Parse result-file contents in any accepted layout.
pub fn parse_results(raw: &str) -> AnyResult<LoadedResults> {
    let (model, records) = match detect_layout(raw) {
        Layout::Wrapped => {
            let file: ResultsFile =
                serde_json::from_str(raw).context("parse results document")?;
            (file.model, file.results)
        }
        Layout::Array => {
            let records: Vec<ResultRecord> =
                serde_json::from_str(raw).context("parse results array")?;
            (None, records)
        }
        Layout::Lines => (None, parse_jsonl(raw)?),
    };

    let outcomes = outcomes_from_records(&records)?;
    Ok(LoadedResults { model, outcomes })
}

fn parse_jsonl(raw: &str) -> AnyResult<Vec<ResultRecord>> {
    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).with_context(|| format!("parse result record on line {}", i + 1))
        })
        .collect()
}

/// Read a result file from disk.
pub fn load_results(path: &Path) -> AnyResult<LoadedResults> {
    let raw =
        std::fs::read_to_string(path).with_context(|| format!("read results {:?}", path))?;
    parse_results(&raw).with_context(|| format!("load results {:?}", path))
}
