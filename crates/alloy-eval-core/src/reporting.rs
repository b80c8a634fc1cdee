use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use uuid::Uuid;

use crate::breakdown::ErrorBreakdown;
use crate::domain::{CorpusReport, SampleOutcome};

pub const SCHEMA_VERSION: &str = "1.0";

/// Canonical report artifact persisted at the end of a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorpusReportArtifact {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub run_id: Uuid,
    pub model: Option<String>,
    /// SHA-256 of the canonical JSON of the outcome sequence.
    pub outcomes_digest: String,
    pub report: CorpusReport,
    pub breakdown: ErrorBreakdown,
}

impl CorpusReportArtifact {
    /// `run_id` is chosen by the caller so the run span and the artifact
    /// share one id.
    pub fn new(
        run_id: Uuid,
        model: Option<String>,
        outcomes: &[SampleOutcome],
        report: CorpusReport,
        breakdown: ErrorBreakdown,
    ) -> Result<Self> {
        Ok(Self {
            schema_version: SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            run_id,
            model,
            outcomes_digest: outcomes_digest(outcomes)?,
            report,
            breakdown,
        })
    }
}

/// Deterministic digest of an outcome sequence (order-sensitive).
pub fn outcomes_digest(outcomes: &[SampleOutcome]) -> Result<String> {
    let canonical = serde_json::to_vec(outcomes).context("serialize outcomes")?;
    Ok(hex::encode(Sha256::digest(&canonical)))
}

/// Write the artifact as pretty JSON.
pub fn write_report_json(path: &Path, artifact: &CorpusReportArtifact) -> Result<()> {
    let content = serde_json::to_string_pretty(artifact).context("serialize report artifact")?;
    std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
    Ok(())
}

/// Read an artifact written by [`write_report_json`].
pub fn read_report_json(path: &Path) -> Result<CorpusReportArtifact> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("read {:?}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("parse {:?}", path))
}

fn percent(rate: Option<f64>) -> String {
    match rate {
        Some(r) => format!("{:.2}%", r * 100.0),
        None => "N/A".to_string(),
    }
}

/// Render a markdown summary of a corpus report.
pub fn render_report_md(report: &CorpusReport) -> String {
    let mut out = String::new();
    out.push_str("# Evaluation Summary\n\n");
    out.push_str(&format!(
        "- total samples: {}\n- passed: {}\n- success rate: {}\n- sample budget: {}\n",
        report.total_samples,
        report.total_correct,
        percent(report.success_rate),
        report.sample_budget
    ));

    if !report.pass_at_k.is_empty() {
        out.push_str("\n## Pass@k\n");
        for r in &report.pass_at_k {
            out.push_str(&format!(
                "- {}: {} ({} problems)\n",
                r.label(),
                percent(Some(r.mean)),
                r.per_problem.len()
            ));
        }
    }

    if !report.skipped_k.is_empty() {
        let skipped: Vec<String> = report.skipped_k.iter().map(|s| s.k.to_string()).collect();
        out.push_str(&format!(
            "\n## Skipped\n- k > {} samples: {}\n",
            report.sample_budget,
            skipped.join(", ")
        ));
    }
    out
}

/// Write the markdown summary.
pub fn write_report_md(path: &Path, report: &CorpusReport) -> Result<()> {
    let md = render_report_md(report);
    std::fs::write(path, md).with_context(|| format!("write {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PassAtKReport, ProblemId, SkippedK};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn report() -> CorpusReport {
        let mut per_problem = BTreeMap::new();
        per_problem.insert(ProblemId::from("p1"), 2.0 / 3.0);
        CorpusReport {
            total_samples: 3,
            total_correct: 2,
            success_rate: Some(2.0 / 3.0),
            sample_budget: 3,
            pass_at_k: vec![PassAtKReport {
                k: 1,
                per_problem,
                mean: 2.0 / 3.0,
                undersampled: Vec::new(),
            }],
            skipped_k: vec![SkippedK {
                k: 5,
                sample_budget: 3,
            }],
        }
    }

    #[test]
    fn artifact_schema_has_expected_keys() {
        let outcomes = vec![SampleOutcome::passed("p1", 0)];
        let run_id = Uuid::new_v4();
        let artifact = CorpusReportArtifact::new(
            run_id,
            Some("gpt-4o".to_string()),
            &outcomes,
            report(),
            ErrorBreakdown::default(),
        )
        .expect("artifact");

        let raw = serde_json::to_value(&artifact).expect("serialize artifact");
        let obj = raw.as_object().expect("artifact object");
        for key in [
            "schema_version",
            "generated_at",
            "run_id",
            "model",
            "outcomes_digest",
            "report",
            "breakdown",
        ] {
            assert!(obj.contains_key(key), "missing {key}");
        }
        assert_eq!(artifact.run_id, run_id);
        assert_eq!(raw["run_id"], json!(run_id.to_string()));
        assert_eq!(raw["schema_version"], json!("1.0"));
        assert_eq!(raw["report"]["total_samples"], json!(3));
        assert_eq!(raw["report"]["skipped_k"][0]["k"], json!(5));
    }

    #[test]
    fn digest_is_deterministic_and_order_sensitive() {
        let a = vec![SampleOutcome::passed("p", 0), SampleOutcome::failed("p", 1)];
        let b = vec![SampleOutcome::failed("p", 1), SampleOutcome::passed("p", 0)];
        let da = outcomes_digest(&a).expect("digest");
        assert_eq!(da, outcomes_digest(&a).expect("digest"));
        assert_ne!(da, outcomes_digest(&b).expect("digest"));
        assert_eq!(da.len(), 64);
    }

    #[test]
    fn markdown_render_is_stable() {
        let actual = render_report_md(&report());
        let expected = "# Evaluation Summary\n\n- total samples: 3\n- passed: 2\n- success rate: 66.67%\n- sample budget: 3\n\n## Pass@k\n- pass@1: 66.67% (1 problems)\n\n## Skipped\n- k > 3 samples: 5\n";
        assert_eq!(actual, expected);
    }

    #[test]
    fn markdown_marks_undefined_rate() {
        let md = render_report_md(&CorpusReport::empty(0));
        assert!(md.contains("success rate: N/A"));
        assert!(!md.contains("## Pass@k"));
    }

    #[test]
    fn json_write_then_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.json");
        let artifact =
            CorpusReportArtifact::new(Uuid::new_v4(), None, &[], report(), ErrorBreakdown::default())
                .expect("artifact");
        write_report_json(&path, &artifact).expect("write");

        let loaded = read_report_json(&path).expect("read");
        assert_eq!(loaded.run_id, artifact.run_id);
        assert_eq!(loaded.outcomes_digest, artifact.outcomes_digest);
        assert_eq!(loaded.report.total_correct, 2);
        assert_eq!(loaded.report.skipped_values(), vec![5]);
    }
}
