//! Audit artifact written once per finished interview. Write-only: nothing
//! in the service reads these files back.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::assessment::disagreement::DisagreementReport;
use crate::assessment::models::{AssessmentResult, AssessorConfig};
use crate::assessment::scoring::ScoreCard;
use crate::interview::models::{CoverageStats, QaEntry};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsUsed {
    pub planner: String,
    pub followup: String,
    pub answer: String,
    pub assessors: Vec<AssessorConfig>,
}

/// One assessor's normalized result with its derived score and report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessorOutcome {
    pub assessor: AssessorConfig,
    pub result: AssessmentResult,
    pub scorecard: ScoreCard,
    pub report: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewArtifact {
    pub session_id: Uuid,
    pub candidate_name: String,
    pub role: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub models: ModelsUsed,
    pub coverage: CoverageStats,
    pub transcript: Vec<QaEntry>,
    pub exercise_prompt: String,
    pub exercise_answer: String,
    pub assessments: Vec<AssessorOutcome>,
    pub disagreement: DisagreementReport,
    pub disagreement_table: String,
}

impl InterviewArtifact {
    pub fn file_name(&self) -> String {
        let candidate: String = self
            .candidate_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect();
        format!(
            "{}_{}_{}.json",
            self.finished_at.format("%Y%m%dT%H%M%SZ"),
            candidate.trim_matches('_'),
            self.session_id.simple()
        )
    }
}

/// Writes the artifact as pretty JSON under `dir`, creating it if needed.
pub async fn write_artifact(dir: &Path, artifact: &InterviewArtifact) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create results directory {}", dir.display()))?;

    let path = dir.join(artifact.file_name());
    let body = serde_json::to_vec_pretty(artifact).context("Failed to serialize artifact")?;
    tokio::fs::write(&path, body)
        .await
        .with_context(|| format!("Failed to write artifact {}", path.display()))?;

    info!("Wrote interview artifact {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn artifact() -> InterviewArtifact {
        InterviewArtifact {
            session_id: Uuid::nil(),
            candidate_name: "Ada Lovelace!".to_string(),
            role: "Engineer".to_string(),
            started_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
            finished_at: Utc.with_ymd_and_hms(2026, 3, 1, 10, 30, 5).unwrap(),
            models: ModelsUsed {
                planner: "p".to_string(),
                followup: "f".to_string(),
                answer: "a".to_string(),
                assessors: vec![],
            },
            coverage: CoverageStats {
                planned_skills: 0,
                skills_reached: 0,
                skills_answered: 0,
                total_answers: 0,
                skipped_answers: 0,
                followups_asked: 0,
            },
            transcript: vec![],
            exercise_prompt: "x".to_string(),
            exercise_answer: "y".to_string(),
            assessments: vec![],
            disagreement: DisagreementReport::default(),
            disagreement_table: String::new(),
        }
    }

    #[test]
    fn test_file_name_is_timestamped_and_sanitized() {
        assert_eq!(
            artifact().file_name(),
            "20260301T103005Z_ada_lovelace_00000000000000000000000000000000.json"
        );
    }

    #[tokio::test]
    async fn test_write_artifact_creates_directory_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("results").join("2026");

        let path = write_artifact(&nested, &artifact()).await.unwrap();
        let body = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["candidate_name"], "Ada Lovelace!");
        assert_eq!(value["models"]["planner"], "p");
    }
}
