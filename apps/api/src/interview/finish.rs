//! Finish: runs the assessor panel over a session and turns the results into
//! scorecards, a disagreement report, Markdown reports and an audit artifact.
//! The session is removed only once the panel has succeeded.

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::assessment::artifact::{write_artifact, AssessorOutcome, InterviewArtifact, ModelsUsed};
use crate::assessment::assessor::{run_panel, AssessmentInput};
use crate::assessment::disagreement::{analyze_disagreement, DisagreementReport};
use crate::assessment::report::{render_assessor_report, render_disagreement_table};
use crate::assessment::scoring::ScoreCard;
use crate::errors::AppError;
use crate::interview::flow::InterviewSettings;
use crate::interview::models::{CoverageStats, InterviewPhase};
use crate::interview::store::SessionStore;
use crate::llm_client::LlmClient;
use crate::matrix::SkillsMatrix;

#[derive(Debug, Clone, Serialize)]
pub struct FinishResponse {
    pub session_id: Uuid,
    pub phase: InterviewPhase,
    pub coverage: CoverageStats,
    pub assessments: Vec<AssessorOutcome>,
    pub disagreement: DisagreementReport,
    pub disagreement_table: String,
    /// None when the artifact could not be written.
    pub artifact_path: Option<String>,
}

pub async fn finish_interview(
    llm: &LlmClient,
    store: &dyn SessionStore,
    matrix: &SkillsMatrix,
    settings: &InterviewSettings,
    session_id: Uuid,
    exercise_answer: &str,
) -> Result<FinishResponse, AppError> {
    let mut session = store
        .get(session_id)
        .ok_or(AppError::SessionNotFound(session_id))?;

    if settings.assessors.is_empty() {
        return Err(AppError::Validation(
            "No assessors are configured".to_string(),
        ));
    }

    info!(
        "Interview {session_id}: assessing with {} assessors",
        settings.assessors.len()
    );
    let input = AssessmentInput {
        matrix: matrix.clone(),
        transcript: session.transcript.clone(),
        exercise_prompt: settings.exercise_prompt.clone(),
        exercise_answer: exercise_answer.trim().to_string(),
    };
    let results = run_panel(llm, &settings.assessors, &input).await?;

    let disagreement = analyze_disagreement(&results);
    let disagreement_table = render_disagreement_table(&disagreement, &settings.assessors);
    let assessments: Vec<AssessorOutcome> = settings
        .assessors
        .iter()
        .zip(results)
        .map(|(assessor, result)| {
            let scorecard = ScoreCard::compute(&result, matrix);
            let report =
                render_assessor_report(&session.candidate_name, assessor, &result, &scorecard);
            info!(
                "Interview {session_id}: {} scored {}/100",
                assessor.label(),
                scorecard.overall_score
            );
            AssessorOutcome {
                assessor: assessor.clone(),
                result,
                scorecard,
                report,
            }
        })
        .collect();

    session.phase = InterviewPhase::Finished;
    let coverage = CoverageStats::from_session(&session);

    let artifact = InterviewArtifact {
        session_id,
        candidate_name: session.candidate_name.clone(),
        role: matrix.role.clone(),
        started_at: session.created_at,
        finished_at: Utc::now(),
        models: ModelsUsed {
            planner: settings.planner_model.clone(),
            followup: settings.followup_model.clone(),
            answer: settings.answer_model.clone(),
            assessors: settings.assessors.clone(),
        },
        coverage: coverage.clone(),
        transcript: session.transcript,
        exercise_prompt: input.exercise_prompt,
        exercise_answer: input.exercise_answer,
        assessments,
        disagreement,
        disagreement_table,
    };

    let artifact_path = match write_artifact(&settings.results_dir, &artifact).await {
        Ok(path) => Some(path.display().to_string()),
        Err(e) => {
            warn!("Interview {session_id}: artifact not written: {e:#}");
            None
        }
    };

    store.remove(session_id);
    info!("Interview {session_id} finished");

    Ok(FinishResponse {
        session_id,
        phase: InterviewPhase::Finished,
        coverage,
        assessments: artifact.assessments,
        disagreement: artifact.disagreement,
        disagreement_table: artifact.disagreement_table,
        artifact_path,
    })
}
