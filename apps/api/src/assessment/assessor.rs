//! Runs the assessor panel: one structured call per assessor, issued
//! concurrently, each normalized with its own stance.

use futures::future::join_all;
use tracing::{info, warn};

use crate::assessment::models::{AssessmentResult, AssessorConfig, RawAssessment};
use crate::assessment::normalizer::normalize_assessment;
use crate::assessment::prompts::{assessment_prompt, ASSESSMENT_SYSTEM};
use crate::interview::models::QaEntry;
use crate::llm_client::{CallFailure, ChatMessage, LlmClient};
use crate::matrix::SkillsMatrix;

const ASSESSMENT_TEMPERATURE: f32 = 0.2;

/// Everything an assessor reads. Shared immutably by every panel member.
#[derive(Debug, Clone)]
pub struct AssessmentInput {
    pub matrix: SkillsMatrix,
    pub transcript: Vec<QaEntry>,
    pub exercise_prompt: String,
    pub exercise_answer: String,
}

pub async fn run_assessor(
    llm: &LlmClient,
    assessor: &AssessorConfig,
    input: &AssessmentInput,
) -> Result<AssessmentResult, CallFailure> {
    let messages = [
        ChatMessage::system(ASSESSMENT_SYSTEM),
        ChatMessage::user(assessment_prompt(
            &input.matrix,
            assessor.stance,
            &input.transcript,
            &input.exercise_prompt,
            &input.exercise_answer,
        )),
    ];

    let raw: RawAssessment = llm
        .call_structured_as(&assessor.model, &messages, ASSESSMENT_TEMPERATURE)
        .await?;

    let skill_names = input.matrix.skill_names();
    let returned = raw.skill_scores.len();
    let result = normalize_assessment(raw, &skill_names, assessor.stance);
    if returned < skill_names.len() {
        warn!(
            "Assessor {} scored {returned} of {} skills; defaults filled the rest",
            assessor.label(),
            skill_names.len()
        );
    }
    info!(
        "Assessor {} recommends {}",
        assessor.label(),
        result.recommendation.label()
    );
    Ok(result)
}

/// All assessors at once; results come back in assessor order. The first
/// failure (in assessor order) fails the panel.
pub async fn run_panel(
    llm: &LlmClient,
    assessors: &[AssessorConfig],
    input: &AssessmentInput,
) -> Result<Vec<AssessmentResult>, CallFailure> {
    let calls = assessors.iter().map(|a| run_assessor(llm, a, input));
    join_all(calls).await.into_iter().collect()
}
