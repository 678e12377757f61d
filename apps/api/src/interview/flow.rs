//! Interview Flow: drives one skill-by-skill pass over the question plan.
//!
//! States: Planning → Questioning(cursor, follow-up budget) → Exercise → Finished.
//! Planning happens inside `start_interview`; no session exists until a plan
//! with at least one question is in hand. Finishing lives in `finish.rs`.
//!
//! Each session is driven by one client at a time. The store hands out clones,
//! every model call happens on the clone, and the result is written back only
//! after the call succeeded, so a failed follow-up decision leaves the stored
//! session untouched.

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::assessment::models::AssessorConfig;
use crate::errors::AppError;
use crate::interview::models::{
    is_skipped, InterviewPhase, InterviewSession, PlanItem, QaEntry, RawFollowupDecision, RawPlan,
    TurnView,
};
use crate::interview::prompts::{
    answer_prompt, exercise_answer_prompt, followup_prompt, plan_prompt, ANSWER_SYSTEM,
    FOLLOWUP_SYSTEM, PLAN_SYSTEM,
};
use crate::interview::store::SessionStore;
use crate::llm_client::{ChatMessage, LlmClient};
use crate::matrix::SkillsMatrix;

const PLAN_TEMPERATURE: f32 = 0.4;
const FOLLOWUP_TEMPERATURE: f32 = 0.2;
const ANSWER_TEMPERATURE: f32 = 0.8;
/// How many recent exchanges for the current skill the follow-up decision sees.
const FOLLOWUP_CONTEXT: usize = 3;

/// Runtime settings for the interview, derived from `Config`.
#[derive(Debug, Clone)]
pub struct InterviewSettings {
    pub planner_model: String,
    pub followup_model: String,
    pub answer_model: String,
    pub assessors: Vec<AssessorConfig>,
    pub max_followups_per_skill: u32,
    pub exercise_prompt: String,
    pub results_dir: PathBuf,
}

/// Planning: one question per skill from the planner model, then a fresh session.
pub async fn start_interview(
    llm: &LlmClient,
    store: &dyn SessionStore,
    matrix: &SkillsMatrix,
    settings: &InterviewSettings,
    candidate_name: &str,
) -> Result<TurnView, AppError> {
    let messages = [
        ChatMessage::system(PLAN_SYSTEM),
        ChatMessage::user(plan_prompt(matrix)),
    ];
    let raw: RawPlan = llm
        .call_structured_as(&settings.planner_model, &messages, PLAN_TEMPERATURE)
        .await?;

    let plan = build_plan(raw, matrix);
    if plan.is_empty() {
        return Err(AppError::PlanningFailure(
            "The planner returned no interview questions".to_string(),
        ));
    }

    let candidate_name = match candidate_name.trim() {
        "" => "Candidate".to_string(),
        name => name.to_string(),
    };
    let session = InterviewSession::new(candidate_name, plan, settings.max_followups_per_skill);
    info!(
        "Started interview {} for {} with {} planned skills",
        session.id,
        session.candidate_name,
        session.plan.len()
    );

    let view = TurnView::from_session(&session, &settings.exercise_prompt);
    store.insert(session);
    Ok(view)
}

/// Keeps usable items in model order, at most one per skill. Skill names are
/// matched to the matrix case-insensitively and rewritten to the matrix
/// spelling; names outside the matrix are dropped.
fn build_plan(raw: RawPlan, matrix: &SkillsMatrix) -> Vec<PlanItem> {
    let mut seen = HashSet::new();
    let plan: Vec<PlanItem> = raw
        .questions
        .into_iter()
        .filter_map(|item| {
            let named = item.skill?;
            let question = item.question?.trim().to_string();
            if question.is_empty() {
                return None;
            }
            match matrix
                .skills
                .iter()
                .find(|s| s.name.eq_ignore_ascii_case(named.trim()))
            {
                Some(skill) => Some(PlanItem {
                    skill: skill.name.clone(),
                    question,
                }),
                None => {
                    warn!("Planner returned unknown skill '{named}'; dropping it");
                    None
                }
            }
        })
        .filter(|item| seen.insert(item.skill.clone()))
        .collect();

    let unplanned: Vec<&str> = matrix
        .skills
        .iter()
        .map(|s| s.name.as_str())
        .filter(|name| !seen.contains(*name))
        .collect();
    if !unplanned.is_empty() && !plan.is_empty() {
        warn!("Planner left out matrix skills {unplanned:?}; they will score the default");
    }
    plan
}

pub fn current_turn(
    store: &dyn SessionStore,
    settings: &InterviewSettings,
    session_id: Uuid,
) -> Result<TurnView, AppError> {
    let session = store
        .get(session_id)
        .ok_or(AppError::SessionNotFound(session_id))?;
    Ok(TurnView::from_session(&session, &settings.exercise_prompt))
}

/// Records an answer for the skill at the cursor and either re-presents the
/// skill with a follow-up or advances to the next one.
pub async fn submit_answer(
    llm: &LlmClient,
    store: &dyn SessionStore,
    settings: &InterviewSettings,
    session_id: Uuid,
    answer: &str,
) -> Result<TurnView, AppError> {
    let mut session = store
        .get(session_id)
        .ok_or(AppError::SessionNotFound(session_id))?;

    let item = session.current_item().cloned().ok_or_else(|| {
        AppError::Validation(
            "All skills have been covered; submit the exercise to finish the interview".to_string(),
        )
    })?;

    let entry = QaEntry {
        skill: item.skill.clone(),
        question: session.current_question.clone(),
        answer: answer.trim().to_string(),
        is_followup: session.on_followup,
    };

    let followup = if session.followup_budget > 0
        && !entry.answer.is_empty()
        && !is_skipped(&entry.answer)
    {
        let mut recent = session.recent_entries_for(&item.skill, FOLLOWUP_CONTEXT - 1);
        recent.push(entry.clone());
        decide_followup(llm, settings, &item.skill, &recent).await?
    } else {
        None
    };

    session.transcript.push(entry);
    let asked = followup.is_some_and(|question| session.ask_followup(question));
    if asked {
        info!(
            "Interview {session_id}: follow-up on '{}' ({} left)",
            item.skill, session.followup_budget
        );
    } else {
        session.advance(settings.max_followups_per_skill);
        if session.phase == InterviewPhase::Exercise {
            info!("Interview {session_id}: all skills covered, moving to exercise");
        } else {
            info!(
                "Interview {session_id}: advanced to skill {}/{}",
                session.cursor + 1,
                session.plan.len()
            );
        }
    }

    let view = TurnView::from_session(&session, &settings.exercise_prompt);
    if !store.update(session) {
        return Err(AppError::SessionNotFound(session_id));
    }
    Ok(view)
}

/// Returns the follow-up question when the model finds evidence missing.
async fn decide_followup(
    llm: &LlmClient,
    settings: &InterviewSettings,
    skill: &str,
    recent: &[QaEntry],
) -> Result<Option<String>, AppError> {
    let messages = [
        ChatMessage::system(FOLLOWUP_SYSTEM),
        ChatMessage::user(followup_prompt(skill, recent)),
    ];
    let decision: RawFollowupDecision = llm
        .call_structured_as(&settings.followup_model, &messages, FOLLOWUP_TEMPERATURE)
        .await?;

    let question = decision
        .question
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty());

    match (decision.followup, question) {
        (Some(true), Some(question)) => {
            debug!(
                "Follow-up warranted for '{skill}', missing: {:?}",
                decision.missing
            );
            Ok(Some(question))
        }
        _ => Ok(None),
    }
}

/// Explicit reset: the session is dropped without assessment.
pub fn abandon_interview(store: &dyn SessionStore, session_id: Uuid) -> Result<(), AppError> {
    store
        .remove(session_id)
        .map(|_| info!("Interview {session_id} abandoned"))
        .ok_or(AppError::SessionNotFound(session_id))
}

/// Simulated candidate answer for the current question. Not recorded.
pub async fn generate_answer(
    llm: &LlmClient,
    store: &dyn SessionStore,
    matrix: &SkillsMatrix,
    settings: &InterviewSettings,
    session_id: Uuid,
    level: u8,
) -> Result<String, AppError> {
    let session = store
        .get(session_id)
        .ok_or(AppError::SessionNotFound(session_id))?;
    let item = session.current_item().ok_or_else(|| {
        AppError::Validation("There is no open question to answer".to_string())
    })?;

    let messages = [
        ChatMessage::system(ANSWER_SYSTEM),
        ChatMessage::user(answer_prompt(
            &matrix.role,
            item,
            &session.current_question,
            level.clamp(1, 9),
        )),
    ];
    Ok(llm
        .call_text(&settings.answer_model, &messages, ANSWER_TEMPERATURE)
        .await?)
}

/// Simulated exercise submission at the given level. Not recorded.
pub async fn generate_exercise_answer(
    llm: &LlmClient,
    store: &dyn SessionStore,
    matrix: &SkillsMatrix,
    settings: &InterviewSettings,
    session_id: Uuid,
    level: u8,
) -> Result<String, AppError> {
    if store.get(session_id).is_none() {
        return Err(AppError::SessionNotFound(session_id));
    }

    let messages = [
        ChatMessage::system(ANSWER_SYSTEM),
        ChatMessage::user(exercise_answer_prompt(
            &matrix.role,
            &settings.exercise_prompt,
            level.clamp(1, 9),
        )),
    ];
    Ok(llm
        .call_text(&settings.answer_model, &messages, ANSWER_TEMPERATURE)
        .await?)
}
