use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::llm_client::lenient::{lenient_bool, lenient_items, lenient_string, lenient_string_list};

/// Sentinel recorded when the candidate skips a question.
pub const SKIPPED_MARKER: &str = "[skipped]";

pub fn is_skipped(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case(SKIPPED_MARKER)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanItem {
    pub skill: String,
    pub question: String,
}

/// One answered question. Append-only once pushed onto a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaEntry {
    pub skill: String,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub is_followup: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewPhase {
    Questioning,
    Exercise,
    Finished,
}

/// A live interview. Owned by the session store; a session only exists
/// once planning has succeeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewSession {
    pub id: Uuid,
    pub candidate_name: String,
    pub plan: Vec<PlanItem>,
    /// Index into `plan`; equals `plan.len()` once questioning is over.
    pub cursor: usize,
    pub transcript: Vec<QaEntry>,
    pub followup_budget: u32,
    pub current_question: String,
    pub on_followup: bool,
    pub phase: InterviewPhase,
    pub created_at: DateTime<Utc>,
}

impl InterviewSession {
    pub fn new(candidate_name: String, plan: Vec<PlanItem>, max_followups: u32) -> Self {
        let (phase, current_question) = match plan.first() {
            Some(item) => (InterviewPhase::Questioning, item.question.clone()),
            None => (InterviewPhase::Exercise, String::new()),
        };
        Self {
            id: Uuid::new_v4(),
            candidate_name,
            plan,
            cursor: 0,
            transcript: Vec::new(),
            followup_budget: max_followups,
            current_question,
            on_followup: false,
            phase,
            created_at: Utc::now(),
        }
    }

    pub fn current_item(&self) -> Option<&PlanItem> {
        match self.phase {
            InterviewPhase::Questioning => self.plan.get(self.cursor),
            _ => None,
        }
    }

    /// The last `limit` entries recorded for `skill`, oldest first.
    pub fn recent_entries_for(&self, skill: &str, limit: usize) -> Vec<QaEntry> {
        let mut recent: Vec<QaEntry> = self
            .transcript
            .iter()
            .rev()
            .filter(|e| e.skill == skill)
            .take(limit)
            .cloned()
            .collect();
        recent.reverse();
        recent
    }

    /// Re-presents the current skill with a follow-up question.
    /// Returns false (and changes nothing) when the budget is spent.
    pub fn ask_followup(&mut self, question: String) -> bool {
        if self.followup_budget == 0 || self.phase != InterviewPhase::Questioning {
            return false;
        }
        self.followup_budget -= 1;
        self.current_question = question;
        self.on_followup = true;
        true
    }

    /// Moves to the next skill, or into the exercise once the plan is done.
    pub fn advance(&mut self, max_followups: u32) {
        self.cursor = (self.cursor + 1).min(self.plan.len());
        self.followup_budget = max_followups;
        self.on_followup = false;
        match self.plan.get(self.cursor) {
            Some(item) => self.current_question = item.question.clone(),
            None => {
                self.current_question.clear();
                self.phase = InterviewPhase::Exercise;
            }
        }
    }
}

/// What the client needs to render the next step.
#[derive(Debug, Clone, Serialize)]
pub struct TurnView {
    pub session_id: Uuid,
    pub candidate_name: String,
    pub phase: InterviewPhase,
    pub skill: Option<String>,
    pub question: Option<String>,
    pub is_followup: bool,
    pub followups_remaining: u32,
    pub answered_skills: usize,
    pub total_skills: usize,
    pub exercise_prompt: Option<String>,
}

impl TurnView {
    pub fn from_session(session: &InterviewSession, exercise_prompt: &str) -> Self {
        let item = session.current_item();
        Self {
            session_id: session.id,
            candidate_name: session.candidate_name.clone(),
            phase: session.phase,
            skill: item.map(|i| i.skill.clone()),
            question: item.map(|_| session.current_question.clone()),
            is_followup: session.on_followup,
            followups_remaining: session.followup_budget,
            answered_skills: session.cursor,
            total_skills: session.plan.len(),
            exercise_prompt: (session.phase == InterviewPhase::Exercise)
                .then(|| exercise_prompt.to_string()),
        }
    }
}

/// Coverage figures recorded in the audit artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageStats {
    pub planned_skills: usize,
    pub skills_reached: usize,
    pub skills_answered: usize,
    pub total_answers: usize,
    pub skipped_answers: usize,
    pub followups_asked: usize,
}

impl CoverageStats {
    pub fn from_session(session: &InterviewSession) -> Self {
        let answered: std::collections::HashSet<&str> = session
            .transcript
            .iter()
            .filter(|e| !e.answer.trim().is_empty() && !is_skipped(&e.answer))
            .map(|e| e.skill.as_str())
            .collect();

        Self {
            planned_skills: session.plan.len(),
            skills_reached: session.cursor,
            skills_answered: answered.len(),
            total_answers: session.transcript.len(),
            skipped_answers: session
                .transcript
                .iter()
                .filter(|e| is_skipped(&e.answer))
                .count(),
            followups_asked: session.transcript.iter().filter(|e| e.is_followup).count(),
        }
    }
}

// Boundary types for model replies. Every field is optional and loosely typed;
// a malformed plan item is dropped rather than failing the whole plan.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawPlan {
    #[serde(alias = "plan", deserialize_with = "lenient_items")]
    pub questions: Vec<RawPlanItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawPlanItem {
    #[serde(alias = "name", deserialize_with = "lenient_string")]
    pub skill: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub question: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawFollowupDecision {
    #[serde(
        alias = "ask_followup",
        alias = "needs_followup",
        deserialize_with = "lenient_bool"
    )]
    pub followup: Option<bool>,
    #[serde(alias = "followup_question", deserialize_with = "lenient_string")]
    pub question: Option<String>,
    #[serde(deserialize_with = "lenient_string_list")]
    pub missing: Vec<String>,
}
