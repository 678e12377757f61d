// Assessor prompt templates.

use crate::assessment::models::Stance;
use crate::interview::models::QaEntry;
use crate::llm_client::prompts::fill_template;
use crate::matrix::SkillsMatrix;

pub const ASSESSMENT_SYSTEM: &str = "\
You are an experienced hiring assessor scoring a candidate against a skills matrix. \
You MUST respond with valid JSON only. No markdown fences, no explanations.";

pub const ASSESSMENT_PROMPT_TEMPLATE: &str = r#"Assess the candidate below for the role: {role}

STANCE: {stance}
{stance_instruction}

SCALE (per skill and for the exercise): 1–9, where 1 = no evidence of capability,
3 = basic / supervised, 5 = independent practitioner, 7 = leads others, 9 = recognised expert.

SKILLS (score every one, using these exact names):
{skills}

INTERVIEW TRANSCRIPT:
{transcript}

TAKE-HOME EXERCISE:
{exercise_prompt}

CANDIDATE SUBMISSION:
{exercise_answer}

OUTPUT SCHEMA (return exactly this structure):
{
  "recommendation": "Strong Hire" | "Hire" | "Lean Hire" | "Lean No Hire" | "No Hire",
  "skill_scores": [
    {
      "skill": "exact skill name",
      "score": 1-9,
      "confidence": "low" | "medium" | "high",
      "stance": "{stance}",
      "rationale": "string",
      "gap_to_next_level": "what evidence would justify one level higher",
      "evidence": ["up to 3 short quotes or paraphrases from the transcript"],
      "risks": ["up to 2"],
      "followups": ["up to 2 questions a human interviewer should ask next"]
    }
  ],
  "exercise_score": 1-9,
  "exercise_rationale": "string",
  "exercise_evidence": ["up to 3"],
  "summary": ["up to 6 short bullet points"]
}"#;

pub fn stance_instruction(stance: Stance) -> &'static str {
    match stance {
        Stance::Strict => {
            "Score only what the candidate explicitly demonstrated. \
            Do not infer skill from job titles, buzzwords or confident tone."
        }
        Stance::Balanced => {
            "Score on demonstrated evidence, allowing reasonable inference where an answer \
            clearly implies experience the candidate did not spell out."
        }
        Stance::Diverse => {
            "Act as an independent critic. Form your own view, look for what other assessors \
            might overlook in either direction, and justify any unusual score."
        }
    }
}

pub fn assessment_prompt(
    matrix: &SkillsMatrix,
    stance: Stance,
    transcript: &[QaEntry],
    exercise_prompt: &str,
    exercise_answer: &str,
) -> String {
    let skills = matrix
        .skills
        .iter()
        .map(|s| format!("- {}", s.name))
        .collect::<Vec<_>>()
        .join("\n");

    let transcript = if transcript.is_empty() {
        "(no questions were answered)".to_string()
    } else {
        transcript
            .iter()
            .map(|e| format!("[{}]\nQ: {}\nA: {}", e.skill, e.question, e.answer))
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    let exercise_answer = match exercise_answer.trim() {
        "" => "(no submission)",
        answer => answer,
    };

    fill_template(
        ASSESSMENT_PROMPT_TEMPLATE,
        &[
            ("role", matrix.role.as_str()),
            ("stance_instruction", stance_instruction(stance)),
            ("stance", stance.as_str()),
            ("skills", skills.as_str()),
            ("transcript", transcript.as_str()),
            ("exercise_prompt", exercise_prompt),
            ("exercise_answer", exercise_answer),
        ],
    )
}
