// Interview flow prompt templates.
// All prompts for planning, follow-up probing and simulated answers live here.

use crate::interview::models::{PlanItem, QaEntry};
use crate::llm_client::prompts::fill_template;
use crate::matrix::SkillsMatrix;

pub const PLAN_SYSTEM: &str = "\
You are a senior technical interviewer designing a structured, evidence-seeking interview. \
You MUST respond with valid JSON only. No markdown fences, no explanations.";

pub const PLAN_PROMPT_TEMPLATE: &str = r#"Design the opening interview question for each skill below.
The role is: {role}

SKILLS (one question per skill, in this order):
{skills}

Each question must ask for a concrete example from the candidate's own work and invite them to name
the tools or platforms used, the measurable outcome, how the result was validated, and how failures
were handled. Keep each question to one or two sentences.

OUTPUT SCHEMA (return exactly this structure):
{
  "questions": [
    {"skill": "exact skill name from the list", "question": "string"}
  ]
}"#;

pub const FOLLOWUP_SYSTEM: &str = "\
You are a rigorous interviewer deciding whether one more probing question is needed. \
You MUST respond with valid JSON only. No markdown fences, no explanations.";

pub const FOLLOWUP_PROMPT_TEMPLATE: &str = r#"Skill under discussion: {skill}

RECENT EXCHANGES FOR THIS SKILL (oldest first):
{exchanges}

Ask a follow-up ONLY if the evidence is vague or missing on any of:
- a concrete example
- tools / platforms used
- a measurable outcome
- how the work was validated
- how failures were handled

If the evidence is already sufficient, do not ask a follow-up.

OUTPUT SCHEMA (return exactly this structure):
{
  "followup": true | false,
  "question": "the single follow-up question, or empty string",
  "missing": ["which of the dimensions above are vague or missing"]
}"#;

pub const ANSWER_SYSTEM: &str = "\
You are role-playing a job candidate in a technical interview. \
Answer in the first person, in plain prose, with no preamble and no markdown.";

pub const ANSWER_PROMPT_TEMPLATE: &str = r#"Role being interviewed for: {role}
Skill: {skill}
Question: {question}

Answer as a candidate whose capability on this skill is level {level} on a 1-9 scale
(1 = no real experience, 5 = solid practitioner, 9 = recognised expert).
Match the depth, specificity and accuracy of the answer to that level."#;

pub const EXERCISE_ANSWER_PROMPT_TEMPLATE: &str = r#"Role being interviewed for: {role}

TAKE-HOME EXERCISE:
{exercise}

Write the submission a candidate at level {level} on a 1-9 scale would hand in
(1 = barely attempts it, 5 = competent, 9 = exceptional). Return only the submission."#;

/// Fallback exercise wording when no exercise file is configured.
pub const DEFAULT_EXERCISE_PROMPT: &str = "\
Design a prompt that makes a language model summarise a customer support ticket into a JSON object \
with the fields `category`, `urgency` (low | medium | high) and `summary` (max 40 words). \
Include: the full prompt, two example tickets you would test it with, how you would validate the \
output automatically, and what you would change if the model returned malformed JSON 5% of the time.";

pub fn plan_prompt(matrix: &SkillsMatrix) -> String {
    let skills = matrix
        .skills
        .iter()
        .map(|s| format!("- {}", s.name))
        .collect::<Vec<_>>()
        .join("\n");
    fill_template(
        PLAN_PROMPT_TEMPLATE,
        &[("role", matrix.role.as_str()), ("skills", skills.as_str())],
    )
}

pub fn followup_prompt(skill: &str, exchanges: &[QaEntry]) -> String {
    let exchanges = exchanges
        .iter()
        .map(|e| format!("Q: {}\nA: {}", e.question, e.answer))
        .collect::<Vec<_>>()
        .join("\n\n");
    fill_template(
        FOLLOWUP_PROMPT_TEMPLATE,
        &[("skill", skill), ("exchanges", exchanges.as_str())],
    )
}

pub fn answer_prompt(role: &str, item: &PlanItem, question: &str, level: u8) -> String {
    let level = level.to_string();
    fill_template(
        ANSWER_PROMPT_TEMPLATE,
        &[
            ("role", role),
            ("skill", item.skill.as_str()),
            ("question", question),
            ("level", level.as_str()),
        ],
    )
}

pub fn exercise_answer_prompt(role: &str, exercise: &str, level: u8) -> String {
    let level = level.to_string();
    fill_template(
        EXERCISE_ANSWER_PROMPT_TEMPLATE,
        &[
            ("role", role),
            ("exercise", exercise),
            ("level", level.as_str()),
        ],
    )
}
