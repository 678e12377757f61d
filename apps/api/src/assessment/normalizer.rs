//! Assessment Normalizer: turns whatever an assessor returned into a
//! matrix-complete `AssessmentResult`.
//!
//! Every matrix skill gets exactly one `SkillScore`, in matrix order. Skills the
//! assessor left out get a synthesized "no evidence" score; every score lands
//! in 1–9 and every list is cut to its maximum length.

use std::collections::HashMap;

use crate::assessment::models::{
    AssessmentResult, Confidence, RawAssessment, RawSkillScore, Recommendation, SkillScore, Stance,
};

pub const MAX_EVIDENCE: usize = 3;
pub const MAX_RISKS: usize = 2;
pub const MAX_FOLLOWUPS: usize = 2;
pub const MAX_EXERCISE_EVIDENCE: usize = 3;
pub const MAX_SUMMARY: usize = 6;

pub const NO_EVIDENCE: &str = "No evidence captured for this skill.";
const INSUFFICIENT_EVIDENCE: &str = "Insufficient evidence.";
const NO_RATIONALE: &str = "No rationale provided.";
const GENERIC_GAP: &str = "Give a concrete example from your own work, name the tools and platforms \
    used, explain how the outcome was validated, and describe how failures were handled.";
const DEFAULT_RISKS: [&str; 2] = [
    "Capability on this skill is unverified.",
    "May need close support until a track record is shown.",
];
const DEFAULT_FOLLOWUPS: [&str; 2] = [
    "Ask for a specific project where this skill was applied end to end.",
    "Ask how the result was measured and what went wrong along the way.",
];

/// Rounds to the nearest integer and clamps into 1–9. NaN maps to 1.
pub fn clamp_level(value: f64) -> u8 {
    if value.is_nan() {
        return 1;
    }
    value.round().clamp(1.0, 9.0) as u8
}

/// The score given to a skill the assessor never mentioned.
pub fn default_skill_score(skill: &str, stance: Stance) -> SkillScore {
    SkillScore {
        skill: skill.to_string(),
        score: 1,
        confidence: Confidence::Low,
        stance,
        rationale: INSUFFICIENT_EVIDENCE.to_string(),
        gap_to_next_level: GENERIC_GAP.to_string(),
        evidence: vec![NO_EVIDENCE.to_string()],
        risks: DEFAULT_RISKS.iter().map(|s| s.to_string()).collect(),
        followups: DEFAULT_FOLLOWUPS.iter().map(|s| s.to_string()).collect(),
    }
}

fn normalize_skill_score(raw: &RawSkillScore, skill: &str, stance: Stance) -> SkillScore {
    SkillScore {
        skill: skill.to_string(),
        score: clamp_level(raw.score.unwrap_or(1.0)),
        confidence: raw
            .confidence
            .as_deref()
            .and_then(Confidence::parse_lenient)
            .unwrap_or(Confidence::Medium),
        stance: raw
            .stance
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(stance),
        rationale: non_empty(raw.rationale.as_deref()).unwrap_or(NO_RATIONALE).to_string(),
        gap_to_next_level: non_empty(raw.gap_to_next_level.as_deref())
            .unwrap_or(GENERIC_GAP)
            .to_string(),
        evidence: truncated(&raw.evidence, MAX_EVIDENCE),
        risks: truncated(&raw.risks, MAX_RISKS),
        followups: truncated(&raw.followups, MAX_FOLLOWUPS),
    }
}

/// Produces a matrix-complete result from raw assessor output.
pub fn normalize_assessment(
    raw: RawAssessment,
    skill_names: &[String],
    stance: Stance,
) -> AssessmentResult {
    // Exact name match; the first entry for a name wins.
    let mut by_name: HashMap<&str, &RawSkillScore> = HashMap::new();
    for entry in &raw.skill_scores {
        if let Some(name) = entry.skill.as_deref() {
            by_name.entry(name).or_insert(entry);
        }
    }

    let skill_scores = skill_names
        .iter()
        .map(|name| match by_name.get(name.as_str()) {
            Some(entry) => normalize_skill_score(entry, name, stance),
            None => default_skill_score(name, stance),
        })
        .collect();

    AssessmentResult {
        recommendation: raw
            .recommendation
            .as_deref()
            .and_then(Recommendation::parse_lenient)
            .unwrap_or(Recommendation::LeanHire),
        skill_scores,
        exercise_score: clamp_level(raw.exercise_score.unwrap_or(1.0)),
        exercise_rationale: non_empty(raw.exercise_rationale.as_deref())
            .unwrap_or(NO_RATIONALE)
            .to_string(),
        exercise_evidence: truncated(&raw.exercise_evidence, MAX_EXERCISE_EVIDENCE),
        summary: truncated(&raw.summary, MAX_SUMMARY),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn truncated(items: &[String], max: usize) -> Vec<String> {
    items.iter().take(max).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(skills: &[&str]) -> Vec<String> {
        skills.iter().map(|s| s.to_string()).collect()
    }

    fn raw(value: serde_json::Value) -> RawAssessment {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_clamp_level_range_and_idempotence() {
        let inputs = [
            -100.0, -1.0, 0.0, 0.49, 1.0, 1.5, 4.4, 4.5, 8.6, 9.0, 9.4, 12.0, 1e9,
            f64::NAN, f64::INFINITY, f64::NEG_INFINITY,
        ];
        for n in inputs {
            let once = clamp_level(n);
            assert!((1..=9).contains(&once), "clamp({n}) = {once}");
            assert_eq!(clamp_level(f64::from(once)), once, "not idempotent for {n}");
        }
        assert_eq!(clamp_level(4.5), 5);
        assert_eq!(clamp_level(4.4), 4);
        assert_eq!(clamp_level(12.0), 9);
        assert_eq!(clamp_level(-3.0), 1);
    }

    #[test]
    fn test_missing_skill_gets_synthesized_default() {
        let result = normalize_assessment(
            raw(json!({"skill_scores": [{"skill": "A", "score": 6}]})),
            &names(&["A", "B"]),
            Stance::Strict,
        );

        assert_eq!(result.skill_scores.len(), 2);
        let b = &result.skill_scores[1];
        assert_eq!(b.skill, "B");
        assert_eq!(b.score, 1);
        assert_eq!(b.confidence, Confidence::Low);
        assert_eq!(b.stance, Stance::Strict);
        assert_eq!(b.evidence, vec![NO_EVIDENCE.to_string()]);
        assert_eq!(b.risks.len(), 2);
        assert_eq!(b.followups.len(), 2);
    }

    #[test]
    fn test_output_is_matrix_complete_for_any_input() {
        let skills = names(&["A", "B", "C"]);
        let inputs = [
            json!({}),
            json!({"skill_scores": []}),
            json!({"skill_scores": [
                {"skill": "A", "score": 3},
                {"skill": "A", "score": 9},
                {"skill": "Z", "score": 9},
                {"score": 5}
            ]}),
        ];
        for input in inputs {
            let result = normalize_assessment(raw(input), &skills, Stance::Balanced);
            let got: Vec<&str> = result.skill_scores.iter().map(|s| s.skill.as_str()).collect();
            assert_eq!(got, vec!["A", "B", "C"]);
        }

        let result = normalize_assessment(raw(json!({})), &[], Stance::Balanced);
        assert!(result.skill_scores.is_empty());
    }

    #[test]
    fn test_first_duplicate_entry_wins() {
        let result = normalize_assessment(
            raw(json!({"skill_scores": [
                {"skill": "A", "score": 3},
                {"skill": "A", "score": 9}
            ]})),
            &names(&["A"]),
            Stance::Balanced,
        );
        assert_eq!(result.skill_scores[0].score, 3);
    }

    #[test]
    fn test_present_entry_is_clamped_defaulted_and_truncated() {
        let result = normalize_assessment(
            raw(json!({"skill_scores": [{
                "skill": "A",
                "score": 11.7,
                "evidence": ["e1", "e2", "e3", "e4"],
                "risks": ["r1", "r2", "r3"],
                "followups": ["f1", "f2", "f3"]
            }]})),
            &names(&["A"]),
            Stance::Diverse,
        );
        let a = &result.skill_scores[0];
        assert_eq!(a.score, 9);
        assert_eq!(a.confidence, Confidence::Medium);
        assert_eq!(a.stance, Stance::Diverse);
        assert_eq!(a.evidence, vec!["e1", "e2", "e3"]);
        assert_eq!(a.risks, vec!["r1", "r2"]);
        assert_eq!(a.followups, vec!["f1", "f2"]);
    }

    #[test]
    fn test_assessor_stance_and_confidence_are_kept_when_valid() {
        let result = normalize_assessment(
            raw(json!({"skill_scores": [{
                "skill": "A", "score": 5, "confidence": "HIGH", "stance": "strict"
            }]})),
            &names(&["A"]),
            Stance::Balanced,
        );
        assert_eq!(result.skill_scores[0].confidence, Confidence::High);
        assert_eq!(result.skill_scores[0].stance, Stance::Strict);
    }

    #[test]
    fn test_top_level_defaults() {
        let summary: Vec<String> = (0..10).map(|i| format!("point {i}")).collect();
        let result = normalize_assessment(
            raw(json!({"exercise_score": 0, "summary": summary, "recommendation": "unsure"})),
            &names(&["A"]),
            Stance::Balanced,
        );
        assert_eq!(result.recommendation, Recommendation::LeanHire);
        assert_eq!(result.exercise_score, 1);
        assert_eq!(result.summary.len(), MAX_SUMMARY);
        assert_eq!(result.exercise_rationale, NO_RATIONALE);
    }

    #[test]
    fn test_recommendation_is_kept_when_recognised() {
        let result = normalize_assessment(
            raw(json!({"recommendation": "No Hire", "exercise_score": "7"})),
            &names(&["A"]),
            Stance::Balanced,
        );
        assert_eq!(result.recommendation, Recommendation::NoHire);
        assert_eq!(result.exercise_score, 7);
    }
}
