use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::llm_client::lenient::{lenient_number, lenient_string, lenient_string_list};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "low" => Some(Confidence::Low),
            "medium" | "med" | "moderate" => Some(Confidence::Medium),
            "high" => Some(Confidence::High),
            _ => None,
        }
    }
}

/// Scoring posture of an assessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    /// Evidence-only.
    Strict,
    /// Reasonable inference allowed.
    Balanced,
    /// Independent critique.
    Diverse,
}

impl Stance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stance::Strict => "strict",
            Stance::Balanced => "balanced",
            Stance::Diverse => "diverse",
        }
    }
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(Stance::Strict),
            "balanced" => Ok(Stance::Balanced),
            "diverse" => Ok(Stance::Diverse),
            other => Err(format!(
                "unknown stance '{other}' (expected strict, balanced or diverse)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Strong Hire")]
    StrongHire,
    Hire,
    #[serde(rename = "Lean Hire")]
    LeanHire,
    #[serde(rename = "Lean No Hire")]
    LeanNoHire,
    #[serde(rename = "No Hire")]
    NoHire,
}

impl Recommendation {
    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::StrongHire => "Strong Hire",
            Recommendation::Hire => "Hire",
            Recommendation::LeanHire => "Lean Hire",
            Recommendation::LeanNoHire => "Lean No Hire",
            Recommendation::NoHire => "No Hire",
        }
    }

    /// Accepts the label in any case, with spaces, dashes or underscores.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        let key: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "stronghire" => Some(Recommendation::StrongHire),
            "hire" => Some(Recommendation::Hire),
            "leanhire" => Some(Recommendation::LeanHire),
            "leannohire" => Some(Recommendation::LeanNoHire),
            "nohire" => Some(Recommendation::NoHire),
            _ => None,
        }
    }
}

/// An independent evaluator: which model, with which posture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessorConfig {
    pub model: String,
    pub stance: Stance,
}

impl AssessorConfig {
    pub fn label(&self) -> String {
        format!("{} ({})", self.model, self.stance)
    }
}

/// One skill as scored by one assessor, after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillScore {
    pub skill: String,
    /// 1–9.
    pub score: u8,
    pub confidence: Confidence,
    pub stance: Stance,
    pub rationale: String,
    pub gap_to_next_level: String,
    /// At most 3.
    pub evidence: Vec<String>,
    /// At most 2.
    pub risks: Vec<String>,
    /// At most 2.
    pub followups: Vec<String>,
}

/// A fully-populated assessor result: exactly one `SkillScore` per matrix
/// skill, in matrix order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub recommendation: Recommendation,
    pub skill_scores: Vec<SkillScore>,
    pub exercise_score: u8,
    pub exercise_rationale: String,
    pub exercise_evidence: Vec<String>,
    pub summary: Vec<String>,
}

impl AssessmentResult {
    pub fn score_for(&self, skill: &str) -> Option<u8> {
        self.skill_scores
            .iter()
            .find(|s| s.skill == skill)
            .map(|s| s.score)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Raw assessor output: every field optional, types tolerated loosely
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawAssessment {
    #[serde(deserialize_with = "lenient_string")]
    pub recommendation: Option<String>,
    #[serde(alias = "skills", alias = "scores", deserialize_with = "lenient_skill_entries")]
    pub skill_scores: Vec<RawSkillScore>,
    #[serde(deserialize_with = "lenient_number")]
    pub exercise_score: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub exercise_rationale: Option<String>,
    #[serde(deserialize_with = "lenient_string_list")]
    pub exercise_evidence: Vec<String>,
    #[serde(deserialize_with = "lenient_string_list")]
    pub summary: Vec<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct RawSkillScore {
    #[serde(alias = "name", deserialize_with = "lenient_string")]
    pub skill: Option<String>,
    #[serde(alias = "level", deserialize_with = "lenient_number")]
    pub score: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub confidence: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub stance: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub rationale: Option<String>,
    #[serde(alias = "gap", deserialize_with = "lenient_string")]
    pub gap_to_next_level: Option<String>,
    #[serde(alias = "evidence_bullets", deserialize_with = "lenient_string_list")]
    pub evidence: Vec<String>,
    #[serde(deserialize_with = "lenient_string_list")]
    pub risks: Vec<String>,
    #[serde(deserialize_with = "lenient_string_list")]
    pub followups: Vec<String>,
}

/// Accepts a list of skill objects, or an object keyed by skill name.
fn lenient_skill_entries<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<RawSkillScore>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| serde_json::from_value::<RawSkillScore>(v).ok())
            .collect(),
        Some(Value::Object(map)) => map
            .into_iter()
            .filter_map(|(name, v)| {
                let mut entry = match v {
                    Value::Object(_) => serde_json::from_value::<RawSkillScore>(v).ok()?,
                    Value::Number(n) => RawSkillScore {
                        score: n.as_f64(),
                        ..RawSkillScore::default()
                    },
                    _ => return None,
                };
                entry.skill.get_or_insert(name);
                Some(entry)
            })
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_serde_uses_labels() {
        let json = serde_json::to_string(&Recommendation::LeanNoHire).unwrap();
        assert_eq!(json, r#""Lean No Hire""#);
        let parsed: Recommendation = serde_json::from_str(r#""Strong Hire""#).unwrap();
        assert_eq!(parsed, Recommendation::StrongHire);
    }

    #[test]
    fn test_recommendation_parse_lenient() {
        assert_eq!(
            Recommendation::parse_lenient("lean_no_hire"),
            Some(Recommendation::LeanNoHire)
        );
        assert_eq!(
            Recommendation::parse_lenient("STRONG-HIRE"),
            Some(Recommendation::StrongHire)
        );
        assert_eq!(Recommendation::parse_lenient("maybe"), None);
    }

    #[test]
    fn test_stance_from_str() {
        assert_eq!("Strict".parse::<Stance>().unwrap(), Stance::Strict);
        assert!("lenient".parse::<Stance>().is_err());
    }

    #[test]
    fn test_raw_assessment_tolerates_loose_types() {
        let raw: RawAssessment = serde_json::from_str(
            r#"{
                "recommendation": "Hire",
                "skill_scores": [
                    {"skill": "A", "score": "7", "evidence": "single bullet", "risks": null},
                    {"name": "B", "score": 4.6, "evidence_bullets": ["x", 3, null, " "]},
                    "not an object"
                ],
                "exercise_score": null,
                "summary": ["ok"]
            }"#,
        )
        .unwrap();

        assert_eq!(raw.skill_scores.len(), 2);
        assert_eq!(raw.skill_scores[0].score, Some(7.0));
        assert_eq!(raw.skill_scores[0].evidence, vec!["single bullet"]);
        assert!(raw.skill_scores[0].risks.is_empty());
        assert_eq!(raw.skill_scores[1].skill.as_deref(), Some("B"));
        assert_eq!(raw.skill_scores[1].evidence, vec!["x", "3"]);
        assert!(raw.exercise_score.is_none());
    }

    #[test]
    fn test_raw_assessment_accepts_skills_keyed_by_name() {
        let raw: RawAssessment = serde_json::from_str(
            r#"{"skills": {"A": {"score": 8, "confidence": "high"}, "B": 3}}"#,
        )
        .unwrap();
        let a = raw
            .skill_scores
            .iter()
            .find(|s| s.skill.as_deref() == Some("A"))
            .unwrap();
        assert_eq!(a.score, Some(8.0));
        let b = raw
            .skill_scores
            .iter()
            .find(|s| s.skill.as_deref() == Some("B"))
            .unwrap();
        assert_eq!(b.score, Some(3.0));
    }

    #[test]
    fn test_empty_object_is_a_valid_raw_assessment() {
        let raw: RawAssessment = serde_json::from_str("{}").unwrap();
        assert!(raw.skill_scores.is_empty());
        assert!(raw.recommendation.is_none());
    }
}
