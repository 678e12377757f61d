//! Disagreement Analyzer: per-skill spread of scores across assessors.

use serde::{Deserialize, Serialize};

use crate::assessment::models::AssessmentResult;

/// How many rows are called out as the biggest disagreements.
pub const TOP_DISAGREEMENTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisagreementRow {
    pub skill: String,
    /// One score per assessor, in assessor order.
    pub scores: Vec<u8>,
    pub min: u8,
    pub max: u8,
    pub spread: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisagreementReport {
    /// All skills, highest spread first; ties keep skill-plan order.
    pub rows: Vec<DisagreementRow>,
    pub biggest: Vec<DisagreementRow>,
}

/// Compares assessor results skill by skill, using the first result's skill order.
pub fn analyze_disagreement(results: &[AssessmentResult]) -> DisagreementReport {
    let Some(first) = results.first() else {
        return DisagreementReport::default();
    };

    let mut rows: Vec<DisagreementRow> = first
        .skill_scores
        .iter()
        .map(|s| {
            let scores: Vec<u8> = results
                .iter()
                .map(|r| r.score_for(&s.skill).unwrap_or(1))
                .collect();
            let min = scores.iter().copied().min().unwrap_or(1);
            let max = scores.iter().copied().max().unwrap_or(1);
            DisagreementRow {
                skill: s.skill.clone(),
                scores,
                min,
                max,
                spread: max - min,
            }
        })
        .collect();

    // Stable: equal spreads stay in skill order.
    rows.sort_by(|a, b| b.spread.cmp(&a.spread));
    let biggest = rows.iter().take(TOP_DISAGREEMENTS).cloned().collect();

    DisagreementReport { rows, biggest }
}
