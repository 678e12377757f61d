//! Scoring Aggregator: 1–9 levels to a single 0–100 score.
//!
//! overall = round(0.7 × weighted skills + 0.3 × exercise), both on 0–100.

use serde::{Deserialize, Serialize};

use crate::assessment::models::{AssessmentResult, SkillScore};
use crate::assessment::normalizer::clamp_level;
use crate::matrix::SkillsMatrix;

/// Fixed policy split between skills and the exercise.
pub const SKILLS_SHARE: f64 = 0.7;
pub const EXERCISE_SHARE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub skills_score: u32,
    pub exercise_score: u32,
    pub overall_score: u32,
}

impl ScoreCard {
    pub fn compute(result: &AssessmentResult, matrix: &SkillsMatrix) -> Self {
        let skills_score = weighted_skill_score(&result.skill_scores, matrix);
        let exercise_score = exercise_score(result.exercise_score);
        Self {
            skills_score,
            exercise_score,
            overall_score: overall_score(skills_score, exercise_score),
        }
    }
}

/// Maps a 1–9 level onto 0–100: round(((level − 1) / 8) × 100).
pub fn level_to_percent(level: f64) -> u32 {
    (((level - 1.0) / 8.0) * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Weighted mean of the scores, using matrix weights (unknown skills weigh 0),
/// mapped to 0–100. Zero total weight scores 0.
pub fn weighted_skill_score(scores: &[SkillScore], matrix: &SkillsMatrix) -> u32 {
    let (weighted_sum, total_weight) = scores.iter().fold((0.0, 0.0), |(sum, total), s| {
        let weight = matrix.weight_of(&s.skill);
        (sum + weight * f64::from(s.score), total + weight)
    });

    if total_weight <= 0.0 {
        return 0;
    }
    level_to_percent(weighted_sum / total_weight)
}

pub fn exercise_score(level: u8) -> u32 {
    level_to_percent(f64::from(clamp_level(f64::from(level))))
}

pub fn overall_score(skills_score: u32, exercise_score: u32) -> u32 {
    (SKILLS_SHARE * f64::from(skills_score) + EXERCISE_SHARE * f64::from(exercise_score)).round()
        as u32
}
