use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("Failed to read skills matrix: {0}")]
    Io(#[from] std::io::Error),

    #[error("Skills matrix is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid skills matrix: {0}")]
    Shape(String),
}

/// A named capability and its aggregation weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub name: String,
    pub weight: f64,
}

/// The role's skills matrix. Read once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillsMatrix {
    pub role: String,
    pub skills: Vec<SkillDefinition>,
}

impl SkillsMatrix {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MatrixError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, MatrixError> {
        let matrix: SkillsMatrix = serde_json::from_str(raw)?;
        matrix.validate()?;
        Ok(matrix)
    }

    /// Shape checks only: non-empty, unique names, positive finite weights.
    pub fn validate(&self) -> Result<(), MatrixError> {
        if self.skills.is_empty() {
            return Err(MatrixError::Shape("at least one skill is required".to_string()));
        }

        let mut seen = HashSet::new();
        for skill in &self.skills {
            if skill.name.trim().is_empty() {
                return Err(MatrixError::Shape("skill names must be non-empty".to_string()));
            }
            if !seen.insert(skill.name.as_str()) {
                return Err(MatrixError::Shape(format!(
                    "duplicate skill name '{}'",
                    skill.name
                )));
            }
            if !skill.weight.is_finite() || skill.weight <= 0.0 {
                return Err(MatrixError::Shape(format!(
                    "skill '{}' must have a positive weight",
                    skill.name
                )));
            }
        }
        Ok(())
    }

    pub fn skill_names(&self) -> Vec<String> {
        self.skills.iter().map(|s| s.name.clone()).collect()
    }

    /// Weight of a skill, or 0 for names outside the matrix.
    pub fn weight_of(&self, name: &str) -> f64 {
        self.skills
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.weight)
            .unwrap_or(0.0)
    }
}
