use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::assessment::models::{AssessorConfig, Stance};
use crate::interview::flow::InterviewSettings;
use crate::interview::prompts::DEFAULT_EXERCISE_PROMPT;
use crate::llm_client::RetryPolicy;

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_ASSESSORS: &str = "gpt-4o=strict,gpt-4o-mini=balanced,gpt-4.1-mini=diverse";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm_api_key: String,
    pub llm_base_url: String,
    pub planner_model: String,
    pub followup_model: String,
    pub answer_model: String,
    pub assessors: Vec<AssessorConfig>,
    pub max_followups_per_skill: u32,
    pub llm_max_attempts: u32,
    pub llm_initial_backoff_ms: u64,
    pub llm_max_backoff_ms: u64,
    pub llm_timeout_secs: u64,
    pub skills_matrix_path: PathBuf,
    /// Optional file overriding the built-in take-home exercise.
    pub exercise_prompt_path: Option<PathBuf>,
    pub results_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            llm_api_key: require_env("LLM_API_KEY")?,
            llm_base_url: env_or("LLM_BASE_URL", "https://api.openai.com/v1"),
            planner_model: env_or("PLANNER_MODEL", DEFAULT_MODEL),
            followup_model: env_or("FOLLOWUP_MODEL", DEFAULT_MODEL),
            answer_model: env_or("ANSWER_MODEL", DEFAULT_MODEL),
            assessors: parse_assessors(&env_or("ASSESSOR_MODELS", DEFAULT_ASSESSORS))
                .context("ASSESSOR_MODELS must be a comma list of model=stance")?,
            max_followups_per_skill: parse_env("MAX_FOLLOWUPS_PER_SKILL", 2)?,
            llm_max_attempts: parse_env("LLM_MAX_ATTEMPTS", 4)?,
            llm_initial_backoff_ms: parse_env("LLM_INITIAL_BACKOFF_MS", 1000)?,
            llm_max_backoff_ms: parse_env("LLM_MAX_BACKOFF_MS", 8000)?,
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            skills_matrix_path: env_or("SKILLS_MATRIX_PATH", "skills_matrix.json").into(),
            exercise_prompt_path: std::env::var("EXERCISE_PROMPT_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            results_dir: env_or("RESULTS_DIR", "results").into(),
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.llm_max_attempts.max(1),
            initial_delay: Duration::from_millis(self.llm_initial_backoff_ms),
            max_delay: Duration::from_millis(
                self.llm_max_backoff_ms.max(self.llm_initial_backoff_ms),
            ),
        }
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    /// Reads the exercise override if one is configured.
    pub fn interview_settings(&self) -> Result<InterviewSettings> {
        let exercise_prompt = match &self.exercise_prompt_path {
            Some(path) => {
                let text = std::fs::read_to_string(path).with_context(|| {
                    format!("Failed to read exercise prompt {}", path.display())
                })?;
                if text.trim().is_empty() {
                    bail!("Exercise prompt {} is empty", path.display());
                }
                text.trim().to_string()
            }
            None => DEFAULT_EXERCISE_PROMPT.to_string(),
        };

        Ok(InterviewSettings {
            planner_model: self.planner_model.clone(),
            followup_model: self.followup_model.clone(),
            answer_model: self.answer_model.clone(),
            assessors: self.assessors.clone(),
            max_followups_per_skill: self.max_followups_per_skill,
            exercise_prompt,
            results_dir: self.results_dir.clone(),
        })
    }
}

/// Parses `model=stance,model=stance`. A bare model name gets the balanced stance.
pub fn parse_assessors(raw: &str) -> Result<Vec<AssessorConfig>> {
    let assessors = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (model, stance) = match part.split_once('=') {
                Some((model, stance)) => (
                    model.trim(),
                    Stance::from_str(stance).map_err(anyhow::Error::msg)?,
                ),
                None => (part, Stance::Balanced),
            };
            if model.is_empty() {
                bail!("assessor entry '{part}' has no model");
            }
            Ok(AssessorConfig {
                model: model.to_string(),
                stance,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if assessors.is_empty() {
        bail!("at least one assessor is required");
    }
    Ok(assessors)
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            llm_api_key: "key".to_string(),
            llm_base_url: "http://localhost".to_string(),
            planner_model: "p".to_string(),
            followup_model: "f".to_string(),
            answer_model: "a".to_string(),
            assessors: parse_assessors(DEFAULT_ASSESSORS).unwrap(),
            max_followups_per_skill: 2,
            llm_max_attempts: 0,
            llm_initial_backoff_ms: 500,
            llm_max_backoff_ms: 100,
            llm_timeout_secs: 30,
            skills_matrix_path: "skills_matrix.json".into(),
            exercise_prompt_path: None,
            results_dir: "results".into(),
            port: 8080,
            rust_log: "info".to_string(),
        }
    }

    #[test]
    fn test_default_assessors_cover_every_stance() {
        let assessors = parse_assessors(DEFAULT_ASSESSORS).unwrap();
        let stances: Vec<Stance> = assessors.iter().map(|a| a.stance).collect();
        assert_eq!(stances, vec![Stance::Strict, Stance::Balanced, Stance::Diverse]);
    }

    #[test]
    fn test_parse_assessors_trims_and_defaults_stance() {
        let assessors = parse_assessors(" m1 = Strict , m2 ,").unwrap();
        assert_eq!(assessors.len(), 2);
        assert_eq!(assessors[0].model, "m1");
        assert_eq!(assessors[0].stance, Stance::Strict);
        assert_eq!(assessors[1].stance, Stance::Balanced);
    }

    #[test]
    fn test_parse_assessors_rejects_bad_input() {
        assert!(parse_assessors("").is_err());
        assert!(parse_assessors("m1=lenient").is_err());
        assert!(parse_assessors("=strict").is_err());
    }

    #[test]
    fn test_retry_policy_is_sane_for_odd_values() {
        let policy = config().retry_policy();
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.max_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_exercise_prompt_override() {
        let mut cfg = config();
        assert_eq!(
            cfg.interview_settings().unwrap().exercise_prompt,
            DEFAULT_EXERCISE_PROMPT
        );

        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "  Build a classifier prompt.\n").unwrap();
        cfg.exercise_prompt_path = Some(file.path().to_path_buf());
        assert_eq!(
            cfg.interview_settings().unwrap().exercise_prompt,
            "Build a classifier prompt."
        );

        std::fs::write(file.path(), "   ").unwrap();
        assert!(cfg.interview_settings().is_err());
    }
}
