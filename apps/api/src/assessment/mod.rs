// Assessment pipeline: assessor panel, normalization, scoring, disagreement.
// Every stage after the LLM call is pure and reads only the normalized result.

pub mod artifact;
pub mod assessor;
pub mod disagreement;
pub mod models;
pub mod normalizer;
pub mod prompts;
pub mod report;
pub mod scoring;
