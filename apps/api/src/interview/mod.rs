// Interview flow: planning, skill-by-skill questioning with follow-ups,
// the exercise step and finish. Sessions live in a `SessionStore`.
// All model calls go through llm_client.

pub mod finish;
pub mod flow;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod store;
