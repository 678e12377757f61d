// Shared prompt fragments used by the gateway itself.
// Each service that needs model calls defines its own prompts.rs alongside it.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Builds the one-shot repair request around the unparseable reply.
pub fn repair_prompt(content: &str) -> String {
    format!(
        "The following text was supposed to be a single valid JSON object but could not be parsed. \
        Return the same information as valid JSON only, with no commentary.\n\n{content}"
    )
}

/// Fills `{name}` placeholders in one pass over `template`. Substituted
/// values are never rescanned, so text that itself contains `{name}` is
/// inserted verbatim. Braces that do not form a known placeholder are kept.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after_brace = &rest[start + 1..];
        let hit = values.iter().find(|(key, _)| {
            after_brace
                .strip_prefix(key)
                .is_some_and(|tail| tail.starts_with('}'))
        });
        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &after_brace[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = after_brace;
            }
        }
    }
    out.push_str(rest);
    out
}
