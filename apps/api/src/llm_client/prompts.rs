// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

use serde::Serialize;

/// Header placed above every fixed-shape schema the model must fill.
pub const EXACT_SHAPE_HEADER: &str =
    "You must return ONLY valid JSON that follows this exact structure and key order:";

/// Pretty-prints a value for embedding in a prompt. Non-ASCII text is kept as-is.
pub fn to_prompt_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Wraps a block of prompt input in an XML-style tag, e.g. `<JOB_DATA>...</JOB_DATA>`.
pub fn tagged(tag: &str, body: &str) -> String {
    format!("<{tag}>\n{body}\n</{tag}>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tagged_wraps_body() {
        assert_eq!(tagged("JOB_URL", "https://x"), "<JOB_URL>\nhttps://x\n</JOB_URL>");
    }

    #[test]
    fn test_to_prompt_json_keeps_unicode() {
        let text = to_prompt_json(&json!({"name": "Zoë"}));
        assert!(text.contains("Zoë"));
        assert!(text.contains('\n'));
    }
}
