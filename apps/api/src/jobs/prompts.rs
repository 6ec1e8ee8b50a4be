// Job Parser LLM prompt templates.

use crate::jobs::schema::JobPosting;
use crate::llm_client::prompts::{tagged, to_prompt_json, EXACT_SHAPE_HEADER};

pub const JOB_PARSE_SYSTEM: &str = "You are a strict JSON schema extractor for job postings.";

const JOB_PARSE_RULES: &str = "\
Rules:
- No missing keys, no extra fields.
- Use double quotes only.
- experience_years must be integer.
- Dates: YYYY-MM or empty string.
- job_description_raw: keep full description (max 2000 chars).
- Keep education sorted DESC by relevance if multiple.
- Output only JSON, no markdown.";

/// Builds the extraction prompt for one posting.
pub fn build_job_parse_prompt(url: &str, posting_text: &str) -> String {
    format!(
        "{EXACT_SHAPE_HEADER}\n{}\n\n{JOB_PARSE_RULES}\n\n{}\n\n{}\n",
        to_prompt_json(&JobPosting::default()),
        tagged("JOB_URL", url),
        tagged("JOB_POSTING_TEXT", posting_text),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_schema_url_and_text() {
        let prompt = build_job_parse_prompt("https://jobs.example.com/7", "We need a Rust engineer.");
        assert!(prompt.starts_with(EXACT_SHAPE_HEADER));
        assert!(prompt.contains("\"must_have_skills\": []"));
        assert!(prompt.contains("<JOB_URL>\nhttps://jobs.example.com/7\n</JOB_URL>"));
        assert!(prompt.contains("<JOB_POSTING_TEXT>\nWe need a Rust engineer.\n</JOB_POSTING_TEXT>"));
    }
}
