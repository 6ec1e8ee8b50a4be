// Resume Parser LLM prompt templates.

use crate::llm_client::prompts::{tagged, to_prompt_json, EXACT_SHAPE_HEADER};
use crate::resumes::schema::ResumeData;

pub const RESUME_PARSE_SYSTEM: &str = "You are a JSON schema extractor. Return ONLY valid JSON \
strictly matching the provided template and order.";

const RESUME_KEY_RULES: &str = "\
KEY RULES AND DEFINITIONS
1. candidate_name (string): Full candidate name.
2. contact_info (object):
   - email (string, lowercase)
   - phone (string, \"xxx-xxx-xxxx\" or \"\")
   - linkedin (string, full URL)
   - portfolio (string or \"\")
   - location (string, city + state/country)
3. current_role (string): Current or most recent job title.
4. experience_years (integer): Total full years of professional experience.
5. core_competencies (array[str]): 3-10 key soft or domain skills.
6. skills (array[str]): 5-15 technical tools/languages.
7. education (array[object]): Each item has {\"institution\",\"degree\",\"year(int)\"} sorted by year DESC.
8. work_experience (array[object]):
   - company, role, employment_type, start_date(YYYY-MM), end_date(YYYY-MM or \"\"), is_current(bool), description.
9. achievements (array[str]): 2-5 notable achievements.
10. projects (array[object]): Each item has:
    - title (string)
    - tech_stack (array[str])
    - details (array[str]): Use ALL relevant lines present in the resume. Preserve original phrasing and length. Keep each bullet as a single string.
    - github_url (string URL or \"\")
    - live_url (string URL or \"\")

ADDITIONAL RULES
- Keep same key order as above.
- Use double quotes only.
- Empty fields -> \"\" or [].
- Output must be pure JSON, no markdown, no comments.
- Do NOT fabricate data: only include projects and links present in the resume text; if unsure, set github_url/live_url to \"\".
- Do NOT truncate or shorten project details.";

pub fn build_resume_parse_prompt(resume_text: &str) -> String {
    format!(
        "{EXACT_SHAPE_HEADER}\n{}\n\nNo missing keys, no extra text. Follow the exact rules below.\n\n\
         {RESUME_KEY_RULES}\n\n{}\n",
        to_prompt_json(&ResumeData::default()),
        tagged("RESUME_TEXT", resume_text),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_schema_and_text() {
        let prompt = build_resume_parse_prompt("Jane Doe\nRust engineer");
        assert!(prompt.starts_with(EXACT_SHAPE_HEADER));
        assert!(prompt.contains("\"work_experience\": []"));
        assert!(prompt.contains("<RESUME_TEXT>\nJane Doe\nRust engineer\n</RESUME_TEXT>"));
    }
}
