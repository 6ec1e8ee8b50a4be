// Resume Enhancer LLM prompt templates.

use serde_json::json;

use crate::jobs::schema::JobPosting;
use crate::llm_client::prompts::{tagged, to_prompt_json};
use crate::resumes::schema::ResumeData;

pub const ENHANCE_SYSTEM: &str = "You transform resume_data into final HTML using the provided \
template. Return ONLY a JSON object {\"html\": \"...\"}. Never fabricate.";

const ENHANCE_RULES: &str = "\
You must return ONLY valid JSON with the shape {\"html\": \"...\"}.
The html must be a complete HTML document ready for printing (no markdown).
Strict rules (NO FABRICATION):
- Use ONLY information present in resume_data.
- You MAY tailor phrasing and ordering using job_data and optimization_tips, but DO NOT add new projects, roles, degrees, dates, or achievements not present in resume_data.
- You MAY rephrase bullet points for clarity and impact, quantify only when actual numbers exist in resume_data.
- You MAY reorder sections or bullets to prioritize role-relevant info.
Template constraints:
- Preserve the original template's structure, layout, class names, and inline styles.
- Replace placeholders like {{ full_name }}, {{ skills_chips }}, etc. with actual content from resume_data.
- Keep semantic sections (Summary, Skills, Experience, Education, Projects, Achievements).";

pub fn build_enhance_prompt(
    template_html: &str,
    resume: &ResumeData,
    job: &JobPosting,
    tips: &[String],
) -> String {
    format!(
        "Return ONLY valid JSON with this exact shape:\n{}\n\n{ENHANCE_RULES}\n\n{}\n\n{}\n\n{}\n\n{}\n",
        to_prompt_json(&json!({"html": ""})),
        tagged("TEMPLATE_HTML", template_html),
        tagged("RESUME_DATA", &to_prompt_json(resume)),
        tagged("JOB_DATA", &to_prompt_json(job)),
        tagged("OPTIMIZATION_TIPS", &to_prompt_json(tips)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_sections() {
        let prompt = build_enhance_prompt(
            "<html>{{ full_name }}</html>",
            &ResumeData::default(),
            &JobPosting::default(),
            &["Quantify impact".to_string()],
        );
        assert!(prompt.contains("<TEMPLATE_HTML>\n<html>{{ full_name }}</html>\n</TEMPLATE_HTML>"));
        assert!(prompt.contains("\"Quantify impact\""));
        assert!(prompt.contains("NO FABRICATION"));
    }
}
