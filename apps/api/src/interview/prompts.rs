// Interview Prep LLM prompt templates.

use crate::interview::InterviewType;
use crate::jobs::schema::JobPosting;
use crate::llm_client::prompts::{tagged, to_prompt_json};
use crate::resumes::schema::ResumeData;

pub const QUESTIONS_SYSTEM: &str = "You return ONLY valid JSON objects with the single key 'items' \
containing an array of strings. No markdown or extra text.";
pub const ANSWERS_SYSTEM: &str = "You return ONLY valid JSON objects with the single key 'items' \
containing an array of strings. Answer concisely and professionally.";

pub fn build_questions_prompt(
    job: &JobPosting,
    resume: &ResumeData,
    interview_type: InterviewType,
    count: u32,
) -> String {
    let instructions = format!(
        "You MUST return ONLY a JSON object with a single key \"items\" whose value is a JSON array of strings. Each string is ONE interview question.\n\
         Rules:\n\
         - Output strictly a JSON object: {{\"items\": [\"question1\", \"question2\", ...]}}\n\
         - Use double quotes only, valid JSON, no trailing commas, no markdown.\n\
         - Tailor questions to BOTH the job requirements and the candidate resume.\n\
         - Avoid generic questions; be specific and relevant.\n\
         - Interview type: {interview_type}\n\
         - Number of questions: {count}\n\n\
         Scoping guidance by interview type:\n\
         - technical: focus on technologies, architecture, problem-solving, code reasoning.\n\
         - behavioral: focus on past experiences, teamwork, leadership, conflict resolution (STAR-oriented).\n\
         - system_design: focus on scalability, reliability, trade-offs, diagrams mental models.\n\
         - mixed: balanced mixture of technical and behavioral.\n\n\
         Return ONLY the JSON object with the key \"items\"."
    );
    format!(
        "{}\n\n{}\n\n{}\n",
        tagged("INSTRUCTIONS", &instructions),
        tagged("JOB_DATA", &to_prompt_json(job)),
        tagged("RESUME_DATA", &to_prompt_json(resume)),
    )
}

pub fn build_answers_prompt(
    job: &JobPosting,
    resume: &ResumeData,
    interview_type: InterviewType,
    questions: &[String],
) -> String {
    let instructions = format!(
        "You MUST return ONLY a JSON object with a single key \"items\" whose value is a JSON array of strings. Each string is ONE answer to the corresponding question in the same order.\n\
         Rules:\n\
         - Output strictly a JSON object: {{\"items\": [\"answer1\", \"answer2\", ...]}}\n\
         - Use double quotes only, valid JSON, no trailing commas, no markdown.\n\
         - Be concise, professional, and specific (avoid single-word answers).\n\
         - Ground answers in BOTH the job requirements and the candidate's resume.\n\
         - Interview type: {interview_type}; adapt tone and content accordingly.\n\
         - Where useful, structure answers implicitly per STAR (Situation-Task-Action-Result) without labeling.\n\
         - Avoid revealing that you used a resume or job posting; speak as the candidate.\n\
         Return ONLY the JSON object with the key \"items\"."
    );
    format!(
        "{}\n\n{}\n\n{}\n\n{}\n",
        tagged("INSTRUCTIONS", &instructions),
        tagged("JOB_DATA", &to_prompt_json(job)),
        tagged("RESUME_DATA", &to_prompt_json(resume)),
        tagged("QUESTIONS", &to_prompt_json(questions)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_questions_prompt_mentions_type_and_count() {
        let prompt = build_questions_prompt(
            &JobPosting::default(),
            &ResumeData::default(),
            InterviewType::SystemDesign,
            4,
        );
        assert!(prompt.contains("- Interview type: system_design\n"));
        assert!(prompt.contains("- Number of questions: 4\n"));
        assert!(prompt.contains("{\"items\": [\"question1\""));
    }

    #[test]
    fn test_answers_prompt_lists_questions() {
        let prompt = build_answers_prompt(
            &JobPosting::default(),
            &ResumeData::default(),
            InterviewType::Mixed,
            &["Why Rust?".to_string()],
        );
        assert!(prompt.contains("<QUESTIONS>\n[\n  \"Why Rust?\"\n]\n</QUESTIONS>"));
    }
}
