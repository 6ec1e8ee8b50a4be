// Candidate Analysis LLM prompt templates, one per pipeline step.

use serde_json::json;

use crate::analysis::schema::{AnalysisTemplate, Course};
use crate::jobs::schema::JobPosting;
use crate::llm_client::prompts::{tagged, to_prompt_json, EXACT_SHAPE_HEADER};
use crate::resumes::schema::ResumeData;
use crate::search_client::SearchHit;

const RETURN_SHAPE_HEADER: &str = "Return ONLY valid JSON with this exact shape:";

pub const MISSING_SKILLS_SYSTEM: &str = "Return ONLY a JSON object with missing_skills: [...].";
pub const EXPAND_SKILLS_SYSTEM: &str = "Return ONLY a JSON object {\"items\": [...]}.";
pub const RANK_COURSES_SYSTEM: &str =
    "Return ONLY a JSON object {\"items\": [...]} with name/platform/url.";
pub const FINAL_ANALYSIS_SYSTEM: &str = "You are a strict JSON analysis engine for job-resume \
matching. Return ONLY the JSON object exactly in the provided shape.";

/// Search hits shown to the ranking step.
pub const MAX_RANKED_HITS: usize = 12;

pub fn build_missing_skills_prompt(job: &JobPosting, resume: &ResumeData) -> String {
    format!(
        "{RETURN_SHAPE_HEADER}\n{}\n\n\
         Rules:\n\
         - Compare the job requirements (skills, competencies) with the candidate resume skills.\n\
         - Provide a concise list of truly missing or significantly weak skills for the candidate to learn next.\n\
         - Use double quotes only and no markdown.\n\n\
         {}\n\n{}\n",
        to_prompt_json(&json!({"missing_skills": [""]})),
        tagged("JOB_DATA", &to_prompt_json(job)),
        tagged("RESUME_DATA", &to_prompt_json(resume)),
    )
}

pub fn build_expand_skills_prompt(missing_skills: &[String]) -> String {
    format!(
        "{RETURN_SHAPE_HEADER}\n{}\n\n\
         You are a technical career mentor. The user is missing: {}.\n\
         Suggest 5-10 related tools, libraries, or frameworks in the same ecosystem.\n\
         Place the names in items[] (strings only). No explanations.\n",
        to_prompt_json(&json!({"items": [""]})),
        missing_skills.join(", "),
    )
}

pub fn build_rank_courses_prompt(missing_skills: &[String], hits: &[SearchHit]) -> String {
    let listing = hits
        .iter()
        .take(MAX_RANKED_HITS)
        .map(|hit| format!("- {} ({})", hit.title, hit.url))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "{RETURN_SHAPE_HEADER}\n{}\n\n\
         The user wants certifications to fill skill gaps in: {}.\n\n\
         Here are search results (title and link):\n{listing}\n\n\
         Select the 5 most relevant certifications that directly teach the needed skills.\n\
         Return them in items[] with fields name, platform, url. No extra fields.\n",
        to_prompt_json(&json!({"items": [Course::default()]})),
        missing_skills.join(", "),
    )
}

const FINAL_ANALYSIS_RULES: &str = "\
Important output rules:
- Output only JSON (no markdown). Use double quotes only. No extraneous keys.
- Ensure numeric fields are numbers (not strings). Keep all keys present, even if values are 0 or empty arrays.
- Integrate the provided recommended_courses under improvement_suggestions.recommended_courses as-is (deduplicate by name+url).
- Base all judgments on BOTH job_data and resume_data.

Attribute guide (interpretation hints):
- overall_analysis:
    - overall_match_score: 0-100 weighted blend of skills_match (50%), experience_match (25%), education_match (15%), certifications_match (10%).
    - skills_match, experience_match, education_match, certifications_match: each 0-100 describing alignment with job needs.
    - missing_skills_count: number of skills from MISSING_SKILLS that the candidate lacks.
    - ats_score: 0-100 indicating keyword alignment and clarity for ATS parsing.
- charts:
    - skill_match_distribution: counts of matched, missing, partially_matched skills; these should be consistent with your comparison.
    - experience_comparison: required_experience_years vs candidate_experience_years (numbers in years).
    - word_cloud_keywords: 10-20 key terms with frequency from combined job/resume context.
    - career_timeline: chronological entries from resume work experience (year, role, organization).
    - resume_effectiveness.gauge_score: 0-100 based on clarity, keywords, structure.
- profile_highlights: pull publications or volunteer_work if present; otherwise leave empty arrays.
- improvement_suggestions:
    - textual_feedback: 5-8 short, actionable bullets.
    - recommended_courses: use provided items (name, platform, url); keep best 5.
    - skill_gap_closure_plan: for each top missing skill, give a recommended_action and priority_level (High/Medium/Low).
    - resume_optimization_tips: 4-6 concrete resume edits (e.g., quantify achievements, reorder sections, add keywords).";

pub fn build_final_analysis_prompt(
    job: &JobPosting,
    resume: &ResumeData,
    missing_skills: &[String],
    courses: &[Course],
) -> String {
    format!(
        "{EXACT_SHAPE_HEADER}\n{}\n\n{FINAL_ANALYSIS_RULES}\n\n{}\n\n{}\n\n{}\n\n{}\n",
        to_prompt_json(&AnalysisTemplate::prompt_shape()),
        tagged("JOB_DATA", &to_prompt_json(job)),
        tagged("RESUME_DATA", &to_prompt_json(resume)),
        tagged("MISSING_SKILLS", &to_prompt_json(missing_skills)),
        tagged("RECOMMENDED_COURSES", &to_prompt_json(courses)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(i: usize) -> SearchHit {
        SearchHit {
            title: format!("Cert {i}"),
            url: format!("https://certs.example/{i}"),
            content: None,
        }
    }

    #[test]
    fn test_rank_prompt_lists_first_twelve_hits() {
        let hits: Vec<SearchHit> = (0..15).map(hit).collect();
        let prompt = build_rank_courses_prompt(&["Kubernetes".to_string()], &hits);
        assert!(prompt.contains("- Cert 11 (https://certs.example/11)"));
        assert!(!prompt.contains("Cert 12"));
        assert!(prompt.contains("skill gaps in: Kubernetes."));
    }

    #[test]
    fn test_expand_prompt_joins_skills() {
        let prompt = build_expand_skills_prompt(&["Go".to_string(), "gRPC".to_string()]);
        assert!(prompt.contains("The user is missing: Go, gRPC."));
    }

    #[test]
    fn test_final_prompt_carries_all_sections() {
        let prompt = build_final_analysis_prompt(
            &JobPosting::default(),
            &ResumeData::default(),
            &["Terraform".to_string()],
            &[],
        );
        assert!(prompt.starts_with(EXACT_SHAPE_HEADER));
        for tag in ["JOB_DATA", "RESUME_DATA", "MISSING_SKILLS", "RECOMMENDED_COURSES"] {
            assert!(prompt.contains(&format!("<{tag}>")), "missing {tag}");
        }
        assert!(prompt.contains("\"Terraform\""));
        assert!(prompt.contains("\"gauge_score\": 0"));
    }
}
