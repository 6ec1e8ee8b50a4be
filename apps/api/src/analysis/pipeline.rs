//! Multi-step analysis chain: missing skills, related skills, certification
//! search, course ranking, then the final scored analysis.
//!
//! Intermediate steps degrade gracefully on malformed model output; transport
//! failures of the LLM are returned to the caller.

use serde_json::Value;
use tracing::{info, warn};

use crate::analysis::prompts::{
    build_expand_skills_prompt, build_final_analysis_prompt, build_missing_skills_prompt,
    build_rank_courses_prompt, EXPAND_SKILLS_SYSTEM, FINAL_ANALYSIS_SYSTEM, MISSING_SKILLS_SYSTEM,
    RANK_COURSES_SYSTEM,
};
use crate::analysis::schema::{AnalysisTemplate, Course};
use crate::errors::AppError;
use crate::jobs::schema::JobPosting;
use crate::llm_client::coerce::{value_to_string, value_to_string_list};
use crate::llm_client::{LlmClient, LlmError};
use crate::resumes::schema::ResumeData;
use crate::search_client::{SearchClient, SearchHit};

const RESULTS_PER_SKILL: u32 = 5;
const SNIPPET_CHARS: usize = 300;

pub async fn generate_candidate_analysis(
    job: &JobPosting,
    resume: &ResumeData,
    llm: &LlmClient,
    search: &SearchClient,
) -> Result<AnalysisTemplate, AppError> {
    let missing_skills = extract_missing_skills(job, resume, llm).await?;
    info!("Missing skills: {missing_skills:?}");

    let courses = if missing_skills.is_empty() {
        Vec::new()
    } else {
        let expanded = expand_skills(&missing_skills, llm).await?;
        let hits = fetch_certifications(&expanded, search).await;
        info!(
            "Collected {} certification hits for {} skills",
            hits.len(),
            expanded.len()
        );
        rank_certifications(&missing_skills, &hits, llm).await?
    };

    let prompt = build_final_analysis_prompt(job, resume, &missing_skills, &courses);
    let template: AnalysisTemplate = llm
        .call_json(&prompt, FINAL_ANALYSIS_SYSTEM, 0.0)
        .await
        .map_err(llm_failure)?;

    Ok(template.normalize())
}

async fn extract_missing_skills(
    job: &JobPosting,
    resume: &ResumeData,
    llm: &LlmClient,
) -> Result<Vec<String>, AppError> {
    let prompt = build_missing_skills_prompt(job, resume);
    let reply = llm
        .call_text(&prompt, MISSING_SKILLS_SYSTEM, 0.0)
        .await
        .map_err(llm_failure)?;
    Ok(parse_missing_skills(&reply))
}

async fn expand_skills(missing: &[String], llm: &LlmClient) -> Result<Vec<String>, AppError> {
    let prompt = build_expand_skills_prompt(missing);
    let reply = llm
        .call_text(&prompt, EXPAND_SKILLS_SYSTEM, 0.0)
        .await
        .map_err(llm_failure)?;
    Ok(parse_expanded_skills(&reply).unwrap_or_else(|| missing.to_vec()))
}

/// One query per skill. Failed queries are skipped.
async fn fetch_certifications(skills: &[String], search: &SearchClient) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    for skill in skills {
        let query = format!("best certifications for {skill} developers");
        match search.search(&query, RESULTS_PER_SKILL).await {
            Ok(results) => hits.extend(results.into_iter().map(trim_snippet)),
            Err(e) => warn!("Certification search failed for '{skill}': {e}"),
        }
    }
    hits
}

async fn rank_certifications(
    missing: &[String],
    hits: &[SearchHit],
    llm: &LlmClient,
) -> Result<Vec<Course>, AppError> {
    let prompt = build_rank_courses_prompt(missing, hits);
    let reply = llm
        .call_text(&prompt, RANK_COURSES_SYSTEM, 0.0)
        .await
        .map_err(llm_failure)?;
    Ok(parse_ranked_courses(&reply))
}

fn llm_failure(e: LlmError) -> AppError {
    AppError::Llm(format!("Analysis failed: {e}"))
}

fn trim_snippet(mut hit: SearchHit) -> SearchHit {
    hit.content = hit
        .content
        .map(|c| c.chars().take(SNIPPET_CHARS).collect());
    hit
}

fn parse_missing_skills(reply: &str) -> Vec<String> {
    serde_json::from_str::<Value>(reply)
        .ok()
        .map(|v| value_to_string_list(&v["missing_skills"]))
        .unwrap_or_default()
}

/// `None` when the reply is not an object carrying an `items` list.
fn parse_expanded_skills(reply: &str) -> Option<Vec<String>> {
    let value = serde_json::from_str::<Value>(reply).ok()?;
    value
        .get("items")
        .filter(|items| items.is_array())
        .map(value_to_string_list)
}

fn parse_ranked_courses(reply: &str) -> Vec<Course> {
    let Ok(value) = serde_json::from_str::<Value>(reply) else {
        return Vec::new();
    };
    let Some(items) = value.get("items").and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| Course {
            name: value_to_string(&item["name"]).unwrap_or_default(),
            platform: value_to_string(&item["platform"]).unwrap_or_default(),
            url: value_to_string(&item["url"]).unwrap_or_default(),
        })
        .filter(|c| !c.name.is_empty() && !c.url.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_skills_fall_back_to_empty() {
        assert_eq!(
            parse_missing_skills(r#"{"missing_skills": ["Go", 3, {"x": 1}]}"#),
            vec!["Go", "3"]
        );
        assert!(parse_missing_skills("not json").is_empty());
        assert!(parse_missing_skills(r#"{"missing_skills": "Go"}"#).is_empty());
    }

    #[test]
    fn test_expanded_skills_require_items_list() {
        assert_eq!(
            parse_expanded_skills(r#"{"items": ["Gin", "Echo"]}"#),
            Some(vec!["Gin".to_string(), "Echo".to_string()])
        );
        assert_eq!(parse_expanded_skills("oops"), None);
        assert_eq!(parse_expanded_skills(r#"{"items": "Gin"}"#), None);
    }

    #[test]
    fn test_ranked_courses_drop_incomplete_entries() {
        let reply = r#"{"items": [
            {"name": "CKA", "platform": "CNCF", "url": "https://cncf.example/cka"},
            {"name": "", "platform": "X", "url": "https://x.example"},
            {"name": "No link", "platform": "Y"},
            "junk"
        ]}"#;
        let courses = parse_ranked_courses(reply);
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].platform, "CNCF");
        assert!(parse_ranked_courses("[]").is_empty());
    }

    #[test]
    fn test_snippet_is_cut() {
        let hit = SearchHit {
            title: "t".into(),
            url: "u".into(),
            content: Some("x".repeat(1000)),
        };
        assert_eq!(trim_snippet(hit).content.unwrap().len(), SNIPPET_CHARS);
    }
}
