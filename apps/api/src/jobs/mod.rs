//! Job parser: fetch a posting URL, extract its main text, and have the LLM
//! fill the fixed job schema. Parsed postings are cached in Redis by URL.

pub mod cache;
pub mod extract;
pub mod fetch;
pub mod prompts;
pub mod schema;

use tracing::{info, warn};

use crate::errors::AppError;
use crate::jobs::cache::JobCache;
use crate::jobs::extract::extract_text_content;
use crate::jobs::fetch::{validate_job_url, PageFetcher};
use crate::jobs::prompts::{build_job_parse_prompt, JOB_PARSE_SYSTEM};
use crate::jobs::schema::JobPosting;
use crate::llm_client::LlmClient;

/// Pages estimated above this many tokens are truncated before prompting.
const MAX_POSTING_TOKENS: usize = 120_000;
/// Roughly 120k tokens worth of characters.
const TRUNCATED_POSTING_CHARS: usize = 400_000;

/// Parses a public job posting URL into the fixed job schema.
pub async fn parse_job_from_url(
    url: &str,
    fetcher: &PageFetcher,
    cache: &JobCache,
    llm: &LlmClient,
) -> Result<JobPosting, AppError> {
    let url = validate_job_url(url)?;

    if let Some(job) = cache.get(url).await {
        info!("Using cached posting for {url}");
        return Ok(job);
    }

    let html = fetcher.fetch(url).await?;
    let text = extract_text_content(&html);
    if text.is_empty() {
        return Err(AppError::Validation(
            "No readable text found at the job URL".to_string(),
        ));
    }

    let text = cap_posting_text(text);
    let job = get_job_details(&text, url, llm).await?;

    cache.put(url, &job).await;
    Ok(job)
}

/// Asks the LLM to fill the job schema from already-extracted posting text.
pub async fn get_job_details(text: &str, url: &str, llm: &LlmClient) -> Result<JobPosting, AppError> {
    let prompt = build_job_parse_prompt(url, text);
    let job: JobPosting = llm
        .call_json(&prompt, JOB_PARSE_SYSTEM, 0.0)
        .await
        .map_err(|e| AppError::Llm(format!("Failed to parse job posting: {e}")))?;

    let job = job.normalize(url);
    info!(
        "Parsed job posting '{}' at '{}'",
        job.job_title, job.company.name
    );
    Ok(job)
}

/// Rough token estimate: about four characters per token.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4
}

fn cap_posting_text(text: String) -> String {
    let tokens = estimate_tokens(&text);
    info!("Estimated token count: {tokens}");
    if tokens <= MAX_POSTING_TOKENS {
        return text;
    }
    warn!("Large page detected ({tokens} tokens), truncating");
    text.chars().take(TRUNCATED_POSTING_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_tokens_counts_chars() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcdefgh"), 2);
        assert_eq!(estimate_tokens("ééééééééé"), 2);
    }

    #[test]
    fn test_small_posting_is_untouched() {
        let text = "Rust engineer wanted. ".repeat(100);
        assert_eq!(cap_posting_text(text.clone()), text);
    }

    #[test]
    fn test_oversized_posting_is_truncated() {
        let text = "a".repeat(MAX_POSTING_TOKENS * 4 + 8);
        let capped = cap_posting_text(text);
        assert_eq!(capped.chars().count(), TRUNCATED_POSTING_CHARS);
    }
}
