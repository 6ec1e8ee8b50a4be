//! Resume Parser: turns an uploaded PDF/DOCX into the fixed résumé schema.

pub mod extract;
pub mod prompts;
pub mod schema;

use tracing::info;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::resumes::extract::extract_resume_text;
use crate::resumes::prompts::{build_resume_parse_prompt, RESUME_PARSE_SYSTEM};
use crate::resumes::schema::ResumeData;

/// Extracts the upload's text and has the LLM structure it.
pub async fn parse_resume(
    filename: &str,
    bytes: Vec<u8>,
    llm: &LlmClient,
) -> Result<ResumeData, AppError> {
    let name = filename.to_string();
    // pdf-extract can panic on malformed input; the join error absorbs it.
    let text = tokio::task::spawn_blocking(move || extract_resume_text(&name, &bytes))
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read resume: {e}")))??;

    info!("Extracted {} characters from {filename}", text.len());
    get_resume_summary(&text, llm).await
}

pub async fn get_resume_summary(text: &str, llm: &LlmClient) -> Result<ResumeData, AppError> {
    let prompt = build_resume_parse_prompt(text);
    let resume: ResumeData = llm
        .call_json(&prompt, RESUME_PARSE_SYSTEM, 0.0)
        .await
        .map_err(|e| AppError::Llm(format!("Failed to parse resume: {e}")))?;
    Ok(resume.normalize())
}
