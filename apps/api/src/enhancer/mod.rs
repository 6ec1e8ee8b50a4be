//! Resume Enhancer: fills an HTML template with the candidate's own data,
//! tailored to the target job, and optionally renders it to PDF.

pub mod pdf;
pub mod prompts;
pub mod templates;

use std::path::Path;

use aws_sdk_s3::Client as S3Client;
use serde::Deserialize;
use tracing::info;

use crate::enhancer::pdf::PdfRenderer;
use crate::enhancer::prompts::{build_enhance_prompt, ENHANCE_SYSTEM};
use crate::enhancer::templates::load_template;
use crate::errors::AppError;
use crate::jobs::schema::JobPosting;
use crate::llm_client::{coerce, LlmClient};
use crate::resumes::schema::ResumeData;
use crate::storage;

#[derive(Debug, Deserialize)]
struct EnhancedHtml {
    #[serde(default, deserialize_with = "coerce::string")]
    html: String,
}

#[derive(Debug, Clone)]
pub struct EnhancedResume {
    pub html: String,
    /// Object key of the rendered PDF, when the renderer produced one.
    pub pdf_key: Option<String>,
}

pub async fn generate_enhanced_html(
    template_html: &str,
    resume: &ResumeData,
    job: &JobPosting,
    tips: &[String],
    llm: &LlmClient,
) -> Result<String, AppError> {
    let prompt = build_enhance_prompt(template_html, resume, job, tips);
    let reply: EnhancedHtml = llm
        .call_json(&prompt, ENHANCE_SYSTEM, 0.1)
        .await
        .map_err(|e| AppError::Llm(format!("Enhancer failed: {e}")))?;

    if !is_html_document(&reply.html) {
        return Err(AppError::Llm(
            "Enhancer failed: model did not return valid HTML".to_string(),
        ));
    }
    Ok(reply.html)
}

pub struct EnhanceDeps<'a> {
    pub llm: &'a LlmClient,
    pub renderer: &'a PdfRenderer,
    pub s3: &'a S3Client,
    pub bucket: &'a str,
    pub templates_dir: &'a Path,
}

/// Loads the template, generates the HTML and stores a PDF rendition when available.
pub async fn generate_enhanced_resume(
    template_id: &str,
    resume: &ResumeData,
    job: &JobPosting,
    tips: &[String],
    deps: EnhanceDeps<'_>,
) -> Result<EnhancedResume, AppError> {
    let template_html = load_template(deps.templates_dir, template_id).await?;
    let html = generate_enhanced_html(&template_html, resume, job, tips, deps.llm).await?;

    let pdf_key = match deps.renderer.render(&html).await {
        Some(pdf) => {
            let key = storage::new_resume_key();
            storage::put_pdf(deps.s3, deps.bucket, &key, pdf).await?;
            Some(key)
        }
        None => {
            info!("No PDF produced for template {template_id}; returning HTML only");
            None
        }
    };

    Ok(EnhancedResume { html, pdf_key })
}

fn is_html_document(html: &str) -> bool {
    html.to_lowercase().contains("<html")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_document_check() {
        assert!(is_html_document("<!DOCTYPE html><HTML><body></body></HTML>"));
        assert!(!is_html_document("<div>fragment</div>"));
        assert!(!is_html_document(""));
    }

    #[test]
    fn test_reply_html_is_coerced() {
        let reply: EnhancedHtml = serde_json::from_str(r#"{"html": null}"#).unwrap();
        assert!(reply.html.is_empty());
    }
}
