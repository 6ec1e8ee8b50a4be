use reqwest::Client;
use tracing::info;

use crate::errors::AppError;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Downloads job posting pages while presenting as a desktop browser.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(std::time::Duration::from_secs(15))
            .build()?;
        Ok(Self { client })
    }

    pub async fn fetch(&self, url: &str) -> Result<String, AppError> {
        info!("Fetching job posting: {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Error fetching webpage: {e}")))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(AppError::Upstream(format!(
                "Failed to fetch webpage. Status code: {}",
                status.as_u16()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::Upstream(format!("Error reading webpage: {e}")))
    }
}

/// Only absolute http(s) URLs are fetched.
pub fn validate_job_url(url: &str) -> Result<&str, AppError> {
    let url = url.trim();
    let has_scheme = url.starts_with("http://") || url.starts_with("https://");
    if !has_scheme || reqwest::Url::parse(url).is_err() {
        return Err(AppError::Validation(
            "Invalid URL format. Must start with http:// or https://".to_string(),
        ));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_job_url() {
        assert_eq!(
            validate_job_url(" https://jobs.example.com/1 ").unwrap(),
            "https://jobs.example.com/1"
        );
        assert!(validate_job_url("http://example.com").is_ok());
        assert!(validate_job_url("ftp://example.com/job").is_err());
        assert!(validate_job_url("jobs.example.com/1").is_err());
        assert!(validate_job_url("https://").is_err());
        assert!(validate_job_url("").is_err());
    }
}
