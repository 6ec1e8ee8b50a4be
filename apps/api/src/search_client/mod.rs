//! Web search client (Tavily). Used to find certification and course links
//! for skills a candidate is missing.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::llm_client::coerce;

const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

/// One search result as returned by the provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default, deserialize_with = "coerce::string")]
    pub title: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub url: String,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Clone)]
pub struct SearchClient {
    client: Client,
    api_key: String,
}

impl SearchClient {
    pub fn new(api_key: String) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            api_key,
        })
    }

    pub async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, SearchError> {
        let response = self
            .client
            .post(TAVILY_SEARCH_URL)
            .json(&SearchRequest {
                api_key: &self.api_key,
                query,
                max_results,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: SearchResponse = response.json().await?;
        debug!("Search '{}' returned {} results", query, body.results.len());
        Ok(body.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_tolerates_missing_fields() {
        let raw = r#"{
            "query": "best certifications for Kafka developers",
            "results": [
                {"title": "Confluent Certified Developer", "url": "https://confluent.io/cert", "content": "Exam", "score": 0.9},
                {"title": null, "url": "https://example.com"}
            ]
        }"#;
        let body: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(body.results.len(), 2);
        assert_eq!(body.results[0].title, "Confluent Certified Developer");
        assert_eq!(body.results[1].title, "");
        assert!(body.results[1].content.is_none());
    }

    #[test]
    fn test_search_response_without_results_is_empty() {
        let body: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(body.results.is_empty());
    }
}
