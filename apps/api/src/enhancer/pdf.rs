use bytes::Bytes;
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use serde::Serialize;
use tracing::{info, warn};

/// Client for the external HTML-to-PDF rendering service.
#[derive(Clone)]
pub struct PdfRenderer {
    client: Client,
    url: String,
}

#[derive(Serialize)]
struct RenderRequest<'a> {
    html: &'a str,
}

impl PdfRenderer {
    pub fn new(url: String) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;
        Ok(Self { client, url })
    }

    /// Renders `html` to PDF bytes. Every failure is logged and yields `None`.
    pub async fn render(&self, html: &str) -> Option<Bytes> {
        let response = match self
            .client
            .post(&self.url)
            .json(&RenderRequest { html })
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("PDF server unreachable: {e}");
                return None;
            }
        };

        let status = response.status();
        let is_pdf = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(is_pdf_content_type);
        if status != StatusCode::OK || !is_pdf {
            warn!("PDF server returned {status} without a PDF body");
            return None;
        }

        match response.bytes().await {
            Ok(body) => {
                info!("Rendered PDF ({} bytes)", body.len());
                Some(body)
            }
            Err(e) => {
                warn!("Failed reading PDF body: {e}");
                None
            }
        }
    }
}

fn is_pdf_content_type(value: &str) -> bool {
    value.trim().to_ascii_lowercase().starts_with("application/pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_content_type() {
        assert!(is_pdf_content_type("application/pdf"));
        assert!(is_pdf_content_type("Application/PDF; charset=binary"));
        assert!(!is_pdf_content_type("text/html"));
    }

    #[tokio::test]
    async fn test_unreachable_server_yields_none() {
        let renderer = PdfRenderer::new("http://127.0.0.1:1/generate-pdf".to_string()).unwrap();
        assert!(renderer.render("<html></html>").await.is_none());
    }
}
