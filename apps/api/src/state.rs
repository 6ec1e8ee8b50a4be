use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::auth::TokenSettings;
use crate::config::Config;
use crate::enhancer::pdf::PdfRenderer;
use crate::jobs::cache::JobCache;
use crate::jobs::fetch::PageFetcher;
use crate::llm_client::LlmClient;
use crate::search_client::SearchClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    pub llm: LlmClient,
    pub search: SearchClient,
    pub fetcher: PageFetcher,
    /// Parsed job postings, backed by Redis.
    pub job_cache: JobCache,
    pub pdf_renderer: PdfRenderer,
    pub tokens: TokenSettings,
    pub config: Config,
}
