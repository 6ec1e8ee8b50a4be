mod analysis;
mod auth;
mod config;
mod db;
mod enhancer;
mod errors;
mod interview;
mod job_seeker;
mod jobs;
mod llm_client;
mod models;
mod report;
mod resumes;
mod routes;
mod search_client;
mod state;
mod storage;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::TokenSettings;
use crate::config::Config;
use crate::db::create_pool;
use crate::enhancer::pdf::PdfRenderer;
use crate::jobs::cache::JobCache;
use crate::jobs::fetch::PageFetcher;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::search_client::SearchClient;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Analyzer API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url).await?;

    // Initialize Redis-backed job posting cache
    let redis = redis::Client::open(config.redis_url.clone())?;
    let job_cache = JobCache::new(redis, config.job_cache_ttl_secs);
    info!("Job cache initialized (ttl: {}s)", config.job_cache_ttl_secs);

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // Initialize outbound clients
    let llm = LlmClient::new(
        config.groq_api_key.clone(),
        config.groq_api_url.clone(),
        config.groq_model.clone(),
    )?;
    info!("LLM client initialized (model: {})", llm.model());
    let search = SearchClient::new(config.tavily_api_key.clone())?;
    let fetcher = PageFetcher::new()?;
    let pdf_renderer = PdfRenderer::new(config.pdf_server_url.clone())?;

    let tokens = TokenSettings::new(
        config.secret_key.clone(),
        config.jwt_algorithm,
        config.access_token_expire_minutes,
    );

    let state = AppState {
        db,
        s3,
        llm,
        search,
        fetcher,
        job_cache,
        pdf_renderer,
        tokens,
        config: config.clone(),
    };

    let app = with_middleware(build_router(state), config.cors_origins.as_deref());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "resume-analyzer-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}

/// Request tracing outermost, CORS directly around the router.
fn with_middleware(router: Router, cors_origins: Option<&[String]>) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(build_cors(cors_origins)),
    )
}

/// Any origin when `CORS_ORIGINS` is unset or `*`, otherwise only the listed ones.
fn build_cors(cors_origins: Option<&[String]>) -> CorsLayer {
    let Some(origins) = cors_origins else {
        return CorsLayer::permissive();
    };

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{o}'");
                None
            }
        })
        .collect();
    info!("CORS restricted to {} origin(s)", allowed.len());

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    fn app(cors_origins: Option<&[String]>) -> Router {
        with_middleware(Router::new().route("/", get(|| async { "ok" })), cors_origins)
    }

    #[tokio::test]
    async fn test_permissive_cors_without_origins() {
        let response = app(None)
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, "http://anywhere.test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_preflight_with_origin_list() {
        let origins = vec!["http://localhost:5173".to_string()];
        let response = app(Some(&origins))
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }
}
