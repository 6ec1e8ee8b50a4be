pub mod files;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::job_seeker::handlers as job_seeker;
use crate::state::AppState;

/// Largest accepted request body (résumé uploads).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Auth
        .route("/auth/register", post(auth::handle_register))
        .route("/auth/login", post(auth::handle_login))
        .route("/auth/me", get(auth::handle_me))
        // Job seeker
        .route("/job-seeker/analyze", post(job_seeker::handle_analyze))
        .route("/job-seeker/analyses", get(job_seeker::handle_list_analyses))
        .route(
            "/job-seeker/analyses/latest",
            get(job_seeker::handle_latest_analysis),
        )
        .route(
            "/job-seeker/analyses/:id",
            get(job_seeker::handle_get_analysis),
        )
        .route("/job-seeker/history", get(job_seeker::handle_history))
        .route(
            "/job-seeker/resume/enhance",
            post(job_seeker::handle_enhance_resume),
        )
        .route(
            "/job-seeker/resume/templates",
            get(job_seeker::handle_list_templates),
        )
        .route(
            "/job-seeker/interview/generate",
            post(job_seeker::handle_generate_interview),
        )
        .route(
            "/job-seeker/interviews/:id/report",
            get(job_seeker::handle_interview_report),
        )
        // Generated files
        .route("/files/:name", get(files::handle_get_file))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
