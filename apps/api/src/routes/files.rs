use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};

use crate::errors::AppError;
use crate::state::AppState;
use crate::storage;

/// GET /files/:name
/// Serves a generated résumé PDF from object storage.
pub async fn handle_get_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let key = storage::resume_key_for(&name)
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;
    let body = storage::get_object(&state.s3, &state.config.s3_bucket, &key).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, format!("inline; filename=\"{name}\"")),
        ],
        body,
    ))
}
