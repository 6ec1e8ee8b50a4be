//! Object storage for generated résumé PDFs.

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

const RESUME_PREFIX: &str = "resumes/";
const REPORT_PREFIX: &str = "reports/";

/// Object key for a freshly generated résumé PDF.
pub fn new_resume_key() -> String {
    format!("{RESUME_PREFIX}resume-{}.pdf", Uuid::new_v4().simple())
}

/// Object key for an interview report rendition.
pub fn report_key(interview_id: Uuid, with_answers: bool) -> String {
    let variant = if with_answers { "qa" } else { "questions" };
    format!("{REPORT_PREFIX}interview-{}-{variant}.pdf", interview_id.simple())
}

/// The public file name of a stored object (the last key segment).
pub fn file_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Maps a public file name back to its key. Only `resume-*.pdf` names are served.
pub fn resume_key_for(file_name: &str) -> Option<String> {
    let valid = file_name.starts_with("resume-")
        && file_name.ends_with(".pdf")
        && file_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');
    valid.then(|| format!("{RESUME_PREFIX}{file_name}"))
}

pub async fn put_pdf(s3: &S3Client, bucket: &str, key: &str, pdf: Bytes) -> Result<(), AppError> {
    s3.put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(pdf))
        .content_type("application/pdf")
        .send()
        .await
        .map_err(|e| AppError::S3(format!("S3 upload failed: {e}")))?;

    info!("Uploaded PDF to s3://{bucket}/{key}");
    Ok(())
}

/// Fetches an object. A missing key is `NotFound`.
pub async fn get_object(s3: &S3Client, bucket: &str, key: &str) -> Result<Bytes, AppError> {
    let output = s3
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| {
            if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                AppError::NotFound("File not found".to_string())
            } else {
                AppError::S3(format!("S3 download failed: {e}"))
            }
        })?;

    let body = output
        .body
        .collect()
        .await
        .map_err(|e| AppError::S3(format!("S3 download failed: {e}")))?;
    Ok(body.into_bytes())
}
