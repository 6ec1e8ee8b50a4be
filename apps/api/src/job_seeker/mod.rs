//! Persistence for the job-seeker workflow: analyses, enhanced résumés and
//! interview sessions. Every query is scoped to the owning user.

pub mod handlers;

use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::analysis::{AnalysisRow, EnhancedResumeRow, InterviewRow};

pub const RECENT_ANALYSES_LIMIT: i64 = 20;

pub struct NewAnalysis {
    pub user_id: Uuid,
    pub job_url: String,
    pub job_data: Value,
    pub resume_data: Value,
    pub analysis_template: Value,
    pub candidate_analysis: Value,
    pub match_score: f64,
    pub role: String,
    pub company: String,
    pub summary: String,
    pub highlights: Vec<String>,
}

pub async fn insert_analysis(pool: &PgPool, new: NewAnalysis) -> Result<AnalysisRow, AppError> {
    let row = sqlx::query_as::<_, AnalysisRow>(
        r#"
        INSERT INTO analyses (
            id, user_id, job_url, job_data, resume_data, analysis_template,
            candidate_analysis, match_score, role, company, summary, highlights
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.user_id)
    .bind(&new.job_url)
    .bind(&new.job_data)
    .bind(&new.resume_data)
    .bind(&new.analysis_template)
    .bind(&new.candidate_analysis)
    .bind(new.match_score)
    .bind(&new.role)
    .bind(&new.company)
    .bind(&new.summary)
    .bind(&new.highlights)
    .fetch_one(pool)
    .await?;

    info!("Stored analysis {} for user {}", row.id, row.user_id);
    Ok(row)
}

pub async fn list_recent_analyses(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<AnalysisRow>, AppError> {
    let rows = sqlx::query_as::<_, AnalysisRow>(
        "SELECT * FROM analyses WHERE user_id = $1 ORDER BY updated_at DESC LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn latest_analysis(pool: &PgPool, user_id: Uuid) -> Result<Option<AnalysisRow>, AppError> {
    let row = sqlx::query_as::<_, AnalysisRow>(
        "SELECT * FROM analyses WHERE user_id = $1 ORDER BY updated_at DESC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Another user's analysis is indistinguishable from a missing one.
pub async fn find_analysis(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<AnalysisRow, AppError> {
    sqlx::query_as::<_, AnalysisRow>("SELECT * FROM analyses WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Analysis not found".to_string()))
}

/// All of a user's analyses, newest upload first.
pub async fn list_history(pool: &PgPool, user_id: Uuid) -> Result<Vec<AnalysisRow>, AppError> {
    let rows = sqlx::query_as::<_, AnalysisRow>(
        "SELECT * FROM analyses WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn enhanced_analysis_ids(pool: &PgPool, user_id: Uuid) -> Result<Vec<Uuid>, AppError> {
    let ids = sqlx::query_scalar::<_, Uuid>(
        "SELECT DISTINCT analysis_id FROM enhanced_resumes WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(ids)
}

pub async fn interviewed_analysis_ids(pool: &PgPool, user_id: Uuid) -> Result<Vec<Uuid>, AppError> {
    let ids = sqlx::query_scalar::<_, Uuid>(
        "SELECT DISTINCT analysis_id FROM interviews WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(ids)
}

pub async fn insert_enhanced_resume(
    pool: &PgPool,
    user_id: Uuid,
    analysis_id: Uuid,
    template_id: &str,
    html: &str,
    pdf_key: Option<&str>,
) -> Result<EnhancedResumeRow, AppError> {
    let row = sqlx::query_as::<_, EnhancedResumeRow>(
        r#"
        INSERT INTO enhanced_resumes (id, user_id, analysis_id, template_id, html, pdf_key)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(analysis_id)
    .bind(template_id)
    .bind(html)
    .bind(pdf_key)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn insert_interview(
    pool: &PgPool,
    user_id: Uuid,
    analysis_id: Uuid,
    interview_type: &str,
    question_count: i32,
    items: &Value,
) -> Result<InterviewRow, AppError> {
    let row = sqlx::query_as::<_, InterviewRow>(
        r#"
        INSERT INTO interviews (id, user_id, analysis_id, interview_type, question_count, items)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(analysis_id)
    .bind(interview_type)
    .bind(question_count)
    .bind(items)
    .fetch_one(pool)
    .await?;

    info!("Stored interview session {} for analysis {analysis_id}", row.id);
    Ok(row)
}

pub async fn find_interview(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<InterviewRow, AppError> {
    sqlx::query_as::<_, InterviewRow>("SELECT * FROM interviews WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Interview not found".to_string()))
}

/// Ids arrive as path segments or form fields; a malformed one is treated as missing.
pub fn parse_record_id(raw: &str, what: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::NotFound(format!("{what} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_record_id(&format!(" {id} "), "Analysis").unwrap(), id);
        let err = parse_record_id("64f1c2", "Analysis").unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Analysis not found"));
    }
}
