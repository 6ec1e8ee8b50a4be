use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct AnalysisRow {
    pub id: Uuid,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Dashboard card for one analysis.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    pub id: Uuid,
    pub role: String,
    pub company: String,
    pub summary: String,
    pub updated_at: DateTime<Utc>,
    pub match_score: i64,
}

impl From<&AnalysisRow> for AnalysisMetadata {
    fn from(row: &AnalysisRow) -> Self {
        Self {
            id: row.id,
            role: row.role.clone(),
            company: row.company.clone(),
            summary: row.summary.clone(),
            updated_at: row.updated_at,
            match_score: row.match_score as i64,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct EnhancedResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub analysis_id: Uuid,
    pub template_id: String,
    pub html: String,
    pub pdf_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct InterviewRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub analysis_id: Uuid,
    pub interview_type: String,
    pub question_count: i32,
    /// `[{question, answer}]`
    pub items: Value,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metadata_truncates_score_and_uses_camel_case() {
        let now = Utc::now();
        let row = AnalysisRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            job_url: "https://jobs.example.com/1".into(),
            job_data: json!({}),
            resume_data: json!({}),
            analysis_template: json!({}),
            candidate_analysis: json!({}),
            match_score: 78.9,
            role: "Backend Engineer".into(),
            company: "Acme".into(),
            summary: "Analysis generated from your resume and the target role.".into(),
            highlights: vec![],
            created_at: now,
            updated_at: now,
        };
        let metadata = AnalysisMetadata::from(&row);
        assert_eq!(metadata.match_score, 78);
        let value = serde_json::to_value(&metadata).unwrap();
        assert_eq!(value["matchScore"], 78);
        assert!(value.get("updatedAt").is_some());
    }
}
