use std::collections::HashSet;
use std::path::Path as FsPath;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::IntoResponse,
    Form, Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::{generate_candidate_analysis, map_to_candidate_analysis, AnalysisTemplate};
use crate::auth::CurrentUser;
use crate::enhancer::templates::{list_templates, TemplateInfo};
use crate::enhancer::{generate_enhanced_resume, EnhanceDeps};
use crate::errors::AppError;
use crate::interview::{
    generate_interview_answers, generate_interview_questions, pair_questions_and_answers,
    validate_question_count, InterviewType, QaItem, DEFAULT_QUESTION_COUNT,
};
use crate::job_seeker::{
    enhanced_analysis_ids, find_analysis, find_interview, insert_analysis, insert_enhanced_resume,
    insert_interview, interviewed_analysis_ids, latest_analysis, list_history,
    list_recent_analyses, parse_record_id, NewAnalysis, RECENT_ANALYSES_LIMIT,
};
use crate::jobs::parse_job_from_url;
use crate::jobs::schema::JobPosting;
use crate::models::analysis::{AnalysisMetadata, AnalysisRow};
use crate::report::{create_pdf_report, MatchScore, ReportRequest};
use crate::resumes::parse_resume;
use crate::resumes::schema::ResumeData;
use crate::state::AppState;
use crate::storage;

const MAX_HIGHLIGHTS: usize = 2;

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub id: Uuid,
    pub metadata: AnalysisMetadata,
    pub analysis: Value,
    pub template: Value,
}

/// Stored analysis with its card metadata. All fields are null when there is none.
#[derive(Serialize)]
pub struct AnalysisView {
    pub analysis: Option<Value>,
    pub template: Option<Value>,
    pub metadata: Option<AnalysisMetadata>,
}

impl From<Option<AnalysisRow>> for AnalysisView {
    fn from(row: Option<AnalysisRow>) -> Self {
        match row {
            Some(row) => Self {
                metadata: Some(AnalysisMetadata::from(&row)),
                analysis: Some(row.candidate_analysis),
                template: Some(row.analysis_template),
            },
            None => Self {
                analysis: None,
                template: None,
                metadata: None,
            },
        }
    }
}

#[derive(Serialize)]
pub struct ItemsResponse<T> {
    pub items: Vec<T>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisListItem {
    pub id: Uuid,
    pub role: String,
    pub company: String,
    pub match_score: i64,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub summary: String,
    pub highlights: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: Uuid,
    pub role: String,
    pub company: String,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
    pub match_score: i64,
    pub has_analysis: bool,
    pub has_interview_pack: bool,
    pub has_enhanced_resume: bool,
    pub job: Value,
}

#[derive(Debug, Deserialize)]
pub struct EnhanceForm {
    pub analysis_id: String,
    #[serde(default = "default_template_id")]
    pub template_id: String,
}

fn default_template_id() -> String {
    "1".to_string()
}

#[derive(Serialize)]
pub struct EnhanceResponse {
    pub html: String,
    pub pdf_path: Option<String>,
    pub pdf_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InterviewForm {
    pub analysis_id: String,
    #[serde(default)]
    pub interview_type: Option<String>,
    #[serde(default)]
    pub count: Option<u32>,
}

#[derive(Serialize)]
pub struct InterviewResponse {
    pub id: Uuid,
    pub items: Vec<QaItem>,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    #[serde(default = "default_include_answers")]
    pub include_answers: bool,
}

fn default_include_answers() -> bool {
    true
}

struct AnalyzeUpload {
    job_url: String,
    filename: String,
    bytes: Vec<u8>,
}

/// POST /job-seeker/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let upload = read_analyze_upload(multipart).await?;
    info!(
        "Analyzing {} against {} for user {}",
        upload.filename, upload.job_url, user.id
    );

    let job = parse_job_from_url(&upload.job_url, &state.fetcher, &state.job_cache, &state.llm).await?;
    let resume = parse_resume(&upload.filename, upload.bytes, &state.llm).await?;

    let template = generate_candidate_analysis(&job, &resume, &state.llm, &state.search)
        .await
        .map_err(|e| match e {
            AppError::Llm(msg) => AppError::Llm(msg),
            other => AppError::Llm(format!("Analysis failed: {other}")),
        })?;
    let analysis = map_to_candidate_analysis(&template, &resume, &job);

    let row = insert_analysis(
        &state.db,
        NewAnalysis {
            user_id: user.id,
            job_url: upload.job_url.trim().to_string(),
            job_data: to_json(&job)?,
            resume_data: to_json(&resume)?,
            analysis_template: to_json(&template)?,
            candidate_analysis: to_json(&analysis)?,
            match_score: template.overall_analysis.overall_match_score as f64,
            role: job.job_title.clone(),
            company: job.company.name.clone(),
            summary: analysis.summary.clone(),
            highlights: analysis.next_steps.iter().take(MAX_HIGHLIGHTS).cloned().collect(),
        },
    )
    .await?;

    Ok(Json(AnalyzeResponse {
        id: row.id,
        metadata: AnalysisMetadata::from(&row),
        analysis: row.candidate_analysis,
        template: row.analysis_template,
    }))
}

/// GET /job-seeker/analyses
pub async fn handle_list_analyses(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ItemsResponse<AnalysisListItem>>, AppError> {
    let rows = list_recent_analyses(&state.db, user.id, RECENT_ANALYSES_LIMIT).await?;
    let items = rows
        .into_iter()
        .map(|row| AnalysisListItem {
            id: row.id,
            role: row.role,
            company: row.company,
            match_score: row.match_score as i64,
            updated_at: row.updated_at,
            summary: row.summary,
            highlights: row.highlights,
        })
        .collect();
    Ok(Json(ItemsResponse { items }))
}

/// GET /job-seeker/analyses/latest
pub async fn handle_latest_analysis(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<AnalysisView>, AppError> {
    let row = latest_analysis(&state.db, user.id).await?;
    Ok(Json(AnalysisView::from(row)))
}

/// GET /job-seeker/analyses/:id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<AnalysisView>, AppError> {
    let id = parse_record_id(&id, "Analysis")?;
    let row = find_analysis(&state.db, user.id, id).await?;
    Ok(Json(AnalysisView::from(Some(row))))
}

/// GET /job-seeker/history
pub async fn handle_history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ItemsResponse<HistoryItem>>, AppError> {
    let enhanced: HashSet<Uuid> = enhanced_analysis_ids(&state.db, user.id)
        .await?
        .into_iter()
        .collect();
    let interviewed: HashSet<Uuid> = interviewed_analysis_ids(&state.db, user.id)
        .await?
        .into_iter()
        .collect();

    let items = list_history(&state.db, user.id)
        .await?
        .into_iter()
        .map(|row| HistoryItem {
            id: row.id,
            role: row.role,
            company: row.company,
            uploaded_at: row.created_at,
            match_score: row.match_score as i64,
            has_analysis: true,
            has_interview_pack: interviewed.contains(&row.id),
            has_enhanced_resume: enhanced.contains(&row.id),
            job: row.job_data,
        })
        .collect();
    Ok(Json(ItemsResponse { items }))
}

/// POST /job-seeker/resume/enhance
pub async fn handle_enhance_resume(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<EnhanceForm>,
) -> Result<Json<EnhanceResponse>, AppError> {
    let analysis_id = parse_record_id(&form.analysis_id, "Analysis")?;
    let row = find_analysis(&state.db, user.id, analysis_id).await?;

    let resume: ResumeData = from_json(&row.resume_data)?;
    let job: JobPosting = from_json(&row.job_data)?;
    let template: AnalysisTemplate = from_json(&row.analysis_template)?;
    let tips = &template.improvement_suggestions.resume_optimization_tips;

    let template_id = form.template_id.trim();
    let enhanced = generate_enhanced_resume(
        template_id,
        &resume,
        &job,
        tips,
        EnhanceDeps {
            llm: &state.llm,
            renderer: &state.pdf_renderer,
            s3: &state.s3,
            bucket: &state.config.s3_bucket,
            templates_dir: FsPath::new(&state.config.templates_dir),
        },
    )
    .await?;

    insert_enhanced_resume(
        &state.db,
        user.id,
        row.id,
        template_id,
        &enhanced.html,
        enhanced.pdf_key.as_deref(),
    )
    .await?;

    let pdf_url = enhanced
        .pdf_key
        .as_deref()
        .map(|key| format!("/files/{}", storage::file_name(key)));
    Ok(Json(EnhanceResponse {
        html: enhanced.html,
        pdf_path: enhanced.pdf_key,
        pdf_url,
    }))
}

/// GET /job-seeker/resume/templates
pub async fn handle_list_templates(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<ItemsResponse<TemplateInfo>>, AppError> {
    let items = list_templates(FsPath::new(&state.config.templates_dir)).await?;
    Ok(Json(ItemsResponse { items }))
}

/// POST /job-seeker/interview/generate
pub async fn handle_generate_interview(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<InterviewForm>,
) -> Result<Json<InterviewResponse>, AppError> {
    let interview_type: InterviewType = form
        .interview_type
        .as_deref()
        .unwrap_or_default()
        .parse()?;
    let count = validate_question_count(form.count.unwrap_or(DEFAULT_QUESTION_COUNT))?;

    let analysis_id = parse_record_id(&form.analysis_id, "Analysis")?;
    let row = find_analysis(&state.db, user.id, analysis_id).await?;
    let job: JobPosting = from_json(&row.job_data)?;
    let resume: ResumeData = from_json(&row.resume_data)?;

    let questions =
        generate_interview_questions(&job, &resume, interview_type, count, &state.llm).await?;
    let answers =
        generate_interview_answers(&job, &resume, interview_type, &questions, &state.llm).await?;
    let items = pair_questions_and_answers(questions, answers);

    let session = insert_interview(
        &state.db,
        user.id,
        row.id,
        interview_type.as_str(),
        count as i32,
        &to_json(&items)?,
    )
    .await?;

    Ok(Json(InterviewResponse {
        id: session.id,
        items,
    }))
}

/// GET /job-seeker/interviews/:id/report
pub async fn handle_interview_report(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_record_id(&id, "Interview")?;
    let session = find_interview(&state.db, user.id, id).await?;
    let analysis = find_analysis(&state.db, user.id, session.analysis_id).await?;

    let items: Vec<QaItem> = from_json(&session.items)?;
    let resume: ResumeData = from_json(&analysis.resume_data)?;
    let template: AnalysisTemplate = from_json(&analysis.analysis_template)?;
    let interview_type: InterviewType = session.interview_type.parse().unwrap_or_default();

    let (questions, answers): (Vec<String>, Vec<String>) =
        items.into_iter().map(|qa| (qa.question, qa.answer)).unzip();
    let oa = &template.overall_analysis;
    let request = ReportRequest {
        job_id: Some(analysis.role.as_str()).filter(|r| !r.is_empty()),
        interview_type,
        questions: &questions,
        answers: query.include_answers.then_some(answers.as_slice()),
        resume: &resume,
        match_score: Some(MatchScore {
            overall: oa.overall_match_score,
            skills: oa.skills_match,
            experience: oa.experience_match,
        }),
        generated_on: chrono::Utc::now().date_naive(),
    };
    let pdf = create_pdf_report(&request)?;

    let key = storage::report_key(session.id, query.include_answers);
    if let Err(e) = storage::put_pdf(&state.s3, &state.config.s3_bucket, &key, pdf.clone().into()).await {
        warn!("Could not archive report {key}: {e}");
    }

    let filename = storage::file_name(&key).to_string();
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        pdf,
    ))
}

async fn read_analyze_upload(mut multipart: Multipart) -> Result<AnalyzeUpload, AppError> {
    let mut job_url = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("job_url") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid job_url field: {e}")))?;
                job_url = Some(text);
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid file upload: {e}")))?;
                file = Some((filename, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let job_url = job_url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| AppError::Validation("job_url is required".to_string()))?;
    let (filename, bytes) = file
        .filter(|(_, bytes)| !bytes.is_empty())
        .ok_or_else(|| AppError::Validation("A resume file is required".to_string()))?;

    Ok(AnalyzeUpload {
        job_url,
        filename,
        bytes,
    })
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::Internal(e.into()))
}

fn from_json<T: DeserializeOwned>(value: &Value) -> Result<T, AppError> {
    serde_json::from_value(value.clone()).map_err(|e| AppError::Internal(e.into()))
}
