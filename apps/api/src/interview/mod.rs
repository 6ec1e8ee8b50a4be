//! Interview Prep: tailored questions and first-person model answers.

pub mod prompts;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::interview::prompts::{
    build_answers_prompt, build_questions_prompt, ANSWERS_SYSTEM, QUESTIONS_SYSTEM,
};
use crate::jobs::schema::JobPosting;
use crate::llm_client::coerce::value_to_string;
use crate::llm_client::LlmClient;
use crate::resumes::schema::ResumeData;

pub const DEFAULT_QUESTION_COUNT: u32 = 6;
pub const MAX_QUESTION_COUNT: u32 = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewType {
    Technical,
    Behavioral,
    SystemDesign,
    #[default]
    Mixed,
}

impl InterviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewType::Technical => "technical",
            InterviewType::Behavioral => "behavioral",
            InterviewType::SystemDesign => "system_design",
            InterviewType::Mixed => "mixed",
        }
    }

    /// "System Design", "Mixed", ... for report titles.
    pub fn title(&self) -> &'static str {
        match self {
            InterviewType::Technical => "Technical",
            InterviewType::Behavioral => "Behavioral",
            InterviewType::SystemDesign => "System Design",
            InterviewType::Mixed => "Mixed",
        }
    }
}

impl fmt::Display for InterviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterviewType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "technical" => Ok(InterviewType::Technical),
            "behavioral" | "behavioural" => Ok(InterviewType::Behavioral),
            "system_design" => Ok(InterviewType::SystemDesign),
            "mixed" | "" => Ok(InterviewType::Mixed),
            other => Err(AppError::Validation(format!(
                "Unknown interview type '{other}'. Expected technical, behavioral, system_design or mixed"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaItem {
    pub question: String,
    pub answer: String,
}

pub fn validate_question_count(count: u32) -> Result<u32, AppError> {
    if (1..=MAX_QUESTION_COUNT).contains(&count) {
        Ok(count)
    } else {
        Err(AppError::Validation(format!(
            "count must be between 1 and {MAX_QUESTION_COUNT}"
        )))
    }
}

pub async fn generate_interview_questions(
    job: &JobPosting,
    resume: &ResumeData,
    interview_type: InterviewType,
    count: u32,
    llm: &LlmClient,
) -> Result<Vec<String>, AppError> {
    let prompt = build_questions_prompt(job, resume, interview_type, count);
    let reply = llm
        .call_text(&prompt, QUESTIONS_SYSTEM, 0.0)
        .await
        .map_err(|e| AppError::Llm(format!("Failed to generate questions: {e}")))?;
    parse_items(&reply).map_err(|e| AppError::Llm(format!("Failed to generate questions: {e}")))
}

pub async fn generate_interview_answers(
    job: &JobPosting,
    resume: &ResumeData,
    interview_type: InterviewType,
    questions: &[String],
    llm: &LlmClient,
) -> Result<Vec<String>, AppError> {
    let prompt = build_answers_prompt(job, resume, interview_type, questions);
    let reply = llm
        .call_text(&prompt, ANSWERS_SYSTEM, 0.0)
        .await
        .map_err(|e| AppError::Llm(format!("Failed to generate answers: {e}")))?;
    parse_items(&reply).map_err(|e| AppError::Llm(format!("Failed to generate answers: {e}")))
}

/// Answer `i` belongs to question `i`. Questions without an answer get "".
pub fn pair_questions_and_answers(questions: Vec<String>, answers: Vec<String>) -> Vec<QaItem> {
    let mut answers = answers.into_iter();
    questions
        .into_iter()
        .map(|question| QaItem {
            question,
            answer: answers.next().unwrap_or_default(),
        })
        .collect()
}

/// Reads `{"items": [...]}`. A missing `items` is an empty list; any other non-list is an error.
fn parse_items(reply: &str) -> Result<Vec<String>, String> {
    let value: Value = serde_json::from_str(reply).map_err(|e| e.to_string())?;
    match value.get("items") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.iter().map(stringify).collect()),
        Some(_) => Err("Model returned invalid structure: 'items' is not a list".to_string()),
    }
}

fn stringify(value: &Value) -> String {
    value_to_string(value).unwrap_or_else(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interview_type_parsing() {
        assert_eq!("Technical".parse::<InterviewType>().unwrap(), InterviewType::Technical);
        assert_eq!("system design".parse::<InterviewType>().unwrap(), InterviewType::SystemDesign);
        assert_eq!("".parse::<InterviewType>().unwrap(), InterviewType::Mixed);
        assert!("panel".parse::<InterviewType>().is_err());
        assert_eq!(InterviewType::default().as_str(), "mixed");
        assert_eq!(InterviewType::SystemDesign.title(), "System Design");
    }

    #[test]
    fn test_question_count_bounds() {
        assert!(validate_question_count(0).is_err());
        assert_eq!(validate_question_count(1).unwrap(), 1);
        assert_eq!(validate_question_count(20).unwrap(), 20);
        assert!(validate_question_count(21).is_err());
    }

    #[test]
    fn test_parse_items() {
        assert_eq!(
            parse_items(r#"{"items": ["Why Rust?", 42, {"q": "x"}]}"#).unwrap(),
            vec!["Why Rust?", "42", r#"{"q":"x"}"#]
        );
        assert!(parse_items(r#"{"other": 1}"#).unwrap().is_empty());
        assert!(parse_items(r#"{"items": "one"}"#).is_err());
        assert!(parse_items("not json").is_err());
    }

    #[test]
    fn test_pairing_fills_missing_answers() {
        let items = pair_questions_and_answers(
            vec!["Q1".into(), "Q2".into(), "Q3".into()],
            vec!["A1".into()],
        );
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].answer, "A1");
        assert_eq!(items[2], QaItem { question: "Q3".into(), answer: String::new() });
    }

    #[test]
    fn test_extra_answers_are_ignored() {
        let items = pair_questions_and_answers(vec!["Q1".into()], vec!["A1".into(), "A2".into()]);
        assert_eq!(items.len(), 1);
    }
}
