//! Fixed shape of a parsed résumé.

use serde::{Deserialize, Serialize};

use crate::llm_client::coerce;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeData {
    #[serde(default, deserialize_with = "coerce::string")]
    pub candidate_name: String,
    #[serde(default, deserialize_with = "coerce::object")]
    pub contact_info: ContactInfo,
    #[serde(default, deserialize_with = "coerce::string")]
    pub current_role: String,
    #[serde(default, deserialize_with = "coerce::int")]
    pub experience_years: i64,
    #[serde(default, deserialize_with = "coerce::string_list")]
    pub core_competencies: Vec<String>,
    #[serde(default, deserialize_with = "coerce::string_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "coerce::object_list")]
    pub education: Vec<Education>,
    #[serde(default, deserialize_with = "coerce::object_list")]
    pub work_experience: Vec<WorkExperience>,
    #[serde(default, deserialize_with = "coerce::string_list")]
    pub achievements: Vec<String>,
    #[serde(default, deserialize_with = "coerce::object_list")]
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default, deserialize_with = "coerce::string")]
    pub email: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub phone: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub linkedin: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub portfolio: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default, deserialize_with = "coerce::string")]
    pub institution: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub degree: String,
    #[serde(default, deserialize_with = "coerce::int")]
    pub year: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkExperience {
    #[serde(default, deserialize_with = "coerce::string")]
    pub company: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub role: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub employment_type: String,
    /// `YYYY-MM`.
    #[serde(default, deserialize_with = "coerce::string")]
    pub start_date: String,
    /// `YYYY-MM`, or empty while current.
    #[serde(default, deserialize_with = "coerce::string")]
    pub end_date: String,
    #[serde(default, deserialize_with = "coerce::boolean")]
    pub is_current: bool,
    #[serde(default, deserialize_with = "coerce::string")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, deserialize_with = "coerce::string")]
    pub title: String,
    #[serde(default, deserialize_with = "coerce::string_list")]
    pub tech_stack: Vec<String>,
    #[serde(default, deserialize_with = "coerce::string_list")]
    pub details: Vec<String>,
    #[serde(default, deserialize_with = "coerce::string")]
    pub github_url: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub live_url: String,
}

impl ResumeData {
    pub fn normalize(mut self) -> Self {
        self.contact_info.email = self.contact_info.email.to_lowercase();
        self.experience_years = self.experience_years.max(0);
        // Stable sort keeps the model's order for entries sharing a year.
        self.education.sort_by(|a, b| b.year.cmp(&a.year));
        self
    }
}
