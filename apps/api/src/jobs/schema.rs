//! Fixed shape of a parsed job posting.

use serde::{Deserialize, Serialize};

use crate::llm_client::coerce;

/// The raw description is capped at this many characters.
pub const MAX_RAW_DESCRIPTION_CHARS: usize = 2000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(default, deserialize_with = "coerce::string")]
    pub job_title: String,
    #[serde(default, deserialize_with = "coerce::object")]
    pub company: Company,
    #[serde(default, deserialize_with = "coerce::object")]
    pub job_details: JobDetails,
    #[serde(default, deserialize_with = "coerce::object")]
    pub requirements: Requirements,
    #[serde(default, deserialize_with = "coerce::string_list")]
    pub responsibilities: Vec<String>,
    #[serde(default, deserialize_with = "coerce::string_list")]
    pub core_competencies_needed: Vec<String>,
    #[serde(default, deserialize_with = "coerce::string")]
    pub job_description_raw: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub application_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default, deserialize_with = "coerce::string")]
    pub name: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub location: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub industry: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobDetails {
    #[serde(default, deserialize_with = "coerce::string")]
    pub employment_type: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub work_mode: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub experience_required: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub salary_range: String,
    /// `YYYY-MM` or empty.
    #[serde(default, deserialize_with = "coerce::string")]
    pub posted_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Requirements {
    #[serde(default, deserialize_with = "coerce::string_list")]
    pub must_have_skills: Vec<String>,
    #[serde(default, deserialize_with = "coerce::string_list")]
    pub nice_to_have_skills: Vec<String>,
    #[serde(default, deserialize_with = "coerce::string_list")]
    pub education: Vec<String>,
    #[serde(default, deserialize_with = "coerce::int")]
    pub experience_years: i64,
    #[serde(default, deserialize_with = "coerce::string_list")]
    pub certifications: Vec<String>,
}

impl JobPosting {
    /// Applies the invariants the model is asked for but does not always honour.
    pub fn normalize(mut self, source_url: &str) -> Self {
        if self.job_description_raw.chars().count() > MAX_RAW_DESCRIPTION_CHARS {
            self.job_description_raw = self
                .job_description_raw
                .chars()
                .take(MAX_RAW_DESCRIPTION_CHARS)
                .collect();
        }
        if self.application_url.is_empty() {
            self.application_url = source_url.to_string();
        }
        self.requirements.experience_years = self.requirements.experience_years.max(0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_template_has_every_key() {
        let value = serde_json::to_value(JobPosting::default()).unwrap();
        for key in [
            "job_title",
            "company",
            "job_details",
            "requirements",
            "responsibilities",
            "core_competencies_needed",
            "job_description_raw",
            "application_url",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["requirements"]["experience_years"], 0);
    }

    #[test]
    fn test_sloppy_reply_is_coerced_and_normalized() {
        let raw = json!({
            "job_title": "Platform Engineer",
            "company": {"name": "Acme", "location": null},
            "job_details": null,
            "requirements": {
                "must_have_skills": ["Rust", "Kubernetes", null],
                "experience_years": "5+"
            },
            "responsibilities": "Build things",
            "job_description_raw": "x".repeat(2500),
        });
        let job: JobPosting = serde_json::from_value(raw).unwrap();
        let job = job.normalize("https://jobs.example.com/42");

        assert_eq!(job.company.name, "Acme");
        assert_eq!(job.company.location, "");
        assert_eq!(job.job_details, JobDetails::default());
        assert_eq!(job.requirements.must_have_skills, vec!["Rust", "Kubernetes"]);
        assert_eq!(job.requirements.experience_years, 5);
        assert!(job.responsibilities.is_empty());
        assert_eq!(job.job_description_raw.chars().count(), MAX_RAW_DESCRIPTION_CHARS);
        assert_eq!(job.application_url, "https://jobs.example.com/42");
    }

    #[test]
    fn test_normalize_keeps_model_application_url() {
        let job = JobPosting {
            application_url: "https://apply.example.com".into(),
            ..Default::default()
        };
        assert_eq!(
            job.normalize("https://jobs.example.com/42").application_url,
            "https://apply.example.com"
        );
    }
}
