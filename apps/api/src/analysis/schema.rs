//! Fixed shape of the job/résumé match analysis.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::llm_client::coerce;

pub const MAX_RECOMMENDED_COURSES: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisTemplate {
    #[serde(default, deserialize_with = "coerce::object")]
    pub overall_analysis: OverallAnalysis,
    #[serde(default, deserialize_with = "coerce::object")]
    pub charts: Charts,
    #[serde(default, deserialize_with = "coerce::object")]
    pub profile_highlights: ProfileHighlights,
    #[serde(default, deserialize_with = "coerce::object")]
    pub improvement_suggestions: ImprovementSuggestions,
}

/// Scores are 0-100.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallAnalysis {
    #[serde(default, deserialize_with = "coerce::int")]
    pub overall_match_score: i64,
    #[serde(default, deserialize_with = "coerce::int")]
    pub skills_match: i64,
    #[serde(default, deserialize_with = "coerce::int")]
    pub experience_match: i64,
    #[serde(default, deserialize_with = "coerce::int")]
    pub education_match: i64,
    #[serde(default, deserialize_with = "coerce::int")]
    pub certifications_match: i64,
    #[serde(default, deserialize_with = "coerce::int")]
    pub missing_skills_count: i64,
    #[serde(default, deserialize_with = "coerce::int")]
    pub ats_score: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Charts {
    #[serde(default, deserialize_with = "coerce::object")]
    pub skill_match_distribution: SkillMatchDistribution,
    #[serde(default, deserialize_with = "coerce::object")]
    pub experience_comparison: ExperienceComparison,
    #[serde(default, deserialize_with = "coerce::object_list")]
    pub word_cloud_keywords: Vec<WordCloudKeyword>,
    #[serde(default, deserialize_with = "coerce::object_list")]
    pub career_timeline: Vec<CareerTimelineEntry>,
    #[serde(default, deserialize_with = "coerce::object")]
    pub resume_effectiveness: ResumeEffectiveness,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillMatchDistribution {
    #[serde(default, deserialize_with = "coerce::int")]
    pub matched: i64,
    #[serde(default, deserialize_with = "coerce::int")]
    pub missing: i64,
    #[serde(default, deserialize_with = "coerce::int")]
    pub partially_matched: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceComparison {
    #[serde(default, deserialize_with = "coerce::float")]
    pub required_experience_years: f64,
    #[serde(default, deserialize_with = "coerce::float")]
    pub candidate_experience_years: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordCloudKeyword {
    #[serde(default, deserialize_with = "coerce::string")]
    pub word: String,
    #[serde(default, deserialize_with = "coerce::int")]
    pub frequency: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CareerTimelineEntry {
    #[serde(default, deserialize_with = "coerce::string")]
    pub year: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub role: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub organization: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeEffectiveness {
    #[serde(default, deserialize_with = "coerce::int")]
    pub gauge_score: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileHighlights {
    #[serde(default, deserialize_with = "coerce::string_list")]
    pub publications: Vec<String>,
    #[serde(default, deserialize_with = "coerce::string_list")]
    pub volunteer_work: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImprovementSuggestions {
    #[serde(default, deserialize_with = "coerce::string_list")]
    pub textual_feedback: Vec<String>,
    #[serde(default, deserialize_with = "coerce::object_list")]
    pub recommended_courses: Vec<Course>,
    #[serde(default, deserialize_with = "coerce::object_list")]
    pub skill_gap_closure_plan: Vec<SkillGapAction>,
    #[serde(default, deserialize_with = "coerce::string_list")]
    pub resume_optimization_tips: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Course {
    #[serde(default, deserialize_with = "coerce::string")]
    pub name: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub platform: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillGapAction {
    #[serde(default, deserialize_with = "coerce::string")]
    pub missing_skill: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub recommended_action: String,
    /// High, Medium or Low.
    #[serde(default, deserialize_with = "coerce::string")]
    pub priority_level: String,
}

impl AnalysisTemplate {
    /// Shape shown to the model: one empty entry per list so the item shape is visible.
    pub fn prompt_shape() -> Self {
        let mut shape = Self::default();
        shape.charts.word_cloud_keywords.push(WordCloudKeyword::default());
        shape.charts.career_timeline.push(CareerTimelineEntry::default());
        shape
            .improvement_suggestions
            .recommended_courses
            .push(Course::default());
        shape
            .improvement_suggestions
            .skill_gap_closure_plan
            .push(SkillGapAction::default());
        shape
    }

    pub fn normalize(mut self) -> Self {
        let oa = &mut self.overall_analysis;
        for score in [
            &mut oa.overall_match_score,
            &mut oa.skills_match,
            &mut oa.experience_match,
            &mut oa.education_match,
            &mut oa.certifications_match,
            &mut oa.ats_score,
        ] {
            *score = (*score).clamp(0, 100);
        }
        oa.missing_skills_count = oa.missing_skills_count.max(0);

        let gauge = &mut self.charts.resume_effectiveness.gauge_score;
        *gauge = (*gauge).clamp(0, 100);

        self.charts.word_cloud_keywords.retain(|k| !k.word.is_empty());

        let courses = std::mem::take(&mut self.improvement_suggestions.recommended_courses);
        self.improvement_suggestions.recommended_courses = dedup_courses(courses);
        self
    }
}

/// Drops incomplete and repeated (name, url) courses and keeps the first five.
pub fn dedup_courses(courses: Vec<Course>) -> Vec<Course> {
    let mut seen = HashSet::new();
    courses
        .into_iter()
        .filter(|c| !c.name.is_empty() && !c.url.is_empty())
        .filter(|c| seen.insert((c.name.to_lowercase(), c.url.clone())))
        .take(MAX_RECOMMENDED_COURSES)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn course(name: &str, url: &str) -> Course {
        Course {
            name: name.into(),
            platform: "Coursera".into(),
            url: url.into(),
        }
    }

    #[test]
    fn test_scores_are_clamped() {
        let raw = json!({
            "overall_analysis": {"overall_match_score": 140, "skills_match": "-5", "ats_score": 77.6},
            "charts": {"resume_effectiveness": {"gauge_score": 101}}
        });
        let template = serde_json::from_value::<AnalysisTemplate>(raw).unwrap().normalize();
        assert_eq!(template.overall_analysis.overall_match_score, 100);
        assert_eq!(template.overall_analysis.skills_match, 0);
        assert_eq!(template.overall_analysis.ats_score, 78);
        assert_eq!(template.charts.resume_effectiveness.gauge_score, 100);
    }

    #[test]
    fn test_courses_deduplicated_and_capped() {
        let mut courses = vec![
            course("AWS SA", "https://a.example/1"),
            course("aws sa", "https://a.example/1"),
            course("No url", ""),
        ];
        for i in 0..6 {
            courses.push(course(&format!("Course {i}"), &format!("https://c.example/{i}")));
        }
        let out = dedup_courses(courses);
        assert_eq!(out.len(), MAX_RECOMMENDED_COURSES);
        assert_eq!(out[0].name, "AWS SA");
        assert_eq!(out[1].name, "Course 0");
    }

    #[test]
    fn test_prompt_shape_shows_list_items() {
        let value = serde_json::to_value(AnalysisTemplate::prompt_shape()).unwrap();
        assert_eq!(value["charts"]["word_cloud_keywords"][0]["word"], "");
        assert_eq!(
            value["improvement_suggestions"]["skill_gap_closure_plan"][0]["priority_level"],
            ""
        );
        assert!(value["profile_highlights"]["publications"].as_array().unwrap().is_empty());
    }
}
