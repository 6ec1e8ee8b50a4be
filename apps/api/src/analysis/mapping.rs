//! Dashboard view derived from an analysis, in the camelCase shape the UI reads.

use serde::{Deserialize, Serialize};

use crate::analysis::schema::AnalysisTemplate;
use crate::jobs::schema::JobPosting;
use crate::resumes::schema::ResumeData;

const MAX_IMPROVEMENT_ACTIONS: usize = 6;
const MAX_KEYWORDS: usize = 20;
const MAX_NEXT_STEPS: usize = 8;
const ANALYSIS_SUMMARY: &str = "Analysis generated from your resume and the target role.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateAnalysis {
    pub candidate: CandidateInfo,
    pub metrics: Metrics,
    pub summary: String,
    pub strengths: Vec<Strength>,
    pub improvement_areas: Vec<ImprovementArea>,
    pub recommended_keywords: Vec<KeywordCoverage>,
    pub next_steps: Vec<String>,
    pub interview_topics: Vec<InterviewTopic>,
    pub resume_angles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateInfo {
    pub name: String,
    pub current_role: String,
    pub target_role: String,
    pub target_company: String,
}

/// Every metric is in [0, 1], rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub job_match_score: f64,
    pub ats_score: f64,
    pub leadership_narrative: f64,
    pub quantitative_evidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strength {
    pub label: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementArea {
    pub label: String,
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordCoverage {
    pub keyword: String,
    pub coverage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewTopic {
    pub topic: String,
    pub questions: Vec<String>,
    pub coaching: String,
}

pub fn map_to_candidate_analysis(
    template: &AnalysisTemplate,
    resume: &ResumeData,
    job: &JobPosting,
) -> CandidateAnalysis {
    let keywords = keyword_coverage(template);
    let interview_topics = interview_topics(&keywords);

    CandidateAnalysis {
        candidate: CandidateInfo {
            name: non_empty_or(&resume.candidate_name, "Candidate"),
            current_role: resume.current_role.clone(),
            target_role: non_empty_or(&job.job_title, "Target Role"),
            target_company: non_empty_or(&job.company.name, "Target Company"),
        },
        metrics: metrics(template),
        summary: ANALYSIS_SUMMARY.to_string(),
        strengths: strengths(template),
        improvement_areas: improvement_areas(template),
        recommended_keywords: keywords,
        next_steps: template
            .improvement_suggestions
            .resume_optimization_tips
            .iter()
            .take(MAX_NEXT_STEPS)
            .cloned()
            .collect(),
        interview_topics,
        resume_angles: Vec::new(),
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn metrics(template: &AnalysisTemplate) -> Metrics {
    let oa = &template.overall_analysis;
    let overall = oa.overall_match_score as f64;
    let gauge = template.charts.resume_effectiveness.gauge_score as f64;
    Metrics {
        job_match_score: round2(overall / 100.0),
        ats_score: round2(oa.ats_score as f64 / 100.0),
        leadership_narrative: round2(((overall + gauge) / 200.0).min(1.0)),
        quantitative_evidence: round2(
            ((oa.skills_match + oa.experience_match) as f64 / 200.0).min(1.0),
        ),
    }
}

fn strengths(template: &AnalysisTemplate) -> Vec<Strength> {
    let oa = &template.overall_analysis;
    vec![
        Strength {
            label: "Skills alignment".to_string(),
            detail: format!("Skills match at {}% vs role requirements.", oa.skills_match),
        },
        Strength {
            label: "Experience alignment".to_string(),
            detail: format!(
                "Experience match at {}% relative to benchmark.",
                oa.experience_match
            ),
        },
        Strength {
            label: "ATS readiness".to_string(),
            detail: format!(
                "ATS score at {}% suggests good keyword coverage.",
                oa.ats_score
            ),
        },
    ]
}

fn improvement_areas(template: &AnalysisTemplate) -> Vec<ImprovementArea> {
    let feedback = &template.improvement_suggestions.textual_feedback;
    if feedback.is_empty() {
        return Vec::new();
    }
    vec![ImprovementArea {
        label: "Resume improvements".to_string(),
        actions: feedback.iter().take(MAX_IMPROVEMENT_ACTIONS).cloned().collect(),
    }]
}

/// Coverage is each keyword's frequency relative to the most frequent one.
fn keyword_coverage(template: &AnalysisTemplate) -> Vec<KeywordCoverage> {
    let words = &template.charts.word_cloud_keywords;
    let max_freq = words
        .iter()
        .map(|w| if w.frequency == 0 { 1 } else { w.frequency })
        .max()
        .unwrap_or(1)
        .max(1) as f64;
    words
        .iter()
        .filter(|w| !w.word.is_empty())
        .take(MAX_KEYWORDS)
        .map(|w| KeywordCoverage {
            keyword: w.word.clone(),
            coverage: round2(w.frequency as f64 / max_freq),
        })
        .collect()
}

fn interview_topics(keywords: &[KeywordCoverage]) -> Vec<InterviewTopic> {
    let mut topics = Vec::new();
    if !keywords.is_empty() {
        topics.push(InterviewTopic {
            topic: "Role-specific keywords".to_string(),
            questions: keywords
                .iter()
                .take(3)
                .map(|k| format!("How have you demonstrated {} in recent projects?", k.keyword))
                .collect(),
            coaching: "Tie answers to measurable outcomes and mention stakeholder impact."
                .to_string(),
        });
    }
    topics.push(InterviewTopic {
        topic: "Experience depth".to_string(),
        questions: vec![
            "Walk through a flagship project aligned to this role.".to_string(),
            "Describe a difficult trade-off you made and how you communicated it.".to_string(),
            "How do you measure success and prevent regressions?".to_string(),
        ],
        coaching: "Use concise STAR framing and quantify results.".to_string(),
    });
    topics.push(InterviewTopic {
        topic: "Leadership & collaboration".to_string(),
        questions: vec![
            "Share a time you aligned conflicting senior stakeholders.".to_string(),
            "How do you mentor and scale team practices?".to_string(),
            "Tell us about a risk you managed in an ambiguous situation.".to_string(),
        ],
        coaching: "Emphasize cross-functional rituals and decision cadence.".to_string(),
    });
    topics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::schema::WordCloudKeyword;

    fn template() -> AnalysisTemplate {
        let mut t = AnalysisTemplate::default();
        t.overall_analysis.overall_match_score = 72;
        t.overall_analysis.ats_score = 65;
        t.overall_analysis.skills_match = 80;
        t.overall_analysis.experience_match = 60;
        t.charts.resume_effectiveness.gauge_score = 90;
        t.charts.word_cloud_keywords = vec![
            WordCloudKeyword { word: "Rust".into(), frequency: 8 },
            WordCloudKeyword { word: "Tokio".into(), frequency: 4 },
            WordCloudKeyword { word: "".into(), frequency: 9 },
            WordCloudKeyword { word: "gRPC".into(), frequency: 3 },
        ];
        t.improvement_suggestions.textual_feedback =
            (0..9).map(|i| format!("Feedback {i}")).collect();
        t.improvement_suggestions.resume_optimization_tips =
            (0..10).map(|i| format!("Tip {i}")).collect();
        t
    }

    #[test]
    fn test_metrics_formulas() {
        let m = metrics(&template());
        assert_eq!(m.job_match_score, 0.72);
        assert_eq!(m.ats_score, 0.65);
        assert_eq!(m.leadership_narrative, 0.81);
        assert_eq!(m.quantitative_evidence, 0.7);
    }

    #[test]
    fn test_metrics_are_capped_at_one() {
        let mut t = template();
        t.overall_analysis.overall_match_score = 100;
        t.charts.resume_effectiveness.gauge_score = 100;
        t.overall_analysis.skills_match = 100;
        t.overall_analysis.experience_match = 100;
        let m = metrics(&t);
        assert_eq!(m.leadership_narrative, 1.0);
        assert_eq!(m.quantitative_evidence, 1.0);
    }

    #[test]
    fn test_full_mapping() {
        let mut resume = ResumeData::default();
        resume.current_role = "Backend Engineer".into();
        let mut job = JobPosting::default();
        job.job_title = "Staff Engineer".into();

        let view = map_to_candidate_analysis(&template(), &resume, &job);

        assert_eq!(view.candidate.name, "Candidate");
        assert_eq!(view.candidate.target_role, "Staff Engineer");
        assert_eq!(view.candidate.target_company, "Target Company");
        assert_eq!(view.strengths.len(), 3);
        assert_eq!(view.strengths[0].detail, "Skills match at 80% vs role requirements.");
        assert_eq!(view.improvement_areas[0].actions.len(), 6);
        assert_eq!(view.next_steps.len(), 8);
        // max frequency includes the unnamed entry
        assert_eq!(view.recommended_keywords.len(), 3);
        assert_eq!(view.recommended_keywords[0].coverage, 0.89);
        assert_eq!(view.interview_topics.len(), 3);
        assert_eq!(
            view.interview_topics[0].questions[2],
            "How have you demonstrated gRPC in recent projects?"
        );
        assert!(view.resume_angles.is_empty());

        let json = serde_json::to_value(&view).unwrap();
        assert!(json["metrics"]["jobMatchScore"].is_number());
        assert!(json.get("improvementAreas").is_some());
    }

    #[test]
    fn test_no_keywords_means_two_fixed_topics() {
        let view = map_to_candidate_analysis(
            &AnalysisTemplate::default(),
            &ResumeData::default(),
            &JobPosting::default(),
        );
        assert_eq!(view.interview_topics.len(), 2);
        assert!(view.improvement_areas.is_empty());
        assert_eq!(view.metrics.job_match_score, 0.0);
    }
}
