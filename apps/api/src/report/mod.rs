//! Interview assessment PDF reports.
//!
//! Layout is done by hand on top of `printpdf`'s builtin Helvetica faces:
//! every page gets the brand header, a separator and a centred page number,
//! and body text is word-wrapped against an average glyph width.

mod writer;

use chrono::NaiveDate;

use crate::interview::InterviewType;
use crate::resumes::schema::ResumeData;
use writer::{ReportWriter, Style};

const MAX_LISTED_SKILLS: usize = 10;
const NOT_AVAILABLE: &str = "N/A";

/// Percentages shown in the match analysis row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchScore {
    pub overall: i64,
    pub skills: i64,
    pub experience: i64,
}

pub struct ReportRequest<'a> {
    pub job_id: Option<&'a str>,
    pub interview_type: InterviewType,
    pub questions: &'a [String],
    /// `Some` renders a questions-and-answers report, `None` questions only.
    pub answers: Option<&'a [String]>,
    pub resume: &'a ResumeData,
    pub match_score: Option<MatchScore>,
    pub generated_on: NaiveDate,
}

impl ReportRequest<'_> {
    pub fn title(&self) -> String {
        let mut title = format!("{} Interview Assessment", self.interview_type.title());
        if let Some(job_id) = self.job_id.filter(|id| !id.trim().is_empty()) {
            title.push_str(" - ");
            title.push_str(job_id.trim());
        }
        title
    }
}

/// Renders the report and returns the PDF bytes.
pub fn create_pdf_report(request: &ReportRequest<'_>) -> anyhow::Result<Vec<u8>> {
    render(request).map(|(bytes, _pages)| bytes)
}

fn render(request: &ReportRequest<'_>) -> anyhow::Result<(Vec<u8>, u32)> {
    let title = request.title();
    let mut w = ReportWriter::new(&title)?;

    w.centered(&title, Style::Title);
    w.space(4.0);
    w.paragraph(
        &format!("Generated on {}", request.generated_on.format("%B %d, %Y")),
        Style::Note,
        7.0,
    );
    w.space(7.0);

    if let Some(score) = request.match_score {
        w.heading("Match Analysis");
        w.score_row(&[
            (format!("{}%", score.overall), "Overall Match"),
            (format!("{}%", score.skills), "Skills Match"),
            (format!("{}%", score.experience), "Experience Match"),
        ]);
        w.space(7.0);
    }

    w.heading("Candidate Information");
    for line in candidate_lines(request.resume) {
        w.paragraph(&line, Style::Note, 7.0);
    }
    w.space(7.0);

    match request.answers {
        Some(answers) => {
            w.heading("Interview Questions & Answers");
            for (i, question) in request.questions.iter().enumerate() {
                let answer = answers.get(i).map(|a| format!("Answer: {a}"));
                w.question_block(&format!("{}. {question}", i + 1), answer.as_deref());
            }
        }
        None => {
            w.heading("Interview Questions");
            for (i, question) in request.questions.iter().enumerate() {
                w.question_block(&format!("{}. {question}", i + 1), None);
            }
        }
    }

    w.finish()
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_AVAILABLE
    } else {
        value
    }
}

fn candidate_lines(resume: &ResumeData) -> Vec<String> {
    let skills = resume
        .skills
        .iter()
        .take(MAX_LISTED_SKILLS)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    vec![
        format!("Name: {}", or_na(&resume.candidate_name)),
        format!("Email: {}", or_na(&resume.contact_info.email)),
        format!("Phone: {}", or_na(&resume.contact_info.phone)),
        format!("Experience: {} years", resume.experience_years),
        format!("Skills: {}", or_na(&skills)),
    ]
}
