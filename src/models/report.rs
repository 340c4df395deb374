//! Exportable exam report
//!
//! The JSON document written on export (summary plus per-question detail)
//! and its flattened one-row CSV summary.

use crate::models::result::ExamResults;
use crate::models::session::ExamSession;
use crate::util::format::format_hms;
use serde::{Deserialize, Serialize};

/// Column order of the CSV summary
pub const CSV_HEADER: [&str; 8] = [
    "exam_type",
    "score",
    "correct",
    "wrong",
    "skipped",
    "total_questions",
    "duration",
    "date",
];

/// Summary block of an exported report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub exam_type: String,
    pub score: u32,
    pub correct: usize,
    pub wrong: usize,
    pub skipped: usize,
    pub total_questions: usize,
    pub duration_seconds: u64,
    /// Local finish time, `YYYY-MM-DD HH:MM:SS`
    pub date: String,
    pub modules: Vec<String>,
}

/// Per-question detail of an exported report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDetail {
    /// 1-based question number
    pub index: usize,
    pub area: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub user_index: Option<usize>,
    pub is_correct: bool,
    pub was_skipped: bool,
}

/// Complete export document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamReport {
    pub summary: ReportSummary,
    pub questions: Vec<QuestionDetail>,
}

impl ExamReport {
    /// Build the report of a finished session
    pub fn new(session: &ExamSession, results: &ExamResults) -> Self {
        let summary = ReportSummary {
            exam_type: results.exam_type.as_str().to_string(),
            score: results.score_percent,
            correct: results.correct,
            wrong: results.wrong,
            skipped: results.skipped,
            total_questions: results.total_questions,
            duration_seconds: results.duration.as_secs(),
            date: results
                .finished_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            modules: results.modules.clone(),
        };

        let questions = session
            .questions()
            .iter()
            .enumerate()
            .map(|(i, question)| {
                let user_index = session.answer(i);
                QuestionDetail {
                    index: i + 1,
                    area: question.area.clone(),
                    text: question.text.clone(),
                    options: question.options.clone(),
                    correct_index: question.correct_index,
                    user_index,
                    is_correct: user_index.is_some_and(|u| question.is_correct(u)),
                    was_skipped: user_index.is_none(),
                }
            })
            .collect();

        Self { summary, questions }
    }

    /// Pretty-printed JSON form
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Flattened summary: a header line and one data row
    pub fn to_csv(&self) -> String {
        let s = &self.summary;
        let row = [
            s.exam_type.clone(),
            s.score.to_string(),
            s.correct.to_string(),
            s.wrong.to_string(),
            s.skipped.to_string(),
            s.total_questions.to_string(),
            format_hms(s.duration_seconds),
            s.date.clone(),
        ];

        let header = CSV_HEADER.join(",");
        let values: Vec<String> = row.iter().map(|v| csv_field(v)).collect();
        format!("{}\n{}\n", header, values.join(","))
    }
}

/// Quote a CSV field when it contains a delimiter, quote or newline
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
