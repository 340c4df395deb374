//! Data models module
//!
//! Contains the question bank, exam session, scoring results and the
//! exportable report.

pub mod question;
pub mod report;
pub mod result;
pub mod session;

// Re-export commonly used types
pub use question::{module_display_name, Question, QuestionBank, MODULE_CATALOG};
pub use report::{ExamReport, QuestionDetail, ReportSummary};
pub use result::{score_percent, AreaTally, ExamResults, LiveStats};
pub use session::{ExamSession, Outcome, OutcomeFilter, Screen};
