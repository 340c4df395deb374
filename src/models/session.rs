//! Exam session model
//!
//! One in-progress or finished exam attempt: the generated questions,
//! the answers recorded so far and the navigation cursor.

use crate::config::ExamConfig;
use crate::models::question::Question;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Screens of the exam state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Configuring the next exam
    #[default]
    Dashboard,
    /// Exam in progress
    Exam,
    /// Exam finished, summary shown
    Results,
    /// Inspecting past answers
    Review,
}

/// Outcome of a single question once scored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Wrong,
    Skipped,
}

/// Outcome filter for the review screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutcomeFilter {
    #[default]
    All,
    Correct,
    Wrong,
    Skipped,
}

impl OutcomeFilter {
    pub fn all() -> [Self; 4] {
        [Self::All, Self::Correct, Self::Wrong, Self::Skipped]
    }

    pub fn matches(&self, outcome: Outcome) -> bool {
        match self {
            Self::All => true,
            Self::Correct => outcome == Outcome::Correct,
            Self::Wrong => outcome == Outcome::Wrong,
            Self::Skipped => outcome == Outcome::Skipped,
        }
    }

    pub fn display_text(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Correct => "Correct",
            Self::Wrong => "Wrong",
            Self::Skipped => "Unanswered",
        }
    }

    /// Cycle to the next filter
    pub fn next(&self) -> Self {
        let filters = Self::all();
        let index = filters.iter().position(|f| f == self).unwrap_or(0);
        filters[(index + 1) % filters.len()]
    }
}

/// A single exam attempt
#[derive(Debug, Clone)]
pub struct ExamSession {
    config: ExamConfig,
    questions: Vec<Question>,
    answers: BTreeMap<usize, usize>,
    current_index: usize,
    start_time: DateTime<Utc>,
}

impl ExamSession {
    /// Create a session over an already generated question sequence
    pub fn new(config: ExamConfig, questions: Vec<Question>, start_time: DateTime<Utc>) -> Self {
        Self {
            config,
            questions,
            answers: BTreeMap::new(),
            current_index: 0,
            start_time,
        }
    }

    /// Configuration frozen at exam start
    pub fn config(&self) -> &ExamConfig {
        &self.config
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &BTreeMap<usize, usize> {
        &self.answers
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Selected option for a question, if answered
    pub fn answer(&self, index: usize) -> Option<usize> {
        self.answers.get(&index).copied()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn is_last(&self) -> bool {
        self.current_index + 1 >= self.questions.len()
    }

    /// Record an answer. Returns false when the question or option index
    /// is out of range, leaving the session unchanged.
    pub fn record_answer(&mut self, index: usize, option: usize) -> bool {
        match self.questions.get(index) {
            Some(question) if option < question.options.len() => {
                self.answers.insert(index, option);
                true
            }
            _ => false,
        }
    }

    /// Move the cursor by `delta`, clamped to the question range
    pub fn move_by(&mut self, delta: isize) {
        if self.questions.is_empty() {
            return;
        }
        let last = self.questions.len() - 1;
        let target = self.current_index as isize + delta;
        self.current_index = target.clamp(0, last as isize) as usize;
    }

    /// Set the cursor; out-of-range indices are ignored
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index < self.questions.len() {
            self.current_index = index;
            true
        } else {
            false
        }
    }

    /// Scored outcome of one question
    pub fn outcome(&self, index: usize) -> Outcome {
        match (self.answer(index), self.questions.get(index)) {
            (Some(option), Some(question)) if question.is_correct(option) => Outcome::Correct,
            (Some(_), Some(_)) => Outcome::Wrong,
            _ => Outcome::Skipped,
        }
    }

    /// Distinct areas in question order
    pub fn areas(&self) -> Vec<&str> {
        let mut areas: Vec<&str> = Vec::new();
        for question in &self.questions {
            if !areas.contains(&question.area.as_str()) {
                areas.push(&question.area);
            }
        }
        areas
    }

    /// Indices of the questions matching an outcome filter and optional area
    pub fn filter_indices(&self, filter: OutcomeFilter, area: Option<&str>) -> Vec<usize> {
        (0..self.questions.len())
            .filter(|&i| area.map_or(true, |a| self.questions[i].area == a))
            .filter(|&i| filter.matches(self.outcome(i)))
            .collect()
    }
}
