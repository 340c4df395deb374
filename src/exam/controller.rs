//! Exam session controller
//!
//! Owns the screen, the running session and its results, and applies
//! user actions as state transitions:
//!
//! ```text
//! Dashboard --start--> Exam --finish/expiry--> Results <--> Review
//!     ^                  |                        |           |
//!     +------restart-----+------------------------+-----------+
//! ```
//!
//! Expiry is evaluated against the clock before every operation and on
//! every `tick`, so an action arriving after the deadline finds the exam
//! already finished.

use crate::config::ExamConfig;
use crate::exam::clock::{Clock, SystemClock};
use crate::exam::generator::generate_questions;
use crate::models::{ExamReport, ExamResults, ExamSession, LiveStats, QuestionBank, Screen};
use crate::{ExaniError, Result, TIME_WARNING_SECONDS};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::time::Duration;
use tracing::{debug, info, warn};

/// User actions the controller understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExamAction {
    /// Start a new exam with the given configuration
    Start(ExamConfig),
    /// Record an answer for a specific question
    SelectAnswer { question: usize, option: usize },
    /// Record an answer for the question under the cursor
    SelectCurrent(usize),
    /// Move the cursor by a signed offset, clamped
    Navigate(isize),
    /// Move forward, or finish when on the last question
    NextOrFinish,
    /// Move the cursor to a question
    JumpTo(usize),
    /// Finish the exam now
    Finish,
    /// Switch from results to the answer review
    Review,
    /// Switch from the review back to the results summary
    BackToResults,
    /// Discard the session and return to the dashboard
    Restart,
    /// Re-evaluate the timer
    Tick,
}

/// The exam state machine
#[derive(Debug)]
pub struct ExamController {
    bank: QuestionBank,
    clock: Box<dyn Clock>,
    rng: SmallRng,
    config: ExamConfig,
    screen: Screen,
    session: Option<ExamSession>,
    results: Option<ExamResults>,
}

impl ExamController {
    /// Create a controller on the dashboard with the wall clock
    pub fn new(bank: QuestionBank, config: ExamConfig) -> Self {
        Self {
            bank,
            clock: Box::new(SystemClock),
            rng: SmallRng::from_entropy(),
            config,
            screen: Screen::Dashboard,
            session: None,
            results: None,
        }
    }

    /// Use a different time source
    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Make question generation reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn session(&self) -> Option<&ExamSession> {
        self.session.as_ref()
    }

    /// Results of the finished exam, if any
    pub fn results(&self) -> Option<&ExamResults> {
        self.results.as_ref()
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Last configuration used to start an exam (or the initial one)
    pub fn config(&self) -> &ExamConfig {
        &self.config
    }

    /// Apply an action
    pub fn dispatch(&mut self, action: ExamAction) -> Result<()> {
        match action {
            ExamAction::Start(config) => return self.start_exam(config),
            ExamAction::SelectAnswer { question, option } => self.select_answer(question, option),
            ExamAction::SelectCurrent(option) => {
                if let Some(index) = self.session.as_ref().map(ExamSession::current_index) {
                    self.select_answer(index, option);
                }
            }
            ExamAction::Navigate(delta) => self.navigate(delta),
            ExamAction::NextOrFinish => self.next_or_finish(),
            ExamAction::JumpTo(index) => self.jump_to(index),
            ExamAction::Finish => self.finish_exam(),
            ExamAction::Review => self.review_answers(),
            ExamAction::BackToResults => self.back_to_results(),
            ExamAction::Restart => self.restart_exam(),
            ExamAction::Tick => {
                self.tick();
            }
        }
        Ok(())
    }

    /// Generate questions and enter the exam.
    ///
    /// Fails with `ConfigError` when no module is selected, the config is
    /// invalid, or the selected pools hold no questions; the screen stays on
    /// the dashboard in that case.
    pub fn start_exam(&mut self, config: ExamConfig) -> Result<()> {
        self.check_expiry();

        if self.screen != Screen::Dashboard {
            return Err(ExaniError::InvalidState(format!(
                "Cannot start an exam from the {:?} screen",
                self.screen
            )));
        }

        if config.modules.is_empty() {
            return Err(ExaniError::ConfigError(
                "Select at least one module".to_string(),
            ));
        }

        config.validate()?;

        let questions = generate_questions(&self.bank, &config, &mut self.rng);
        if questions.is_empty() {
            return Err(ExaniError::ConfigError(
                "No questions available for the selected modules".to_string(),
            ));
        }

        info!(
            exam_type = %config.exam_type,
            questions = questions.len(),
            time_limit_minutes = config.time_limit_minutes,
            "exam started"
        );

        self.session = Some(ExamSession::new(config.clone(), questions, self.clock.now()));
        self.results = None;
        self.config = config;
        self.screen = Screen::Exam;
        Ok(())
    }

    /// Record an answer. Selecting the current question moves the cursor
    /// to the next one unless it is the last.
    pub fn select_answer(&mut self, question: usize, option: usize) {
        let Some(session) = self.active_session() else {
            debug!(question, option, "answer ignored outside the exam");
            return;
        };

        if !session.record_answer(question, option) {
            warn!(question, option, "answer out of range ignored");
            return;
        }

        if question == session.current_index() && !session.is_last() {
            session.move_by(1);
        }
    }

    /// Move the cursor by `delta`, clamped to the question range
    pub fn navigate(&mut self, delta: isize) {
        match self.active_session() {
            Some(session) => session.move_by(delta),
            None => debug!(delta, "navigation ignored outside the exam"),
        }
    }

    /// Move the cursor to `index`; out-of-range indices are a no-op
    pub fn jump_to(&mut self, index: usize) {
        match self.active_session() {
            Some(session) => {
                if !session.jump_to(index) {
                    debug!(index, "jump out of range ignored");
                }
            }
            None => debug!(index, "jump ignored outside the exam"),
        }
    }

    /// Move forward, or finish when already on the last question
    pub fn next_or_finish(&mut self) {
        let on_last = match self.active_session() {
            Some(session) => session.is_last(),
            None => return,
        };

        if on_last {
            self.finish_exam();
        } else {
            self.navigate(1);
        }
    }

    /// Finish the exam and compute results
    pub fn finish_exam(&mut self) {
        self.check_expiry();
        if self.screen != Screen::Exam {
            debug!(screen = ?self.screen, "finish ignored outside the exam");
            return;
        }
        let now = self.clock.now();
        self.finalize(now);
    }

    /// Show the answer review
    pub fn review_answers(&mut self) {
        self.check_expiry();
        if self.screen == Screen::Results {
            self.screen = Screen::Review;
        } else {
            debug!(screen = ?self.screen, "review ignored");
        }
    }

    /// Return from the review to the results summary
    pub fn back_to_results(&mut self) {
        if self.screen == Screen::Review {
            self.screen = Screen::Results;
        }
    }

    /// Discard the session and results and return to the dashboard.
    /// The last configuration is kept.
    pub fn restart_exam(&mut self) {
        if self.screen != Screen::Dashboard {
            info!(screen = ?self.screen, "exam restarted");
        }
        self.session = None;
        self.results = None;
        self.screen = Screen::Dashboard;
    }

    /// Re-evaluate the timer. Returns true when this call ended the exam.
    pub fn tick(&mut self) -> bool {
        self.check_expiry()
    }

    /// Time since the exam started; the final duration once finished
    pub fn elapsed(&self) -> Duration {
        if let Some(results) = &self.results {
            return results.duration;
        }
        match &self.session {
            Some(session) => (self.clock.now() - session.start_time())
                .to_std()
                .unwrap_or_default(),
            None => Duration::ZERO,
        }
    }

    /// `max(0, time_limit - elapsed)` in whole seconds
    pub fn remaining_seconds(&self) -> u64 {
        match &self.session {
            Some(session) => session
                .config()
                .time_limit_seconds()
                .saturating_sub(self.elapsed().as_secs()),
            None => 0,
        }
    }

    /// Whether the running exam is close to its deadline
    pub fn is_time_warning(&self) -> bool {
        self.screen == Screen::Exam && self.remaining_seconds() <= TIME_WARNING_SECONDS
    }

    /// Running tallies of the current session
    pub fn live_stats(&self) -> Option<LiveStats> {
        self.session.as_ref().map(LiveStats::from_session)
    }

    /// Export document of the finished exam
    pub fn report(&self) -> Result<ExamReport> {
        if !matches!(self.screen, Screen::Results | Screen::Review) {
            return Err(ExaniError::InvalidState(
                "No finished exam to report".to_string(),
            ));
        }
        match (&self.session, &self.results) {
            (Some(session), Some(results)) => Ok(ExamReport::new(session, results)),
            _ => Err(ExaniError::InvalidState(
                "Finished exam has no session data".to_string(),
            )),
        }
    }

    fn active_session(&mut self) -> Option<&mut ExamSession> {
        self.check_expiry();
        if self.screen == Screen::Exam {
            self.session.as_mut()
        } else {
            None
        }
    }

    fn deadline(&self) -> Option<DateTime<Utc>> {
        self.session.as_ref().map(|session| {
            session.start_time()
                + ChronoDuration::seconds(session.config().time_limit_seconds() as i64)
        })
    }

    /// Finish the exam if its deadline has passed
    fn check_expiry(&mut self) -> bool {
        if self.screen != Screen::Exam {
            return false;
        }
        let Some(deadline) = self.deadline() else {
            return false;
        };
        if self.clock.now() < deadline {
            return false;
        }

        info!("time limit reached");
        self.finalize(deadline);
        true
    }

    fn finalize(&mut self, finished_at: DateTime<Utc>) {
        let Some(session) = &self.session else {
            return;
        };
        let results = ExamResults::from_session(session, finished_at);
        info!(
            score = results.score_percent,
            correct = results.correct,
            wrong = results.wrong,
            skipped = results.skipped,
            "exam finished"
        );
        self.results = Some(results);
        self.screen = Screen::Results;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exam::clock::ManualClock;
    use crate::models::Question;
    use std::collections::BTreeMap;

    fn pool(area: &str, size: usize) -> Vec<Question> {
        (0..size)
            .map(|i| {
                Question::new(
                    area.to_string(),
                    format!("{} {}", area, i),
                    vec!["A".to_string(), "B".to_string(), "C".to_string()],
                    i % 3,
                )
            })
            .collect()
    }

    fn controller() -> (ExamController, ManualClock) {
        let mut pools = BTreeMap::new();
        pools.insert("math".to_string(), pool("Math", 10));
        pools.insert("reading".to_string(), pool("Reading", 4));
        let bank = QuestionBank::new(pools).unwrap();
        let clock = ManualClock::default();
        let controller = ExamController::new(bank, ExamConfig::default())
            .with_clock(clock.clone())
            .with_seed(42);
        (controller, clock)
    }

    fn config(count: usize) -> ExamConfig {
        ExamConfig::default()
            .with_modules(["math"])
            .with_question_count(count)
            .with_time_limit(1)
    }

    #[test]
    fn test_start_exam_enters_exam() {
        let (mut controller, _) = controller();
        controller.start_exam(config(5)).unwrap();

        assert_eq!(controller.screen(), Screen::Exam);
        let session = controller.session().unwrap();
        assert_eq!(session.len(), 5);
        assert_eq!(session.current_index(), 0);
        assert!(session.answers().is_empty());
        assert!(session.questions().iter().all(|q| q.area == "Math"));
    }

    #[test]
    fn test_start_exam_without_modules_fails() {
        let (mut controller, _) = controller();
        let err = controller
            .start_exam(ExamConfig::default().with_modules(Vec::<String>::new()))
            .unwrap_err();

        assert!(matches!(err, ExaniError::ConfigError(_)));
        assert_eq!(controller.screen(), Screen::Dashboard);
        assert!(controller.session().is_none());
    }

    #[test]
    fn test_start_exam_with_empty_pools_fails() {
        let (mut controller, _) = controller();
        let err = controller
            .start_exam(ExamConfig::default().with_modules(["astronomy"]))
            .unwrap_err();
        assert!(matches!(err, ExaniError::ConfigError(_)));
        assert_eq!(controller.screen(), Screen::Dashboard);
    }

    #[test]
    fn test_large_exam_is_not_capped() {
        let (mut controller, clock) = controller();
        controller
            .start_exam(config(600).with_time_limit(301))
            .unwrap();

        assert_eq!(controller.session().unwrap().len(), 600);
        assert_eq!(controller.remaining_seconds(), 301 * 60);

        clock.advance_secs(300 * 60);
        assert!(!controller.tick());
        assert_eq!(controller.screen(), Screen::Exam);
        assert_eq!(controller.remaining_seconds(), 60);
    }

    #[test]
    fn test_start_exam_twice_is_invalid() {
        let (mut controller, _) = controller();
        controller.start_exam(config(5)).unwrap();
        assert!(matches!(
            controller.start_exam(config(5)),
            Err(ExaniError::InvalidState(_))
        ));
    }

    #[test]
    fn test_select_answer_auto_advances() {
        let (mut controller, _) = controller();
        controller.start_exam(config(3)).unwrap();

        controller.select_answer(0, 1);
        assert_eq!(controller.session().unwrap().current_index(), 1);

        // answering another question leaves the cursor alone
        controller.select_answer(2, 0);
        assert_eq!(controller.session().unwrap().current_index(), 1);

        controller.jump_to(2);
        controller.select_answer(2, 2);
        let session = controller.session().unwrap();
        assert_eq!(session.current_index(), 2);
        assert_eq!(session.answer(2), Some(2));
        assert_eq!(session.answered_count(), 2);
    }

    #[test]
    fn test_out_of_range_answer_ignored() {
        let (mut controller, _) = controller();
        controller.start_exam(config(3)).unwrap();
        controller.select_answer(7, 0);
        controller.select_answer(0, 9);
        assert!(controller.session().unwrap().answers().is_empty());
    }

    #[test]
    fn test_navigation_clamps_and_jump_bounds() {
        let (mut controller, _) = controller();
        controller.start_exam(config(10)).unwrap();

        controller.navigate(-1);
        assert_eq!(controller.session().unwrap().current_index(), 0);

        controller.jump_to(9);
        controller.navigate(1);
        assert_eq!(controller.session().unwrap().current_index(), 9);

        controller.jump_to(99);
        assert_eq!(controller.session().unwrap().current_index(), 9);
    }

    #[test]
    fn test_next_or_finish_on_last_question() {
        let (mut controller, _) = controller();
        controller.start_exam(config(2)).unwrap();

        controller.next_or_finish();
        assert_eq!(controller.screen(), Screen::Exam);
        assert_eq!(controller.session().unwrap().current_index(), 1);

        controller.next_or_finish();
        assert_eq!(controller.screen(), Screen::Results);
        assert!(controller.results().is_some());
    }

    #[test]
    fn test_results_frozen_after_finish() {
        let (mut controller, _) = controller();
        controller.start_exam(config(3)).unwrap();
        controller.finish_exam();

        controller.select_answer(0, 0);
        controller.navigate(1);
        controller.jump_to(2);

        let session = controller.session().unwrap();
        assert!(session.answers().is_empty());
        assert_eq!(session.current_index(), 0);
        assert_eq!(controller.results().unwrap().skipped, 3);
    }

    #[test]
    fn test_expiry_finishes_exam() {
        let (mut controller, clock) = controller();
        controller.start_exam(config(5)).unwrap();
        assert_eq!(controller.remaining_seconds(), 60);

        clock.advance_secs(59);
        assert!(!controller.tick());
        assert_eq!(controller.remaining_seconds(), 1);
        assert!(controller.is_time_warning());

        clock.advance_secs(2);
        assert!(controller.tick());
        assert_eq!(controller.screen(), Screen::Results);
        assert_eq!(controller.remaining_seconds(), 0);
        // duration is capped at the deadline
        assert_eq!(controller.results().unwrap().duration, Duration::from_secs(60));
    }

    #[test]
    fn test_expiry_wins_over_late_action() {
        let (mut controller, clock) = controller();
        controller.start_exam(config(5)).unwrap();

        clock.advance_secs(120);
        controller.select_answer(0, 0);

        assert_eq!(controller.screen(), Screen::Results);
        assert!(controller.session().unwrap().answers().is_empty());
    }

    #[test]
    fn test_explicit_finish_then_expiry_keeps_one_result() {
        let (mut controller, clock) = controller();
        controller.start_exam(config(5)).unwrap();
        clock.advance_secs(10);
        controller.finish_exam();
        let first = controller.results().cloned().unwrap();

        clock.advance_secs(100);
        assert!(!controller.tick());
        controller.finish_exam();
        assert_eq!(controller.results().unwrap(), &first);
        assert_eq!(first.duration, Duration::from_secs(10));
    }

    #[test]
    fn test_review_and_restart() {
        let (mut controller, _) = controller();
        let config = ExamConfig::default()
            .with_modules(["reading"])
            .with_question_count(4)
            .with_time_limit(45);

        controller.review_answers();
        assert_eq!(controller.screen(), Screen::Dashboard);

        controller.start_exam(config.clone()).unwrap();
        controller.finish_exam();
        controller.review_answers();
        assert_eq!(controller.screen(), Screen::Review);
        assert!(controller.report().is_ok());

        controller.back_to_results();
        assert_eq!(controller.screen(), Screen::Results);

        controller.restart_exam();
        assert_eq!(controller.screen(), Screen::Dashboard);
        assert!(controller.session().is_none());
        assert!(controller.results().is_none());
        assert_eq!(controller.config(), &config);
    }

    #[test]
    fn test_report_requires_finished_exam() {
        let (mut controller, _) = controller();
        assert!(matches!(controller.report(), Err(ExaniError::InvalidState(_))));
        controller.start_exam(config(3)).unwrap();
        assert!(matches!(controller.report(), Err(ExaniError::InvalidState(_))));
    }

    #[test]
    fn test_dispatch_actions() {
        let (mut controller, _) = controller();
        controller.dispatch(ExamAction::Start(config(3))).unwrap();
        controller.dispatch(ExamAction::SelectCurrent(0)).unwrap();
        controller.dispatch(ExamAction::Navigate(-1)).unwrap();
        controller.dispatch(ExamAction::JumpTo(2)).unwrap();
        controller.dispatch(ExamAction::Finish).unwrap();
        controller.dispatch(ExamAction::Review).unwrap();

        assert_eq!(controller.screen(), Screen::Review);
        assert_eq!(controller.results().unwrap().total_questions, 3);

        controller.dispatch(ExamAction::Restart).unwrap();
        assert_eq!(controller.screen(), Screen::Dashboard);
    }

    #[test]
    fn test_live_stats_sum_to_total() {
        let (mut controller, _) = controller();
        controller.start_exam(config(6)).unwrap();
        for (question, option) in [(0, 0), (1, 1), (3, 2)] {
            controller.select_answer(question, option);
            let stats = controller.live_stats().unwrap();
            assert_eq!(stats.total(), 6);
        }
    }
}
