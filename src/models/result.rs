//! Exam result data models
//!
//! Scoring of a session: correct/wrong/skipped tallies, the percentage
//! score and the per-area breakdown.

use crate::config::ExamType;
use crate::models::session::{ExamSession, Outcome};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::time::Duration;

/// Correct answers over answered questions for one area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AreaTally {
    pub correct: usize,
    pub total: usize,
}

/// Running tallies of a session, valid at any point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LiveStats {
    pub correct: usize,
    pub wrong: usize,
    pub skipped: usize,
    pub score_percent: u32,
}

impl LiveStats {
    /// Tally every question of the session
    pub fn from_session(session: &ExamSession) -> Self {
        let mut stats = Self::default();
        for index in 0..session.len() {
            match session.outcome(index) {
                Outcome::Correct => stats.correct += 1,
                Outcome::Wrong => stats.wrong += 1,
                Outcome::Skipped => stats.skipped += 1,
            }
        }
        stats.score_percent = score_percent(stats.correct, session.len());
        stats
    }

    pub fn total(&self) -> usize {
        self.correct + self.wrong + self.skipped
    }
}

/// Final results, computed once when the exam finishes
#[derive(Debug, Clone, PartialEq)]
pub struct ExamResults {
    pub exam_type: ExamType,
    pub modules: Vec<String>,
    pub correct: usize,
    pub wrong: usize,
    pub skipped: usize,
    pub total_questions: usize,
    pub score_percent: u32,
    /// Time between exam start and finish
    pub duration: Duration,
    /// Answered questions grouped by area
    pub per_area: BTreeMap<String, AreaTally>,
    pub finished_at: DateTime<Utc>,
}

impl ExamResults {
    /// Score a session finished at `finished_at`
    pub fn from_session(session: &ExamSession, finished_at: DateTime<Utc>) -> Self {
        let stats = LiveStats::from_session(session);
        let duration = (finished_at - session.start_time())
            .to_std()
            .unwrap_or_default();

        Self {
            exam_type: session.config().exam_type,
            modules: session.config().modules.iter().cloned().collect(),
            correct: stats.correct,
            wrong: stats.wrong,
            skipped: stats.skipped,
            total_questions: session.len(),
            score_percent: stats.score_percent,
            duration,
            per_area: area_breakdown(session),
            finished_at,
        }
    }
}

/// Group answered questions by area. Areas with nothing answered are omitted.
pub fn area_breakdown(session: &ExamSession) -> BTreeMap<String, AreaTally> {
    let mut breakdown: BTreeMap<String, AreaTally> = BTreeMap::new();
    for (&index, &option) in session.answers() {
        let Some(question) = session.questions().get(index) else {
            continue;
        };
        let tally = breakdown.entry(question.area.clone()).or_default();
        tally.total += 1;
        if question.is_correct(option) {
            tally.correct += 1;
        }
    }
    breakdown
}

/// Percentage of `correct` over `total`, rounded half-to-even; 0 when `total` is 0
pub fn score_percent(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let scaled = 100 * correct.min(total);
    let quotient = scaled / total;
    let twice_remainder = 2 * (scaled % total);
    let rounded = if twice_remainder > total || (twice_remainder == total && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    };
    rounded as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExamConfig;
    use crate::models::question::Question;
    use chrono::Duration as ChronoDuration;

    fn question(area: &str, correct: usize) -> Question {
        Question::new(area, "q", vec!["A".to_string(), "B".to_string()], correct)
    }

    #[test]
    fn test_score_percent() {
        assert_eq!(score_percent(0, 0), 0);
        assert_eq!(score_percent(1, 3), 33);
        assert_eq!(score_percent(2, 3), 67);
        assert_eq!(score_percent(3, 3), 100);
        assert_eq!(score_percent(0, 7), 0);
    }

    #[test]
    fn test_score_percent_rounds_half_to_even() {
        // 1/8 = 12.5, 3/8 = 37.5, 5/8 = 62.5
        assert_eq!(score_percent(1, 8), 12);
        assert_eq!(score_percent(3, 8), 38);
        assert_eq!(score_percent(5, 8), 62);
        // 1/40 = 2.5
        assert_eq!(score_percent(1, 40), 2);
    }

    #[test]
    fn test_score_percent_bounds() {
        for total in 1..50 {
            for correct in 0..=total {
                let score = score_percent(correct, total);
                assert!(score <= 100);
                let exact = 100.0 * correct as f64 / total as f64;
                assert!((score as f64 - exact).abs() <= 0.5);
            }
        }
    }

    #[test]
    fn test_results_from_session() {
        let start = Utc::now();
        let mut session = ExamSession::new(
            ExamConfig::default(),
            vec![question("Física", 0), question("Física", 1), question("Química", 0)],
            start,
        );
        session.record_answer(0, 0);
        session.record_answer(1, 0);

        let results = ExamResults::from_session(&session, start + ChronoDuration::seconds(95));
        assert_eq!(results.correct, 1);
        assert_eq!(results.wrong, 1);
        assert_eq!(results.skipped, 1);
        assert_eq!(results.score_percent, 33);
        assert_eq!(results.duration, Duration::from_secs(95));

        // Química has no answered questions
        assert_eq!(results.per_area.len(), 1);
        assert_eq!(
            results.per_area.get("Física"),
            Some(&AreaTally { correct: 1, total: 2 })
        );
    }

    #[test]
    fn test_finish_before_start_has_zero_duration() {
        let start = Utc::now();
        let session = ExamSession::new(ExamConfig::default(), vec![question("Física", 0)], start);
        let results = ExamResults::from_session(&session, start - ChronoDuration::seconds(5));
        assert_eq!(results.duration, Duration::ZERO);
    }

    #[test]
    fn test_live_stats_total() {
        let session = ExamSession::new(
            ExamConfig::default(),
            vec![question("Física", 0), question("Física", 1)],
            Utc::now(),
        );
        let stats = LiveStats::from_session(&session);
        assert_eq!(stats.total(), 2);
        assert_eq!(stats.skipped, 2);
        assert_eq!(stats.score_percent, 0);
    }
}
