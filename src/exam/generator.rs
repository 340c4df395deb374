//! Question sequence generation
//!
//! Approximately proportional allocation: every selected module gets
//! `floor(n / k)` questions (its pool is reused cyclically when smaller than
//! that quota), the remainder is filled with random picks, then the sequence
//! is shuffled and cut to exactly `n`. Per-module counts are not a strict
//! guarantee.

use crate::config::ExamConfig;
use crate::models::question::{Question, QuestionBank};
use rand::seq::SliceRandom;
use rand::Rng;

/// Generate the question sequence for `config`.
///
/// Returns an empty sequence when no module is selected or every selected
/// pool is empty; otherwise exactly `config.question_count` questions.
pub fn generate_questions<R>(bank: &QuestionBank, config: &ExamConfig, rng: &mut R) -> Vec<Question>
where
    R: Rng + ?Sized,
{
    let target = config.question_count;
    let pools: Vec<&[Question]> = config
        .modules
        .iter()
        .map(|module| bank.pool(module))
        .collect();

    if pools.is_empty() {
        return Vec::new();
    }

    let quota = target / pools.len();
    let mut questions = Vec::with_capacity(target);

    for pool in pools.iter().filter(|pool| !pool.is_empty()) {
        questions.extend((0..quota).map(|i| pool[i % pool.len()].clone()));
    }

    let non_empty: Vec<&[Question]> = pools.into_iter().filter(|pool| !pool.is_empty()).collect();
    if non_empty.is_empty() {
        return Vec::new();
    }

    while questions.len() < target {
        let Some(pool) = non_empty.choose(rng) else {
            break;
        };
        let Some(question) = pool.choose(rng) else {
            break;
        };
        questions.push(question.clone());
    }

    questions.shuffle(rng);
    questions.truncate(target);
    questions
}
