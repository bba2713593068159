//! Quiz scoring

use super::types::Quiz;
use serde::{Deserialize, Serialize};

/// Default pass threshold in percent
pub const DEFAULT_PASSING_SCORE: f64 = 70.0;

/// Result of evaluating submitted answers against a quiz
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuizOutcome {
    pub correct: usize,
    pub total: usize,
    /// Unrounded percentage
    pub score: f64,
    pub passed: bool,
}

impl QuizOutcome {
    /// Percentage rounded for display
    pub fn rounded(&self) -> u32 {
        self.score.round() as u32
    }
}

/// Score a quiz. `answers[i]` is the option picked for question `i`;
/// missing or out-of-range answers count as incorrect.
pub fn score_quiz(quiz: &Quiz, answers: &[Option<usize>], passing_score: f64) -> QuizOutcome {
    let total = quiz.questions.len();
    let correct = quiz
        .questions
        .iter()
        .enumerate()
        .filter(|(i, q)| answers.get(*i).copied().flatten() == Some(q.correct_option_index))
        .count();

    let score = if total == 0 {
        0.0
    } else {
        (correct as f64 / total as f64) * 100.0
    };

    QuizOutcome {
        correct,
        total,
        score,
        passed: score >= passing_score,
    }
}
