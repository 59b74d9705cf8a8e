// src/models/result.rs

use serde::Serialize;

use crate::models::exam::Choice;

/// View model for rendering one question of an active attempt.
#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub slug: String,
    pub current_index: usize,
    pub total: usize,
    /// Questions with at least one recorded selection.
    pub answered: usize,
    pub remaining_seconds: i64,
    /// Labels the visitor previously selected for this question.
    pub selected_labels: Vec<String>,
    pub question: QuestionPrompt,
}

/// The question itself, without the correct answers.
#[derive(Debug, Serialize)]
pub struct QuestionPrompt {
    pub id: i64,
    pub text: String,
    pub choices: Vec<Choice>,
    pub points: i32,
    /// How many labels the correct answer consists of. Carried as a
    /// structured field; the client decides how to word the hint.
    pub expected_selections: usize,
}

/// Per-question breakdown of a scored attempt.
#[derive(Debug, Serialize)]
pub struct QuestionResult {
    pub question: String,
    pub options: Vec<Choice>,
    pub selected: Vec<String>,
    pub correct_answers: Vec<String>,
    pub is_correct: bool,
    pub points: i32,
    pub explanation: String,
}

#[derive(Debug, Serialize)]
pub struct ScoreSummary {
    pub earned_points: i64,
    pub total_points: i64,
    /// Rounded to one decimal; 0 when the attempt had no points at all.
    pub percentage: f64,
}

/// The terminal response of an attempt. Produced exactly once; the
/// attempt is gone from the session store by the time this exists.
#[derive(Debug, Serialize)]
pub struct ExamResult {
    pub submitted: bool,
    pub details: Vec<QuestionResult>,
    pub score: ScoreSummary,
}
