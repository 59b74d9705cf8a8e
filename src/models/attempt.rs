// src/models/attempt.rs

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::exam::{Choice, ExamQuestion};

/// Attempt-local copy of a question, captured when the attempt is
/// created. Catalog edits made while an attempt is in flight never
/// reach it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSnapshot {
    pub id: i64,
    pub text: String,
    pub choices: Vec<Choice>,
    pub points: i32,
    pub answers: Vec<String>,
    pub explanation: String,
}

impl From<&ExamQuestion> for QuestionSnapshot {
    fn from(question: &ExamQuestion) -> Self {
        Self {
            id: question.id,
            text: question.question_text.clone(),
            choices: question.choices.clone(),
            points: question.points,
            answers: question.answers.clone(),
            explanation: question.explanation.clone(),
        }
    }
}

impl QuestionSnapshot {
    /// Exact set equality between the selected and correct labels.
    /// A subset or superset of the correct labels is wrong.
    pub fn is_correct(&self, selected: &[String]) -> bool {
        let selected: HashSet<&str> = selected.iter().map(String::as_str).collect();
        let correct: HashSet<&str> = self.answers.iter().map(String::as_str).collect();
        selected == correct
    }
}

/// One visitor's run through a sampled question set. The whole value
/// lives in the session store; nothing about an attempt is written
/// anywhere else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptState {
    pub exam_type_id: i64,
    /// Unix seconds at creation time.
    pub started_at: i64,
    pub questions: Vec<QuestionSnapshot>,
    pub current_index: usize,
    /// Question id -> labels the user last selected for it.
    pub answers: HashMap<i64, Vec<String>>,
}

impl AttemptState {
    pub fn new(exam_type_id: i64, started_at: i64, questions: Vec<QuestionSnapshot>) -> Self {
        Self {
            exam_type_id,
            started_at,
            questions,
            current_index: 0,
            answers: HashMap::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Clamps a raw index into `[0, total - 1]`. Client-supplied
    /// indexes are never trusted verbatim.
    pub fn clamp_index(&self, raw: usize) -> usize {
        if self.questions.is_empty() {
            0
        } else {
            raw.min(self.questions.len() - 1)
        }
    }

    /// Labels previously recorded for a question, empty if none.
    pub fn selected_for(&self, question_id: i64) -> &[String] {
        self.answers
            .get(&question_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Merges a submission into the recorded answers. Each submitted
    /// question fully replaces its previous selection; ids that are
    /// not part of this attempt's snapshot list are dropped.
    pub fn merge_answers(&mut self, submitted: HashMap<i64, Vec<String>>) {
        let known: HashSet<i64> = self.questions.iter().map(|q| q.id).collect();
        for (question_id, labels) in submitted {
            if known.contains(&question_id) {
                self.answers.insert(question_id, labels);
            }
        }
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }
}

/// Navigation action carried by a submission. Absence of both means
/// the attempt is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavAction {
    Next,
    Prev,
}

/// DTO for submitting answers on the current question.
///
/// Key: question id. Value: every label the user has selected for
/// that question (multi-answer questions submit several).
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitExamRequest {
    #[serde(default)]
    #[validate(custom(function = validate_answer_labels))]
    pub answers: HashMap<i64, Vec<String>>,
    pub action: Option<NavAction>,
}

fn validate_answer_labels(
    answers: &HashMap<i64, Vec<String>>,
) -> Result<(), validator::ValidationError> {
    for labels in answers.values() {
        for label in labels {
            if label.is_empty() || label.len() > 10 {
                return Err(validator::ValidationError::new("bad_answer_label"));
            }
        }
    }
    Ok(())
}
