// src/models/exam.rs

use serde::{Deserialize, Serialize};

/// One answer option of a question: a short label (usually a single
/// letter) and the option text. Stored as an ordered list so the
/// display order survives serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    pub text: String,
}

/// Represents the 'exam_types' table. Immutable reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamType {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub default_question_count: i32,
    pub default_duration_minutes: i32,
}

/// A question-bank entry for one exam type.
///
/// `answers` holds the correct labels; comparing a submission against
/// it is exact set equality, never partial credit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamQuestion {
    pub id: i64,
    pub exam_type_id: i64,
    /// Free-text grouping label from the question bank (e.g. a syllabus
    /// module). Not shown during an attempt.
    pub module: String,
    pub question_text: String,
    pub choices: Vec<Choice>,
    pub answers: Vec<String>,
    pub points: i32,
    pub explanation: String,
}

/// An exam page as configured by editors: a slug, a title, the exam
/// type it draws questions from and optional per-page overrides for
/// question count and duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamPage {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub exam_type: ExamType,
    pub question_count: Option<i32>,
    pub duration_minutes: Option<i32>,
}

/// Question count and duration after applying page overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveSettings {
    pub question_count: i32,
    pub duration_minutes: i32,
}

impl ExamPage {
    /// Page override wins, exam type default otherwise.
    pub fn effective_settings(&self) -> EffectiveSettings {
        EffectiveSettings {
            question_count: self
                .question_count
                .unwrap_or(self.exam_type.default_question_count),
            duration_minutes: self
                .duration_minutes
                .unwrap_or(self.exam_type.default_duration_minutes),
        }
    }
}

/// Listing row for `GET /api/exams`.
#[derive(Debug, Serialize)]
pub struct ExamPageSummary {
    pub slug: String,
    pub title: String,
    pub exam_type: String,
    pub question_count: i32,
    pub duration_minutes: i32,
}

impl From<&ExamPage> for ExamPageSummary {
    fn from(page: &ExamPage) -> Self {
        let settings = page.effective_settings();
        Self {
            slug: page.slug.clone(),
            title: page.title.clone(),
            exam_type: page.exam_type.name.clone(),
            question_count: settings.question_count,
            duration_minutes: settings.duration_minutes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(question_count: Option<i32>, duration_minutes: Option<i32>) -> ExamPage {
        ExamPage {
            id: 1,
            slug: "theory".to_string(),
            title: "Theory exam".to_string(),
            exam_type: ExamType {
                id: 7,
                code: "theory".to_string(),
                name: "Theory".to_string(),
                default_question_count: 40,
                default_duration_minutes: 60,
            },
            question_count,
            duration_minutes,
        }
    }

    #[test]
    fn effective_settings_fall_back_to_type_defaults() {
        let settings = page(None, None).effective_settings();
        assert_eq!(settings.question_count, 40);
        assert_eq!(settings.duration_minutes, 60);
    }

    #[test]
    fn effective_settings_prefer_page_overrides() {
        let settings = page(Some(10), Some(15)).effective_settings();
        assert_eq!(settings.question_count, 10);
        assert_eq!(settings.duration_minutes, 15);
    }
}
