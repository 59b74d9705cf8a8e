// src/catalog/pg.rs

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::prelude::FromRow;
use sqlx::types::Json;

use crate::catalog::ExamCatalog;
use crate::error::AppError;
use crate::models::exam::{Choice, ExamPage, ExamQuestion, ExamType};

/// Catalog backed by the 'exam_types', 'exam_questions' and
/// 'exam_pages' tables.
#[derive(Debug, Clone)]
pub struct PgExamCatalog {
    pool: PgPool,
}

impl PgExamCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Row of the page/type join. The type columns are nullable because
/// the join is LEFT: a page whose exam type row is gone must surface
/// as a configuration error, not vanish from the API.
#[derive(Debug, FromRow)]
struct PageRow {
    id: i64,
    slug: String,
    title: String,
    question_count: Option<i32>,
    duration_minutes: Option<i32>,
    exam_type_id: Option<i64>,
    code: Option<String>,
    name: Option<String>,
    default_question_count: Option<i32>,
    default_duration_minutes: Option<i32>,
}

impl PageRow {
    fn into_page(self) -> Result<ExamPage, AppError> {
        let (Some(exam_type_id), Some(code), Some(name), Some(count), Some(duration)) = (
            self.exam_type_id,
            self.code,
            self.name,
            self.default_question_count,
            self.default_duration_minutes,
        ) else {
            return Err(AppError::ConfigError(format!(
                "exam page '{}' references a missing exam type",
                self.slug
            )));
        };

        Ok(ExamPage {
            id: self.id,
            slug: self.slug,
            title: self.title,
            exam_type: ExamType {
                id: exam_type_id,
                code,
                name,
                default_question_count: count,
                default_duration_minutes: duration,
            },
            question_count: self.question_count,
            duration_minutes: self.duration_minutes,
        })
    }
}

#[derive(Debug, FromRow)]
struct QuestionRow {
    id: i64,
    exam_type_id: i64,
    module: String,
    question_text: String,
    choices: Json<Vec<Choice>>,
    answers: Json<Vec<String>>,
    points: i32,
    explanation: String,
}

impl From<QuestionRow> for ExamQuestion {
    fn from(row: QuestionRow) -> Self {
        ExamQuestion {
            id: row.id,
            exam_type_id: row.exam_type_id,
            module: row.module,
            question_text: row.question_text,
            choices: row.choices.0,
            answers: row.answers.0,
            points: row.points,
            explanation: row.explanation,
        }
    }
}

const PAGE_SELECT: &str = r#"
    SELECT
        p.id, p.slug, p.title, p.question_count, p.duration_minutes,
        t.id AS exam_type_id, t.code, t.name,
        t.default_question_count, t.default_duration_minutes
    FROM exam_pages p
    LEFT JOIN exam_types t ON t.id = p.exam_type_id
"#;

#[async_trait]
impl ExamCatalog for PgExamCatalog {
    async fn page(&self, slug: &str) -> Result<Option<ExamPage>, AppError> {
        let row = sqlx::query_as::<_, PageRow>(&format!("{PAGE_SELECT} WHERE p.slug = $1"))
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch exam page {}: {:?}", slug, e);
                AppError::InternalServerError(e.to_string())
            })?;

        row.map(PageRow::into_page).transpose()
    }

    async fn pages(&self) -> Result<Vec<ExamPage>, AppError> {
        let rows = sqlx::query_as::<_, PageRow>(&format!("{PAGE_SELECT} ORDER BY p.slug"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list exam pages: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })?;

        rows.into_iter().map(PageRow::into_page).collect()
    }

    async fn questions(&self, exam_type_id: i64) -> Result<Vec<ExamQuestion>, AppError> {
        let rows = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT id, exam_type_id, module, question_text,
                   choices, answers, points, explanation
            FROM exam_questions
            WHERE exam_type_id = $1
            ORDER BY id
            "#,
        )
        .bind(exam_type_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(
                "Failed to fetch questions for exam type {}: {:?}",
                exam_type_id,
                e
            );
            AppError::InternalServerError(e.to_string())
        })?;

        Ok(rows.into_iter().map(ExamQuestion::from).collect())
    }

    async fn question_count(&self, exam_type_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM exam_questions WHERE exam_type_id = $1",
        )
        .bind(exam_type_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(
                "Failed to count questions for exam type {}: {:?}",
                exam_type_id,
                e
            );
            AppError::InternalServerError(e.to_string())
        })?;

        Ok(count)
    }
}
