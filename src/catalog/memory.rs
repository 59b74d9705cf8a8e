// src/catalog/memory.rs

use std::collections::HashMap;

use async_trait::async_trait;

use crate::catalog::ExamCatalog;
use crate::error::AppError;
use crate::models::exam::{ExamPage, ExamQuestion};

/// In-memory catalog for tests and local development. Questions are
/// grouped by exam type id.
#[derive(Debug, Default)]
pub struct MemoryExamCatalog {
    pages: Vec<ExamPage>,
    questions: HashMap<i64, Vec<ExamQuestion>>,
}

impl MemoryExamCatalog {
    pub fn new(pages: Vec<ExamPage>, questions: Vec<ExamQuestion>) -> Self {
        let mut by_type: HashMap<i64, Vec<ExamQuestion>> = HashMap::new();
        for question in questions {
            by_type.entry(question.exam_type_id).or_default().push(question);
        }
        Self {
            pages,
            questions: by_type,
        }
    }
}

#[async_trait]
impl ExamCatalog for MemoryExamCatalog {
    async fn page(&self, slug: &str) -> Result<Option<ExamPage>, AppError> {
        Ok(self.pages.iter().find(|p| p.slug == slug).cloned())
    }

    async fn pages(&self) -> Result<Vec<ExamPage>, AppError> {
        Ok(self.pages.clone())
    }

    async fn questions(&self, exam_type_id: i64) -> Result<Vec<ExamQuestion>, AppError> {
        Ok(self
            .questions
            .get(&exam_type_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn question_count(&self, exam_type_id: i64) -> Result<i64, AppError> {
        Ok(self
            .questions
            .get(&exam_type_id)
            .map(|pool| pool.len() as i64)
            .unwrap_or(0))
    }
}
