// src/catalog/mod.rs

pub mod memory;
pub mod pg;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::exam::{ExamPage, ExamQuestion};

pub use memory::MemoryExamCatalog;
pub use pg::PgExamCatalog;

/// Read-only access to exam pages, exam types and their question
/// pools. The exam engine never writes to the catalog; attempts work
/// on snapshots taken at creation time.
#[async_trait]
pub trait ExamCatalog: Send + Sync {
    /// The page for a slug, with its exam type resolved. `None` for an
    /// unknown slug; a page referencing a missing exam type is a
    /// `ConfigError`.
    async fn page(&self, slug: &str) -> Result<Option<ExamPage>, AppError>;

    /// All configured exam pages, for the listing endpoint.
    async fn pages(&self) -> Result<Vec<ExamPage>, AppError>;

    /// The full current question pool of an exam type.
    async fn questions(&self, exam_type_id: i64) -> Result<Vec<ExamQuestion>, AppError>;

    /// Pool size without fetching the pool.
    async fn question_count(&self, exam_type_id: i64) -> Result<i64, AppError>;
}
