// src/session/mod.rs

pub mod memory;
pub mod pg;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AppError;

pub use memory::MemorySessionStore;
pub use pg::PgSessionStore;

/// Session keys holding one attempt. An attempt exists iff the first
/// three are present and well-formed; index and answers default when
/// missing.
pub mod keys {
    pub const EXAM_TYPE_ID: &str = "exam_type_id";
    pub const QUESTIONS: &str = "questions_data";
    pub const STARTED_AT: &str = "start_time";
    pub const ANSWERS: &str = "submitted_answers";
    pub const CURRENT_INDEX: &str = "current_index";

    pub const ALL: [&str; 5] = [EXAM_TYPE_ID, QUESTIONS, STARTED_AT, ANSWERS, CURRENT_INDEX];
}

/// Durable per-visitor key/value storage surviving across requests.
///
/// Values are plain JSON. A failing store is fatal for the request;
/// an absent or unreadable value is not (callers self-heal by
/// starting a fresh attempt).
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, session_id: &str, key: &str) -> Result<Option<Value>, AppError>;

    async fn set(&self, session_id: &str, key: &str, value: Value) -> Result<(), AppError>;

    async fn delete(&self, session_id: &str, key: &str) -> Result<(), AppError>;
}
