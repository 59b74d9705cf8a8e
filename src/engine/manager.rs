// src/engine/manager.rs

use std::sync::{Arc, Mutex};

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;

use crate::catalog::ExamCatalog;
use crate::engine::selector::sample_questions;
use crate::error::AppError;
use crate::models::attempt::{AttemptState, QuestionSnapshot};
use crate::models::exam::ExamPage;
use crate::session::{SessionStore, keys};

/// How `resolve` obtained the attempt.
#[derive(Debug)]
pub enum Resolution {
    /// A fresh attempt was sampled, stamped and persisted.
    Created(AttemptState),
    /// The session already held a live attempt for this exam type;
    /// it is returned exactly as stored.
    Resumed(AttemptState),
}

impl Resolution {
    pub fn into_attempt(self) -> AttemptState {
        match self {
            Resolution::Created(attempt) | Resolution::Resumed(attempt) => attempt,
        }
    }

    pub fn is_resumed(&self) -> bool {
        matches!(self, Resolution::Resumed(_))
    }
}

/// Owns attempt identity, creation and persistence.
pub struct AttemptManager {
    store: Arc<dyn SessionStore>,
    catalog: Arc<dyn ExamCatalog>,
    rng: Mutex<StdRng>,
}

impl AttemptManager {
    pub fn new(store: Arc<dyn SessionStore>, catalog: Arc<dyn ExamCatalog>) -> Self {
        Self::with_rng(store, catalog, StdRng::from_entropy())
    }

    /// Seeded constructor so tests get deterministic sampling.
    pub fn with_rng(
        store: Arc<dyn SessionStore>,
        catalog: Arc<dyn ExamCatalog>,
        rng: StdRng,
    ) -> Self {
        Self {
            store,
            catalog,
            rng: Mutex::new(rng),
        }
    }

    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    /// Returns the session's live attempt for this page's exam type,
    /// or creates one.
    ///
    /// Resuming returns the stored attempt untouched: no re-sampling,
    /// no clock reset. Anything else (no attempt, another exam type,
    /// missing or corrupt core fields) replaces whatever was stored
    /// with a freshly sampled attempt started at `now`.
    pub async fn resolve(
        &self,
        session_id: &str,
        page: &ExamPage,
        now: i64,
    ) -> Result<Resolution, AppError> {
        if let Some(attempt) = self.load(session_id).await? {
            if attempt.exam_type_id == page.exam_type.id {
                return Ok(Resolution::Resumed(attempt));
            }
        }

        let settings = page.effective_settings();
        let pool = self.catalog.questions(page.exam_type.id).await?;
        let snapshots = {
            let mut rng = self.rng.lock().expect("rng mutex poisoned");
            sample_questions(&pool, settings.question_count.max(0) as usize, &mut *rng)
        };

        let attempt = AttemptState::new(page.exam_type.id, now, snapshots);
        self.save(session_id, &attempt).await?;

        tracing::info!(
            "Created attempt for exam type {} ({} of {} questions)",
            page.exam_type.code,
            attempt.total(),
            pool.len()
        );

        Ok(Resolution::Created(attempt))
    }

    /// Reads the attempt out of the session store.
    ///
    /// Returns `None` when the session holds no attempt or its core
    /// fields are missing or unreadable; the caller then starts over.
    /// Only a failing store is an error.
    pub async fn load(&self, session_id: &str) -> Result<Option<AttemptState>, AppError> {
        let exam_type_id = match self.field::<i64>(session_id, keys::EXAM_TYPE_ID).await? {
            Some(v) => v,
            None => return Ok(None),
        };
        let questions = match self
            .field::<Vec<QuestionSnapshot>>(session_id, keys::QUESTIONS)
            .await?
        {
            Some(v) => v,
            None => return Ok(None),
        };
        let started_at = match self.field::<i64>(session_id, keys::STARTED_AT).await? {
            Some(v) => v,
            None => return Ok(None),
        };

        // Index and answers are repairable: default when absent.
        let answers = self
            .field(session_id, keys::ANSWERS)
            .await?
            .unwrap_or_default();
        let current_index = self
            .field::<usize>(session_id, keys::CURRENT_INDEX)
            .await?
            .unwrap_or(0);

        let mut attempt = AttemptState {
            exam_type_id,
            started_at,
            questions,
            current_index: 0,
            answers,
        };
        attempt.current_index = attempt.clamp_index(current_index);

        Ok(Some(attempt))
    }

    /// Writes every attempt field back to the session store.
    pub async fn save(&self, session_id: &str, attempt: &AttemptState) -> Result<(), AppError> {
        self.store
            .set(session_id, keys::EXAM_TYPE_ID, json!(attempt.exam_type_id))
            .await?;
        self.store
            .set(
                session_id,
                keys::QUESTIONS,
                serde_json::to_value(&attempt.questions)?,
            )
            .await?;
        self.store
            .set(session_id, keys::STARTED_AT, json!(attempt.started_at))
            .await?;
        self.store
            .set(
                session_id,
                keys::ANSWERS,
                serde_json::to_value(&attempt.answers)?,
            )
            .await?;
        self.store
            .set(session_id, keys::CURRENT_INDEX, json!(attempt.current_index))
            .await?;
        Ok(())
    }

    /// Removes every attempt field from the session. Idempotent.
    pub async fn purge(&self, session_id: &str) -> Result<(), AppError> {
        for key in keys::ALL {
            self.store.delete(session_id, key).await?;
        }
        Ok(())
    }

    async fn field<T: serde::de::DeserializeOwned>(
        &self,
        session_id: &str,
        key: &str,
    ) -> Result<Option<T>, AppError> {
        let value = self.store.get(session_id, key).await?;
        // A value that does not deserialize counts as absent, so a
        // corrupt session heals into a fresh attempt instead of a 500.
        Ok(value.and_then(|v| serde_json::from_value(v).ok()))
    }
}

/// Seconds left on the attempt's clock at `now`; zero or negative
/// means the deadline has passed.
pub fn remaining_seconds(attempt: &AttemptState, duration_minutes: i32, now: i64) -> i64 {
    i64::from(duration_minutes) * 60 - (now - attempt.started_at)
}
