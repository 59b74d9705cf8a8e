// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;

use crate::catalog::ExamCatalog;
use crate::config::Config;
use crate::engine::{AttemptManager, Navigator};
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn ExamCatalog>,
    pub sessions: Arc<dyn SessionStore>,
    pub navigator: Navigator,
    pub config: Config,
}

impl AppState {
    /// Wires the exam engine over the given catalog and session store.
    pub fn new(
        catalog: Arc<dyn ExamCatalog>,
        sessions: Arc<dyn SessionStore>,
        config: Config,
    ) -> Self {
        let manager = Arc::new(AttemptManager::new(sessions.clone(), catalog.clone()));
        Self {
            catalog,
            sessions,
            navigator: Navigator::new(manager),
            config,
        }
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
