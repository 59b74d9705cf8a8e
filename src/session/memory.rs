// src/session/memory.rs

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AppError;
use crate::session::SessionStore;

/// Process-local session store. Used by tests and local development;
/// state is gone when the process exits.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<HashMap<String, HashMap<String, Value>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, session_id: &str, key: &str) -> Result<Option<Value>, AppError> {
        let inner = self.inner.lock().expect("session store mutex poisoned");
        Ok(inner
            .get(session_id)
            .and_then(|values| values.get(key))
            .cloned())
    }

    async fn set(&self, session_id: &str, key: &str, value: Value) -> Result<(), AppError> {
        let mut inner = self.inner.lock().expect("session store mutex poisoned");
        inner
            .entry(session_id.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, session_id: &str, key: &str) -> Result<(), AppError> {
        let mut inner = self.inner.lock().expect("session store mutex poisoned");
        if let Some(values) = inner.get_mut(session_id) {
            values.remove(key);
            if values.is_empty() {
                inner.remove(session_id);
            }
        }
        Ok(())
    }
}
