use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use platform::{StateStore, Time};
use tokio::sync::Mutex;

/// In-memory stand-in for the browser's key/value storage.
#[derive(Debug, Clone, Default)]
pub struct AppContext {
    state: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl AppContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for AppContext {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.state.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.state.lock().await.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

impl Time for AppContext {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
