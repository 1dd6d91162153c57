//! In-memory destination sink for tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use serde_json::Value;

use super::{DocumentSink, SinkError};

/// A [`DocumentSink`] that keeps documents in a hash map.
///
/// Writes to keys registered via [`MemorySink::fail_writes_to`] fail with a
/// backend error, which lets tests exercise partial-failure handling without
/// a destination server.
#[derive(Debug, Default)]
pub struct MemorySink {
    documents: Mutex<HashMap<String, Value>>,
    failing_keys: Mutex<HashSet<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write (upsert or remove) to `key` fail.
    pub fn fail_writes_to(&self, key: &str) {
        self.failing_keys.lock().unwrap().insert(key.to_string());
    }

    /// The stored document at `key`, if any.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.documents.lock().unwrap().get(key).cloned()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_failure(&self, key: &str) -> Result<(), SinkError> {
        if self.failing_keys.lock().unwrap().contains(key) {
            return Err(SinkError::Backend(anyhow::anyhow!(
                "injected write failure for key '{key}'"
            )));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl DocumentSink for MemorySink {
    async fn upsert(&self, key: &str, document: &Value) -> Result<(), SinkError> {
        self.check_failure(key)?;
        self.documents
            .lock()
            .unwrap()
            .insert(key.to_string(), document.clone());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SinkError> {
        self.check_failure(key)?;
        if self.documents.lock().unwrap().remove(key).is_none() {
            return Err(SinkError::DocumentNotFound {
                key: key.to_string(),
            });
        }
        Ok(())
    }
}
