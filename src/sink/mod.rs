//! Destination document sink.
//!
//! The batch processor writes through the [`DocumentSink`] trait so it is
//! independent of the concrete destination client. [`mongo::MongoSink`] is
//! the production implementation; [`memory::MemorySink`] backs tests.

pub mod memory;
pub mod mongo;

use thiserror::Error;

/// Errors surfaced by a destination sink operation.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The document addressed by a remove did not exist.
    ///
    /// Under at-least-once delivery a removal may be replayed after it has
    /// already been applied, so callers treat this case as success.
    #[error("document not found: {key}")]
    DocumentNotFound { key: String },

    /// Any other destination failure.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// A destination collection that stores JSON documents by string key.
#[async_trait::async_trait]
pub trait DocumentSink: Send + Sync {
    /// Write `document` at `key`, fully replacing any existing value.
    async fn upsert(&self, key: &str, document: &serde_json::Value) -> Result<(), SinkError>;

    /// Delete the document at `key`.
    ///
    /// Returns [`SinkError::DocumentNotFound`] when no such document exists.
    async fn remove(&self, key: &str) -> Result<(), SinkError>;
}
