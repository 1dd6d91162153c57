//! MongoDB-backed destination sink.

use std::time::Duration;

use anyhow::Context;
use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, Credential};
use mongodb::{Client, Collection};

use super::{DocumentSink, SinkError};
use crate::config::SinkOpts;

/// Handle to the destination collection.
///
/// The underlying client is safe for concurrent use, so a single handle
/// serves every in-flight record operation.
#[derive(Debug, Clone)]
pub struct MongoSink {
    collection: Collection<Document>,
}

impl MongoSink {
    /// Connect to the destination cluster and resolve the configured
    /// database and collection path.
    pub async fn connect(opts: &SinkOpts) -> anyhow::Result<Self> {
        let uri = format!("mongodb://{}", opts.host);
        tracing::debug!("Parsing MongoDB connection options from URI: {}", uri);
        let mut options = ClientOptions::parse(&uri)
            .await
            .with_context(|| format!("failed to parse connection options for {uri}"))?;
        // Connection timeouts to prevent hanging
        options.connect_timeout = Some(Duration::from_secs(10));
        options.server_selection_timeout = Some(Duration::from_secs(10));
        options.credential = Some(
            Credential::builder()
                .username(opts.username.clone())
                .password(opts.password.clone())
                .build(),
        );

        let client = Client::with_options(options)?;
        let collection = client
            .database(&opts.database)
            .collection::<Document>(&opts.collection);

        tracing::info!(
            "Connected to MongoDB at {} using {}.{}",
            opts.host,
            opts.database,
            opts.collection
        );
        Ok(Self { collection })
    }
}

#[async_trait::async_trait]
impl DocumentSink for MongoSink {
    async fn upsert(&self, key: &str, document: &serde_json::Value) -> Result<(), SinkError> {
        let mut replacement = mongodb::bson::to_document(document)
            .with_context(|| format!("document for key '{key}' is not a JSON object"))?;
        replacement.insert("_id", key);

        self.collection
            .replace_one(doc! { "_id": key }, replacement)
            .upsert(true)
            .await
            .map_err(anyhow::Error::from)?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SinkError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": key })
            .await
            .map_err(anyhow::Error::from)?;

        if result.deleted_count == 0 {
            return Err(SinkError::DocumentNotFound {
                key: key.to_string(),
            });
        }
        Ok(())
    }
}
