//! Batch processing of DynamoDB Streams change records.
//!
//! Every record in a batch is applied to the destination independently and
//! concurrently. The processor waits for every outcome and never raises an
//! aggregate error for individual record failures; the invoking platform's
//! batch redelivery is the only retry mechanism.

use aws_lambda_events::event::dynamodb::EventRecord;
use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, error};

use crate::key::KeyBuilder;
use crate::sink::{DocumentSink, SinkError};

/// What happened to a single change record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Applied {
    Upserted,
    Removed,
    Skipped,
}

/// Per-batch tallies.
///
/// `records` is the number of records presented; the remaining counters are
/// diagnostic only and never fail the batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub records: usize,
    pub upserted: usize,
    pub removed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Apply every record in the batch to the sink.
///
/// One record's failure never prevents the other records from being
/// attempted or completing; failures are logged and tallied.
pub async fn process_batch<S: DocumentSink>(
    sink: &S,
    keys: &KeyBuilder,
    records: &[EventRecord],
) -> BatchSummary {
    let outcomes = join_all(
        records
            .iter()
            .map(|record| apply_record(sink, keys, record)),
    )
    .await;

    let mut summary = BatchSummary {
        records: records.len(),
        ..Default::default()
    };
    for (record, outcome) in records.iter().zip(outcomes) {
        match outcome {
            Ok(Applied::Upserted) => summary.upserted += 1,
            Ok(Applied::Removed) => summary.removed += 1,
            Ok(Applied::Skipped) => summary.skipped += 1,
            Err(e) => {
                summary.failed += 1;
                error!("Failed to apply record {}: {e:#}", record.event_id);
            }
        }
    }
    summary
}

/// Apply one change record: derive the destination key, then dispatch on
/// event type.
///
/// Records that are neither removals nor carry a post-mutation image are
/// skipped. A removal of an already-absent document counts as removed.
async fn apply_record<S: DocumentSink>(
    sink: &S,
    keys: &KeyBuilder,
    record: &EventRecord,
) -> anyhow::Result<Applied> {
    let key_attributes: Value = serde_dynamo::from_item(record.change.keys.clone())?;
    let key = keys.build(&key_attributes)?;

    if record.event_name == "REMOVE" {
        return match sink.remove(&key).await {
            Ok(()) => {
                debug!("Deleted document {key}");
                Ok(Applied::Removed)
            }
            // Redelivered removal; the document is already gone.
            Err(SinkError::DocumentNotFound { .. }) => {
                debug!("Document {key} already absent");
                Ok(Applied::Removed)
            }
            Err(e) => Err(e.into()),
        };
    }

    let image: Value = serde_dynamo::from_item(record.change.new_image.clone())?;
    match image.as_object() {
        Some(fields) if !fields.is_empty() => {
            sink.upsert(&key, &image).await?;
            debug!("Upserted document {key}");
            Ok(Applied::Upserted)
        }
        // No post-mutation image; nothing to apply for this record.
        _ => Ok(Applied::Skipped),
    }
}
