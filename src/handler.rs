//! Lambda invocation entry.

use aws_lambda_events::event::dynamodb::Event;
use lambda_runtime::{Error, LambdaEvent};
use tracing::info;

use crate::connection::ConnectionManager;
use crate::key::KeyBuilder;
use crate::processor::process_batch;
use crate::sink::mongo::MongoSink;
use crate::sink::DocumentSink;

/// Full invocation path: resolve the shared destination handle, then apply
/// the batch.
///
/// A connection failure propagates and fails the invocation, so the
/// platform redelivers the whole batch.
pub async fn relay(
    manager: &ConnectionManager<MongoSink>,
    keys: &KeyBuilder,
    event: LambdaEvent<Event>,
) -> Result<String, Error> {
    let sink = manager.collection().await.map_err(Error::from)?;
    handle_stream_event(sink, keys, event).await
}

/// Handle one DynamoDB Streams invocation against an already-resolved sink.
///
/// Individual record failures are absorbed by the processor, so a normal
/// return tells the platform the batch is handled; the reply reports the
/// presented record count either way.
pub async fn handle_stream_event<S: DocumentSink>(
    sink: &S,
    keys: &KeyBuilder,
    event: LambdaEvent<Event>,
) -> Result<String, Error> {
    let summary = process_batch(sink, keys, &event.payload.records).await;
    info!(
        "Batch done: {} records ({} upserted, {} removed, {} skipped, {} failed)",
        summary.records, summary.upserted, summary.removed, summary.skipped, summary.failed
    );
    Ok(format!("Processed {} records", summary.records))
}
