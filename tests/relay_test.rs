//! End-to-end relay tests against the in-memory sink.

use aws_lambda_events::event::dynamodb::Event;
use dynamo_sync::handler::handle_stream_event;
use dynamo_sync::key::KeyBuilder;
use dynamo_sync::sink::memory::MemorySink;
use lambda_runtime::{Context, LambdaEvent};
use serde_json::{json, Value};

fn stream_record(event_name: &str, keys: Value, new_image: Option<Value>) -> Value {
    let mut change = json!({
        "ApproximateCreationDateTime": 1700000000.0,
        "Keys": keys,
        "SequenceNumber": "111",
        "SizeBytes": 26,
        "StreamViewType": "NEW_AND_OLD_IMAGES",
    });
    if let Some(image) = new_image {
        change["NewImage"] = image;
    }
    json!({
        "awsRegion": "us-east-1",
        "eventID": "11111111-2222-3333-4444-555555555555",
        "eventName": event_name,
        "eventSource": "aws:dynamodb",
        "eventVersion": "1.1",
        "eventSourceARN":
            "arn:aws:dynamodb:us-east-1:123456789012:table/source/stream/2024-01-01T00:00:00.000",
        "dynamodb": change,
    })
}

fn stream_event(records: Vec<Value>) -> LambdaEvent<Event> {
    let event: Event =
        serde_json::from_value(json!({ "Records": records })).expect("valid stream event fixture");
    LambdaEvent::new(event, Context::default())
}

#[tokio::test]
async fn batch_reports_presented_count_despite_partial_failure() {
    let sink = MemorySink::new();
    let keys = KeyBuilder::default();
    sink.fail_writes_to("C");

    // 1) REMOVE for a key not present in the destination
    // 2) MODIFY carrying a post-mutation image
    // 3) upsert whose destination write fails
    let event = stream_event(vec![
        stream_record("REMOVE", json!({"pk": {"S": "A"}}), None),
        stream_record(
            "MODIFY",
            json!({"pk": {"S": "B"}}),
            Some(json!({"pk": {"S": "B"}, "x": {"N": "1"}})),
        ),
        stream_record(
            "INSERT",
            json!({"pk": {"S": "C"}}),
            Some(json!({"pk": {"S": "C"}, "x": {"N": "2"}})),
        ),
    ]);

    let reply = handle_stream_event(&sink, &keys, event).await.unwrap();

    assert_eq!(reply, "Processed 3 records");
    assert_eq!(sink.get("B").unwrap(), json!({"pk": "B", "x": 1}));
    assert!(sink.get("C").is_none());
}

#[tokio::test]
async fn empty_batch_reports_zero_records() {
    let sink = MemorySink::new();
    let keys = KeyBuilder::default();

    let reply = handle_stream_event(&sink, &keys, stream_event(vec![])).await.unwrap();

    assert_eq!(reply, "Processed 0 records");
    assert!(sink.is_empty());
}

#[tokio::test]
async fn redelivered_batch_converges_to_same_state() {
    let sink = MemorySink::new();
    let keys = KeyBuilder::default();

    let records = vec![
        stream_record(
            "INSERT",
            json!({"pk": {"S": "B"}}),
            Some(json!({"pk": {"S": "B"}, "x": {"N": "1"}})),
        ),
        stream_record("REMOVE", json!({"pk": {"S": "A"}}), None),
    ];

    handle_stream_event(&sink, &keys, stream_event(records.clone()))
        .await
        .unwrap();
    let first_pass = sink.get("B");

    // At-least-once delivery: applying the same batch again is harmless.
    handle_stream_event(&sink, &keys, stream_event(records))
        .await
        .unwrap();

    assert_eq!(sink.get("B"), first_pass);
    assert_eq!(sink.len(), 1);
}
