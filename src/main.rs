//! Lambda binary relaying DynamoDB Streams change events to MongoDB.
//!
//! The destination connection is established lazily on the first invocation
//! and cached for the lifetime of the process. A connection failure fails
//! the invocation, which makes the platform redeliver the whole batch;
//! individual record failures never do.

use aws_lambda_events::event::dynamodb::Event;
use dynamo_sync::connection::ConnectionManager;
use dynamo_sync::handler::relay;
use dynamo_sync::key::KeyBuilder;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        // disable printing the name of the module in every log line.
        .with_target(false)
        // disabling time is handy because CloudWatch will add the ingestion time.
        .without_time()
        .init();

    let manager = ConnectionManager::new();
    // Adjust the key policy to the source table's schema, e.g.
    // `KeyBuilder::composite(vec!["pk".into(), "sk".into()], '#')`.
    let keys = KeyBuilder::default();

    run(service_fn(|event: LambdaEvent<Event>| {
        relay(&manager, &keys, event)
    }))
    .await
}
