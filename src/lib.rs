//! dynamo-sync library
//!
//! A relay that replays DynamoDB Streams change events into a MongoDB
//! collection. Each stream record describes one row-level mutation on the
//! source table; the relay derives a destination key from the record's key
//! attributes and applies the mutation as an upsert or delete against the
//! destination collection.
//!
//! # Architecture
//!
//! - [`config`] - destination connection parameters from the environment
//! - [`connection`] - lazily-initialized, process-wide destination handle
//! - [`key`] - destination key derivation from DynamoDB key attributes
//! - [`processor`] - per-batch, per-record translation and application
//! - [`sink`] - the destination collection abstraction and implementations
//! - [`handler`] - the Lambda invocation entry
//!
//! # Delivery semantics
//!
//! The stream delivers batches at least once; the relay keeps replays
//! harmless rather than preventing them. Upserts fully replace the stored
//! document, deletes of already-absent documents are absorbed, and a
//! record's failure never fails the batch - only a destination connection
//! failure does, which makes the platform redeliver the whole batch.

pub mod config;
pub mod connection;
pub mod handler;
pub mod key;
pub mod processor;
pub mod sink;

pub use config::SinkOpts;
pub use connection::ConnectionManager;
pub use key::KeyBuilder;
pub use processor::{process_batch, BatchSummary};
pub use sink::{DocumentSink, SinkError};
