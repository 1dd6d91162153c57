//! Shared destination connection management.
//!
//! The Lambda runtime reuses one process across invocations, so the
//! connection manager caches the destination handle: only the first
//! invocation (or the first after a failed attempt) pays the connection
//! cost.

use std::future::Future;

use tokio::sync::OnceCell;

use crate::config::SinkOpts;
use crate::sink::mongo::MongoSink;

/// Lazily-initialized, process-wide holder for the destination sink.
///
/// Initialization is single-flight: concurrent first callers share one
/// connection attempt. A failed attempt leaves the cell unset so a later
/// call retries, and the error propagates to the caller.
#[derive(Debug)]
pub struct ConnectionManager<S> {
    cell: OnceCell<S>,
}

impl<S> ConnectionManager<S> {
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Return the cached sink, running `connect` on first use.
    pub async fn get_or_connect<F, Fut>(&self, connect: F) -> anyhow::Result<&S>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<S>>,
    {
        if let Some(sink) = self.cell.get() {
            tracing::debug!("Destination sink already initialized");
            return Ok(sink);
        }
        self.cell.get_or_try_init(connect).await
    }
}

impl<S> Default for ConnectionManager<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionManager<MongoSink> {
    /// Resolve the destination collection, connecting on first use with
    /// parameters read from the ambient environment.
    pub async fn collection(&self) -> anyhow::Result<&MongoSink> {
        self.get_or_connect(|| async {
            let opts = SinkOpts::from_env()?;
            MongoSink::connect(&opts).await
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::sink::memory::MemorySink;

    #[tokio::test]
    async fn second_call_returns_same_handle_without_reconnecting() {
        let manager = ConnectionManager::new();
        let attempts = AtomicUsize::new(0);

        let first = manager
            .get_or_connect(|| async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Ok(MemorySink::new())
            })
            .await
            .unwrap();
        let second = manager
            .get_or_connect(|| async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Ok(MemorySink::new())
            })
            .await
            .unwrap();

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert!(std::ptr::eq(first, second));
    }

    #[tokio::test]
    async fn failed_connect_leaves_cell_unset_for_retry() {
        let manager: ConnectionManager<MemorySink> = ConnectionManager::new();

        let err = manager
            .get_or_connect(|| async {
                Err::<MemorySink, _>(anyhow::anyhow!("auth failure"))
            })
            .await;
        assert!(err.is_err());

        let retried = manager
            .get_or_connect(|| async { Ok(MemorySink::new()) })
            .await;
        assert!(retried.is_ok());
    }
}
