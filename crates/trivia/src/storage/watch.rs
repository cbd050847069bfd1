//! Reactive queries: re-run a read whenever a relevant table changes.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use trivia_core::storage::{QueryStream, Result, StoreChange, StoreWatch};

/// Returns a stream that yields `query`'s current result immediately and
/// again after every committed change touching `scope`.
///
/// The subscription is taken before the first query runs, so a write racing
/// with the initial read is never missed. A subscriber that falls behind
/// skips the backlog and re-queries once. Dropping the stream unsubscribes.
pub fn watch_query<W, T, F, Fut>(
    store: Arc<W>,
    scope: &'static [StoreChange],
    query: F,
) -> QueryStream<T>
where
    W: StoreWatch + ?Sized + 'static,
    T: Send + 'static,
    F: Fn(Arc<W>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    let mut changes = store.subscribe_changes();

    Box::pin(async_stream::stream! {
        yield query(Arc::clone(&store)).await;

        loop {
            match changes.recv().await {
                Ok(change) if change.affects(scope) => {
                    yield query(Arc::clone(&store)).await;
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Watcher lagged, re-querying");
                    yield query(Arc::clone(&store)).await;
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
