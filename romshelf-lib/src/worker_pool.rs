//! Worker pool for resolving many catalog entries at once.
//!
//! Spawns N persistent tokio tasks that pull work items from a bounded
//! async-channel. Results go to an unbounded channel for the caller.
//!
//! `async_channel::Receiver` is `Clone`, so each worker owns a handle and
//! none of them holds a lock while waiting for work.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A pool of worker tasks that process items concurrently.
///
/// Workers stop once every item has been handed out and processed. There is
/// no per-item timeout: resolution has no cancellation point, so a slow item
/// simply occupies its worker until it finishes.
///
/// # Example
///
/// ```ignore
/// let mut pool = WorkerPool::start(4, names, |name| async move {
///     check(name).await
/// });
///
/// while let Some(line) = pool.recv().await {
///     report(line);
/// }
/// ```
pub struct WorkerPool<R: Send + 'static> {
    result_rx: mpsc::UnboundedReceiver<R>,
    _handles: Vec<JoinHandle<()>>,
}

impl<R: Send + 'static> WorkerPool<R> {
    /// Spawn `n` workers (at least one), submit all items, and return a pool
    /// for receiving results.
    ///
    /// Items go through a bounded channel of capacity `n`, so submission runs
    /// in its own task and the caller can start receiving immediately.
    pub fn start<W, F, Fut>(n: usize, items: Vec<W>, process_fn: F) -> Self
    where
        W: Send + 'static,
        F: Fn(W) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        let n = n.max(1);
        let (work_tx, work_rx) = async_channel::bounded::<W>(n);
        let (result_tx, result_rx) = mpsc::unbounded_channel::<R>();
        let process_fn = Arc::new(process_fn);

        let handles: Vec<JoinHandle<()>> = (0..n)
            .map(|_| {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                let process_fn = process_fn.clone();
                tokio::spawn(async move {
                    while let Ok(item) = work_rx.recv().await {
                        if result_tx.send(process_fn(item).await).is_err() {
                            break; // Receiver dropped
                        }
                    }
                })
            })
            .collect();

        // The result channel closes when the last worker drops its sender
        drop(result_tx);

        tokio::spawn(async move {
            for item in items {
                if work_tx.send(item).await.is_err() {
                    break;
                }
            }
        });

        Self {
            result_rx,
            _handles: handles,
        }
    }

    /// Receive the next result. `None` once all items have been processed
    /// and every worker has exited.
    pub async fn recv(&mut self) -> Option<R> {
        self.result_rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_every_item_yields_one_result() {
        let mut pool = WorkerPool::start(3, (0..20u32).collect(), |n| async move { n * 2 });
        let mut results = Vec::new();
        while let Some(r) = pool.recv().await {
            results.push(r);
        }
        results.sort();
        assert_eq!(results, (0..20u32).map(|n| n * 2).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_zero_workers_still_drains() {
        let mut pool = WorkerPool::start(0, vec!["galaga"], |s| async move { s.len() });
        assert_eq!(pool.recv().await, Some(6));
        assert_eq!(pool.recv().await, None);
    }
}
