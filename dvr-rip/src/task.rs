//
// Copyright (c) The dvrd Contributors
//
// SPDX-License-Identifier: MIT
//

//! Cancel-on-drop task handles for the advertiser and expiry loops.
//!
//! Dropping a `Task` aborts the underlying tokio task, so tearing down a
//! router instance (in a test, or on daemon shutdown) stops both periodic
//! loops within at most one interval without an explicit stop-channel
//! handshake.

use std::future::Future;

use tokio::task::JoinHandle;
use tokio::time::{self, Duration};

/// A handle to a spawned asynchronous task. Dropping it cancels the task.
#[derive(Debug)]
pub struct Task<T> {
    handle: JoinHandle<T>,
}

impl<T> Task<T>
where
    T: Send + 'static,
{
    pub fn spawn<Fut>(future: Fut) -> Task<T>
    where
        Fut: Future<Output = T> + Send + 'static,
    {
        Task {
            handle: tokio::spawn(future),
        }
    }
}

impl<T> Drop for Task<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawns a task that invokes `cb` every `interval`, forever, until dropped.
///
/// This is the periodic-loop primitive shared by the advertiser (§4.E) and
/// the expiry scanner (§4.F): both are "take a tick, do bounded work, repeat"
/// loops with no inter-tick state beyond what they read from the table.
pub fn spawn_periodic<F, Fut>(interval: Duration, mut cb: F) -> Task<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    Task::spawn(async move {
        let mut ticker = time::interval(interval);
        // The first tick fires immediately; skip it so the loop's first
        // real iteration happens after one full interval has elapsed,
        // matching "each tick" semantics rather than "once at start, then
        // every tick".
        ticker.tick().await;
        loop {
            ticker.tick().await;
            cb().await;
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn periodic_task_ticks_and_stops_on_drop() {
        let counter = Arc::new(AtomicUsize::new(0));
        let task_counter = counter.clone();
        let task = spawn_periodic(Duration::from_secs(1), move || {
            let counter = task_counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        time::advance(Duration::from_secs(3)).await;
        tokio::task::yield_now().await;
        assert_eq!(counter.load(Ordering::SeqCst), 3);

        drop(task);
        time::advance(Duration::from_secs(5)).await;
        tokio::task::yield_now().await;
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }
}
