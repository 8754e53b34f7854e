//! Expiration Sweeper Task
//!
//! Background task that periodically removes expired entries so values that
//! are never read again do not linger until evicted.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::CacheEngine;

/// Handle to the running sweeper task.
///
/// Dropping the handle leaves the task running; call [`Sweeper::shutdown`]
/// for a deterministic stop.
#[derive(Debug)]
pub struct Sweeper {
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
}

impl Sweeper {
    /// Spawns the sweeper on the current tokio runtime.
    ///
    /// Every `interval` the task visits the shards in index order, locking
    /// each one just long enough to drop its expired entries. The first tick
    /// fires one full interval after spawning.
    pub fn spawn(engine: Arc<CacheEngine>, interval: Duration) -> Self {
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(run(engine, interval, shutdown.clone()));
        Self { shutdown, handle }
    }

    /// Token observed by the task; cancelling it stops the sweeper.
    pub fn token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Signals the task to stop and waits for it to exit.
    ///
    /// A shard sweep already in progress finishes first; no shard is left
    /// half-swept.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        if let Err(e) = self.handle.await {
            warn!(error = %e, "expiration sweeper exited abnormally");
        }
    }
}

async fn run(engine: Arc<CacheEngine>, interval: Duration, shutdown: CancellationToken) {
    info!(
        interval_ms = interval.as_millis() as u64,
        shards = engine.shard_count(),
        "expiration sweeper starting"
    );

    let mut ticker = tokio::time::interval(interval);
    // Skip the first immediate tick
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                info!("expiration sweeper shutting down");
                break;
            }

            _ = ticker.tick() => {
                let removed = sweep_pass(&engine, &shutdown);
                if removed > 0 {
                    info!(removed, "expiration sweep removed expired entries");
                } else {
                    debug!("expiration sweep found nothing to remove");
                }
            }
        }
    }
}

/// One round-robin pass over every shard. Stops between shards on shutdown.
fn sweep_pass(engine: &CacheEngine, shutdown: &CancellationToken) -> usize {
    let mut removed = 0;
    for index in 0..engine.shard_count() {
        if shutdown.is_cancelled() {
            break;
        }
        let count = engine.sweep_shard(index);
        if count > 0 {
            debug!(shard = index, removed = count, "swept shard");
        }
        removed += count;
    }
    removed
}
