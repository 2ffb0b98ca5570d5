//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::Handle;
use tokio::sync::{oneshot, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::CacheStore;
use crate::error::{CacheError, Result};

/// Handle to a running sweep task.
///
/// Stopping is a rendezvous: [`shutdown`](Self::shutdown) signals the task and
/// waits until it has exited, so no sweep is in flight afterwards. Dropping the
/// handle also stops the task, without waiting.
#[derive(Debug)]
pub struct SweepHandle {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl SweepHandle {
    /// Signals the task to stop and waits for it to finish.
    ///
    /// # Errors
    /// `CacheError::SweepTask` if the task panicked.
    pub async fn shutdown(self) -> Result<()> {
        // The receiver is gone only if the task already exited; joining still reports why.
        let _ = self.stop.send(());
        self.task.await?;
        Ok(())
    }

    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawns a background task that periodically sweeps expired cache entries.
///
/// Every `interval` the task takes the store's write lock and purges all entries
/// whose TTL has elapsed. The first sweep happens one interval after spawning.
///
/// # Arguments
/// * `store` - Shared reference to the cache store
/// * `interval` - Period between sweeps
///
/// # Errors
/// `CacheError::NoRuntime` if called outside a tokio runtime.
///
/// # Example
/// ```ignore
/// let store = Arc::new(RwLock::new(CacheStore::<String>::new(1024)));
/// let sweeper = spawn_sweep_task(store.clone(), Duration::from_secs(1))?;
/// // Later, during shutdown:
/// sweeper.shutdown().await?;
/// ```
pub fn spawn_sweep_task<V>(
    store: Arc<RwLock<CacheStore<V>>>,
    interval: Duration,
) -> Result<SweepHandle>
where
    V: Send + Sync + 'static,
{
    let runtime = Handle::try_current().map_err(|_| CacheError::NoRuntime)?;
    let (stop, mut stopped) = oneshot::channel();

    let task = runtime.spawn(async move {
        info!("Starting TTL sweep task with interval of {:?}", interval);

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = &mut stopped => break,
                _ = ticker.tick() => {
                    let removed = store.write().await.purge_expired(Instant::now());

                    if removed > 0 {
                        info!("TTL sweep: removed {} expired entries", removed);
                    } else {
                        debug!("TTL sweep: no expired entries found");
                    }
                }
            }
        }

        info!("TTL sweep task stopped");
    });

    Ok(SweepHandle { stop, task })
}
