//! Eviction of expired subscriptions.
//!
//! Matching already ignores expired records, so eviction only reclaims
//! memory held by channels that stopped renewing.

use crate::error::Result;
use crate::types::Timestamp;
use crossbeam_channel::{bounded, select, tick, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

use super::Monitor;

impl Monitor {
    /// Remove every subscription that expired before `now`.
    /// Returns the number of records removed.
    pub fn evict_expired(&self, now: Timestamp) -> usize {
        let removed = self.registry.write().retain_live(now);
        if removed > 0 {
            debug!(removed, "evicted expired monitor subscriptions");
        }
        removed
    }
}

/// Background thread running [`Monitor::evict_expired`] every
/// `sweep_interval`. Stops when shut down or dropped.
pub struct ExpirySweeper {
    shutdown: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ExpirySweeper {
    pub fn spawn(monitor: Arc<Monitor>) -> Result<Self> {
        let interval = monitor.config().sweep_interval;
        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);

        let handle = thread::Builder::new()
            .name("monitor-sweep".into())
            .spawn(move || {
                let ticker = tick(interval);
                loop {
                    select! {
                        recv(ticker) -> _ => {
                            monitor.evict_expired(Timestamp::now());
                        }
                        // Fires when the sender is dropped.
                        recv(shutdown_rx) -> _ => break,
                    }
                }
            })?;

        Ok(Self {
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Stop the sweep thread and wait for it to exit.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.shutdown.take();
        if let Some(handle) = self.handle.take() {
            join_sweep_thread(handle);
        }
    }
}

/// Wait for the sweep thread; returns `false` if it panicked.
fn join_sweep_thread(handle: JoinHandle<()>) -> bool {
    match handle.join() {
        Ok(()) => true,
        Err(panic) => {
            let reason = panic
                .downcast_ref::<&str>()
                .copied()
                .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
                .unwrap_or("unknown");
            warn!(reason, "monitor sweep thread panicked");
            false
        }
    }
}

impl Drop for ExpirySweeper {
    fn drop(&mut self) {
        self.stop();
    }
}
