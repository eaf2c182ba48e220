// src/pipeline/lookup.rs

//! Lookups where only the most recent request matters.
//!
//! Starting a lookup aborts the one still running, and a response that
//! arrives after a newer lookup started is discarded as `Superseded`.

use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::{AbortHandle, Abortable};

use crate::error::{AppError, Result};
use crate::services::AirportService;

/// Latest-request-wins gate.
#[derive(Debug, Default)]
pub struct LatestLookup {
    generation: AtomicU64,
    running: Mutex<Option<AbortHandle>>,
}

impl LatestLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lookups started so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Whether a lookup is registered and not yet finished.
    pub fn is_running(&self) -> bool {
        self.running
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Run `lookup`, superseding whatever lookup is still in progress.
    pub async fn run<T, F>(&self, lookup: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let (handle, registration) = AbortHandle::new_pair();
        let generation = {
            let mut running = self.running.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(previous) = running.replace(handle) {
                previous.abort();
            }
            self.generation.fetch_add(1, Ordering::AcqRel) + 1
        };

        let result = Abortable::new(lookup, registration).await;

        // Compare under the lock so a lookup starting now cannot lose its handle.
        {
            let mut running = self.running.lock().unwrap_or_else(|e| e.into_inner());
            if self.generation() != generation {
                log::debug!("Discarding lookup #{} (superseded)", generation);
                return Err(AppError::Superseded);
            }
            *running = None;
        }

        match result {
            Ok(value) => value,
            Err(_aborted) => Err(AppError::Superseded),
        }
    }
}

/// Route compensation estimates, latest route wins.
pub struct CompensationEstimator {
    airports: AirportService,
    lookup: LatestLookup,
}

impl CompensationEstimator {
    pub fn new(airports: AirportService) -> Self {
        Self {
            airports,
            lookup: LatestLookup::new(),
        }
    }

    /// Amount for the route; `Superseded` if another estimate started meanwhile.
    pub async fn estimate(&self, departing: &str, destination: &str) -> Result<f64> {
        self.lookup
            .run(self.airports.compensation(departing, destination))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_single_lookup_passes_through() {
        let lookup = LatestLookup::new();
        assert_eq!(lookup.run(async { Ok(250.0) }).await.unwrap(), 250.0);

        let err = lookup
            .run(async { Err::<f64, _>(AppError::validation("bad code")) })
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(lookup.generation(), 2);
    }

    #[tokio::test]
    async fn test_newer_lookup_supersedes_running_one() {
        let lookup = Arc::new(LatestLookup::new());
        let (_tx, rx) = oneshot::channel::<f64>();

        let slow = tokio::spawn({
            let lookup = lookup.clone();
            async move {
                lookup
                    .run(async move { rx.await.map_err(|_| AppError::Superseded) })
                    .await
            }
        });
        while lookup.generation() == 0 {
            tokio::task::yield_now().await;
        }

        let fresh = lookup.run(async { Ok(600.0) }).await.unwrap();
        assert_eq!(fresh, 600.0);
        assert!(matches!(slow.await.unwrap(), Err(AppError::Superseded)));
    }

    #[tokio::test]
    async fn test_stale_response_discarded() {
        let lookup = Arc::new(LatestLookup::new());
        let (tx, rx) = oneshot::channel::<()>();

        let stale = tokio::spawn({
            let lookup = lookup.clone();
            async move {
                lookup
                    .run(async move {
                        let _ = rx.await;
                        Ok(400.0)
                    })
                    .await
            }
        });
        while lookup.generation() == 0 {
            tokio::task::yield_now().await;
        }

        tx.send(()).unwrap();
        let fresh = lookup.run(async { Ok(250.0) }).await.unwrap();
        assert_eq!(fresh, 250.0);
        assert!(matches!(stale.await.unwrap(), Err(AppError::Superseded)));
    }

    #[tokio::test]
    async fn test_stale_finish_keeps_newer_handle() {
        let lookup = Arc::new(LatestLookup::new());
        let (stale_tx, stale_rx) = oneshot::channel::<()>();
        let (fresh_tx, fresh_rx) = oneshot::channel::<()>();

        let stale = tokio::spawn({
            let lookup = lookup.clone();
            async move {
                lookup
                    .run(async move {
                        let _ = stale_rx.await;
                        Ok(400.0)
                    })
                    .await
            }
        });
        while lookup.generation() == 0 {
            tokio::task::yield_now().await;
        }

        let fresh = tokio::spawn({
            let lookup = lookup.clone();
            async move {
                lookup
                    .run(async move {
                        let _ = fresh_rx.await;
                        Ok(250.0)
                    })
                    .await
            }
        });
        while lookup.generation() == 1 {
            tokio::task::yield_now().await;
        }

        let _ = stale_tx.send(());
        assert!(matches!(stale.await.unwrap(), Err(AppError::Superseded)));
        assert!(lookup.is_running());

        fresh_tx.send(()).unwrap();
        assert_eq!(fresh.await.unwrap().unwrap(), 250.0);
        assert!(!lookup.is_running());
    }
}
