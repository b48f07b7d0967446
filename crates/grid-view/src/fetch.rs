//! Background fetch.
//!
//! Listing a resource type runs on its own thread and reports through a
//! channel. Each fetch carries the generation it was started for so the
//! session can discard results that were superseded or cancelled.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::time::Instant;

use grid_model::{RawRecord, ResourceStore};

/// Message sent from the fetch thread.
#[derive(Debug, Clone)]
pub enum FetchUpdate {
    Loaded {
        generation: u64,
        records: Vec<RawRecord>,
    },
    Failed {
        generation: u64,
        message: String,
    },
}

impl FetchUpdate {
    pub fn generation(&self) -> u64 {
        match self {
            Self::Loaded { generation, .. } | Self::Failed { generation, .. } => *generation,
        }
    }
}

/// Handle to cancel an in-flight fetch.
#[derive(Clone)]
pub struct FetchHandle {
    cancel_flag: Arc<AtomicBool>,
    generation: u64,
}

impl FetchHandle {
    fn new(generation: u64) -> Self {
        Self {
            cancel_flag: Arc::new(AtomicBool::new(false)),
            generation,
        }
    }

    /// Request cancellation. A cancelled fetch never reports.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::SeqCst)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl fmt::Debug for FetchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchHandle")
            .field("generation", &self.generation)
            .field("is_cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Spawn a background listing of `resource_type`.
pub fn spawn_fetch(
    store: Arc<dyn ResourceStore>,
    resource_type: String,
    generation: u64,
    sender: Sender<FetchUpdate>,
) -> FetchHandle {
    let handle = FetchHandle::new(generation);
    let cancel_flag = Arc::clone(&handle.cancel_flag);

    std::thread::spawn(move || {
        let start = Instant::now();
        let result = store.list_by_type(&resource_type);

        if cancel_flag.load(Ordering::SeqCst) {
            tracing::debug!(%resource_type, generation, "fetch cancelled, discarding result");
            return;
        }

        let update = match result {
            Ok(records) => {
                tracing::debug!(
                    %resource_type,
                    generation,
                    records = records.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "fetch complete"
                );
                FetchUpdate::Loaded {
                    generation,
                    records,
                }
            }
            Err(error) => FetchUpdate::Failed {
                generation,
                message: error.to_string(),
            },
        };
        // The receiver is gone when the session was dropped.
        let _ = sender.send(update);
    });

    handle
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_model::{GridError, Result};
    use std::sync::mpsc;
    use std::time::Duration;

    struct StaticStore(Result<Vec<RawRecord>>);

    impl ResourceStore for StaticStore {
        fn list_by_type(&self, resource_type: &str) -> Result<Vec<RawRecord>> {
            match &self.0 {
                Ok(records) => Ok(records.clone()),
                Err(_) => Err(GridError::fetch(resource_type, "unreachable")),
            }
        }

        fn invalidate(&self, _resource_type: &str) {}
    }

    #[test]
    fn reports_loaded_records() {
        let (sender, receiver) = mpsc::channel();
        let store: Arc<dyn ResourceStore> = Arc::new(StaticStore(Ok(vec![RawRecord::new()])));
        let handle = spawn_fetch(store, "VPC".into(), 3, sender);
        assert_eq!(handle.generation(), 3);

        match receiver.recv_timeout(Duration::from_secs(5)).unwrap() {
            FetchUpdate::Loaded {
                generation,
                records,
            } => {
                assert_eq!(generation, 3);
                assert_eq!(records.len(), 1);
            }
            other => panic!("unexpected update {other:?}"),
        }
    }

    #[test]
    fn reports_failures() {
        let (sender, receiver) = mpsc::channel();
        let store: Arc<dyn ResourceStore> =
            Arc::new(StaticStore(Err(GridError::fetch("VPC", "down"))));
        spawn_fetch(store, "VPC".into(), 1, sender);

        let update = receiver.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(update, FetchUpdate::Failed { generation: 1, .. }));
    }
}
