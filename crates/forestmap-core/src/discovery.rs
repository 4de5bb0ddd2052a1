//! One-shot topology discovery on a background thread.
//!
//! The provider builds the entity store privately on its own thread and the
//! finished store is published exactly once through a channel. The render
//! thread polls [`DiscoveryTask::try_complete`] non-blockingly once per frame
//! (and the input layer consults the resulting phase on every event), so no
//! locking is needed: ownership of the store moves across the completion
//! signal. There is no cancellation, timeout or retry; discovery runs to
//! completion or failure exactly once per process.

use crate::error::Result;
use crate::store::EntityStore;
use std::sync::mpsc;
use std::thread;
use tracing::info;

/// Supplies the raw site/server/trust list. Implementations perform the
/// actual directory enumeration and are free to block; their blocking is
/// invisible to the render loop.
pub trait TopologyProvider {
    fn discover(&mut self, store: &mut EntityStore) -> std::result::Result<(), DiscoveryError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum DiscoveryError {
    #[error("no directory service could be reached: {0}")]
    ServiceUnavailable(String),

    #[error("enumeration of {scope} failed: {message}")]
    Enumeration { scope: String, message: String },

    #[error("topology snapshot is invalid: {0}")]
    InvalidSnapshot(String),
}

pub type DiscoveryOutcome = std::result::Result<EntityStore, DiscoveryError>;

/// Handle to the spawned discovery thread.
pub struct DiscoveryTask {
    rx: mpsc::Receiver<DiscoveryOutcome>,
    handle: Option<thread::JoinHandle<()>>,
}

impl DiscoveryTask {
    /// Spawns the discovery thread. Called exactly once at startup; the
    /// thread is never restarted.
    pub fn spawn<P>(mut provider: P) -> Result<Self>
    where
        P: TopologyProvider + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel(1);
        let handle = thread::Builder::new()
            .name("discovery".to_string())
            .spawn(move || {
                info!("discovery thread beginning");
                let mut store = EntityStore::new();
                let outcome = provider.discover(&mut store).map(|()| store);
                // The receiver may already be gone if the viewer exited.
                let _ = tx.send(outcome);
            })?;
        Ok(Self {
            rx,
            handle: Some(handle),
        })
    }

    /// Non-blocking completion poll. Returns the outcome exactly once; every
    /// later call returns `None`.
    pub fn try_complete(&mut self) -> Option<DiscoveryOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => {
                if let Some(handle) = self.handle.take() {
                    let _ = handle.join();
                }
                Some(outcome)
            }
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use std::time::Duration;

    struct StubProvider {
        sites: u32,
        fail: bool,
    }

    impl TopologyProvider for StubProvider {
        fn discover(
            &mut self,
            store: &mut EntityStore,
        ) -> std::result::Result<(), DiscoveryError> {
            if self.fail {
                return Err(DiscoveryError::ServiceUnavailable(
                    "no domain controller responded".to_string(),
                ));
            }
            for i in 0..self.sites {
                let id = store.create(EntityKind::Site);
                store.get_mut(id).expect("fresh id").display_name = format!("Site{i}");
            }
            Ok(())
        }
    }

    fn poll_until_complete(task: &mut DiscoveryTask) -> DiscoveryOutcome {
        for _ in 0..500 {
            if let Some(outcome) = task.try_complete() {
                return outcome;
            }
            thread::sleep(Duration::from_millis(1));
        }
        panic!("discovery did not complete in time");
    }

    #[test]
    fn publishes_the_store_exactly_once() {
        let mut task = DiscoveryTask::spawn(StubProvider {
            sites: 3,
            fail: false,
        })
        .expect("spawn");

        let store = poll_until_complete(&mut task).expect("discovery ok");
        assert_eq!(store.len(), 3);

        // The one-shot signal never fires twice.
        assert!(task.try_complete().is_none());
    }

    #[test]
    fn surfaces_provider_failure() {
        let mut task = DiscoveryTask::spawn(StubProvider {
            sites: 0,
            fail: true,
        })
        .expect("spawn");

        let outcome = poll_until_complete(&mut task);
        assert!(matches!(
            outcome,
            Err(DiscoveryError::ServiceUnavailable(_))
        ));
    }
}
