//! Snapshot channels and per-collection write ordering

use super::{Collection, Document, Snapshot, decode_all};
use crate::utils::error::{PortalError, Result};
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard, watch};
use tracing::{debug, info, warn};

const RELOAD_RETRY_BASE: Duration = Duration::from_millis(50);
const RELOAD_RETRY_MAX: Duration = Duration::from_secs(5);

/// Coordinates writers and subscribers of every collection
///
/// Writers hold the collection guard from [`SubscriptionHub::lock`] across
/// their write and the following [`SubscriptionHub::publish`]; subscribers
/// register under the same guard, so the first snapshot a subscriber sees is
/// never older than a write that already returned.
#[derive(Debug, Default)]
pub struct SubscriptionHub {
    channels: DashMap<Collection, watch::Sender<Snapshot>>,
    locks: DashMap<Collection, Arc<Mutex<()>>>,
    /// Collections whose last snapshot reload failed
    stale: DashMap<Collection, ()>,
}

impl SubscriptionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize access to one collection
    pub async fn lock(&self, collection: Collection) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(collection)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Whether a publish for this collection would reach anyone
    pub fn is_watched(&self, collection: Collection) -> bool {
        self.channels
            .get(&collection)
            .is_some_and(|tx| tx.receiver_count() > 0)
    }

    /// Push a new snapshot; channels nobody listens to are dropped
    pub fn publish(&self, collection: Collection, snapshot: Snapshot) {
        let abandoned = match self.channels.get(&collection) {
            Some(tx) if tx.receiver_count() > 0 => {
                tx.send_replace(snapshot);
                false
            }
            Some(_) => true,
            None => false,
        };

        if abandoned {
            debug!(%collection, "Dropping snapshot channel without subscribers");
            self.channels.remove(&collection);
        }
    }

    /// Whether a snapshot reload is pending for this collection
    pub fn is_stale(&self, collection: Collection) -> bool {
        self.stale.contains_key(&collection)
    }

    /// Keep reloading a collection in the background until a snapshot can be
    /// published
    ///
    /// Called by a writer, under the collection guard, after the committed
    /// write could not be reloaded. At most one retry task runs per
    /// collection; it reloads under the guard so it never publishes data
    /// older than a write that already returned.
    pub fn spawn_reload<F, Fut>(self: &Arc<Self>, collection: Collection, load: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<Document>>> + Send + 'static,
    {
        if self.stale.insert(collection, ()).is_some() {
            return;
        }

        let hub = Arc::clone(self);
        tokio::spawn(async move {
            let mut delay = RELOAD_RETRY_BASE;
            loop {
                tokio::time::sleep(delay).await;

                let _guard = hub.lock(collection).await;
                if !hub.is_watched(collection) {
                    hub.stale.remove(&collection);
                    return;
                }
                match load().await {
                    Ok(docs) => {
                        hub.stale.remove(&collection);
                        hub.publish(collection, Arc::new(docs));
                        info!(%collection, "Snapshot reloaded after earlier failure");
                        return;
                    }
                    Err(e) => warn!(%collection, error = %e, "Snapshot reload failed, retrying"),
                }
                delay = (delay * 2).min(RELOAD_RETRY_MAX);
            }
        });
    }

    /// Join (or open) the channel of a collection
    ///
    /// `current` is used as the initial value when no live channel exists.
    pub fn subscribe_with(
        &self,
        collection: Collection,
        current: Snapshot,
    ) -> watch::Receiver<Snapshot> {
        if let Some(tx) = self.channels.get(&collection) {
            if tx.receiver_count() > 0 {
                return tx.subscribe();
            }
        }

        let (tx, rx) = watch::channel(current);
        self.channels.insert(collection, tx);
        rx
    }
}

/// Typed view over a collection's snapshot channel
#[derive(Debug)]
pub struct Subscription<T> {
    collection: Collection,
    rx: watch::Receiver<Snapshot>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Subscription<T> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection,
            rx: self.rx.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> Subscription<T> {
    pub fn new(collection: Collection, rx: watch::Receiver<Snapshot>) -> Self {
        Self {
            collection,
            rx,
            _record: PhantomData,
        }
    }

    /// Latest raw snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.rx.borrow().clone()
    }

    /// Number of documents in the latest snapshot
    pub fn len(&self) -> usize {
        self.rx.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decoded records of the latest snapshot
    pub fn current(&self) -> Vec<T> {
        decode_all(&self.snapshot(), self.collection)
    }

    /// Wait until a newer snapshot is published
    pub async fn changed(&mut self) -> Result<()> {
        self.rx
            .changed()
            .await
            .map_err(|_| PortalError::store(format!("{} subscription closed", self.collection)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn doc(id: &str) -> Document {
        Document {
            id: id.to_string(),
            data: json!({}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_failed_reload_is_retried_until_published() {
        let hub = Arc::new(SubscriptionHub::new());
        let mut rx = hub.subscribe_with(Collection::Funds, Arc::new(vec![]));
        let attempts = Arc::new(AtomicUsize::new(0));

        {
            let _guard = hub.lock(Collection::Funds).await;
            let counter = Arc::clone(&attempts);
            hub.spawn_reload(Collection::Funds, move || {
                let attempt = counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 2 {
                        Err(PortalError::store("database is locked"))
                    } else {
                        Ok(vec![doc("tx-1")])
                    }
                }
            });
            // a second failure while a retry is pending does not start another task
            hub.spawn_reload(Collection::Funds, || async { Ok(vec![]) });
            assert!(hub.is_stale(Collection::Funds));
        }

        tokio::time::timeout(Duration::from_secs(5), rx.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rx.borrow().len(), 1);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert!(!hub.is_stale(Collection::Funds));
    }

    #[tokio::test]
    async fn test_reload_stops_without_subscribers() {
        let hub = Arc::new(SubscriptionHub::new());
        let rx = hub.subscribe_with(Collection::News, Arc::new(vec![]));
        drop(rx);

        hub.spawn_reload(Collection::News, || async {
            Err(PortalError::store("still down"))
        });
        tokio::time::timeout(Duration::from_secs(2), async {
            while hub.is_stale(Collection::News) {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();
    }
}
