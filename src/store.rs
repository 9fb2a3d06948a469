//! Per-collection record stores.
//!
//! A store holds the latest list fetched for one record type. Views read it
//! through [`RecordStore::snapshot`] or follow changes with
//! [`RecordStore::subscribe`]; the only writer is [`RecordStore::load`].

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::{self, JoinHandle};
use tracing::{debug, error, instrument, warn};

use crate::error::Result;
use crate::model::Resource;
use crate::storage::LocalStorage;

/// Shared, immutable view of a store's records.
pub type Snapshot<T> = Arc<Vec<T>>;

/// What a finished load did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The fetched records replaced the snapshot.
    Applied(usize),
    /// The fetch failed and the cached fallback list was restored.
    Fallback(usize),
    /// The fetch failed and the snapshot was emptied.
    Cleared,
    /// A newer load was started before this one finished; nothing changed.
    Stale,
}

#[derive(Debug)]
pub struct RecordStore<T> {
    sender: watch::Sender<Snapshot<T>>,
    /// Sequence number of the most recently started load.
    latest: AtomicU64,
    fallback: Option<LocalStorage>,
}

impl<T: Resource> RecordStore<T> {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            sender,
            latest: AtomicU64::new(0),
            fallback: None,
        }
    }

    /// Cache every successful load in `storage` and restore from it when a
    /// load fails.
    pub fn with_fallback(mut self, storage: LocalStorage) -> Self {
        self.fallback = Some(storage);
        self
    }

    fn cache_key() -> String {
        format!("records.{}", T::COLLECTION)
    }

    /// Current records. Do not hold on to it across loads; take a fresh one.
    pub fn snapshot(&self) -> Snapshot<T> {
        self.sender.borrow().clone()
    }

    /// Receiver notified each time the snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.sender.subscribe()
    }

    /// Run `fetch` and publish its result.
    ///
    /// Loads are ordered by when they start: if another load begins while
    /// this one is in flight, this one's result is dropped whenever it lands.
    pub async fn load<F>(&self, fetch: F) -> LoadOutcome
    where
        F: Future<Output = Result<Vec<T>>>,
    {
        let ticket = self.next_ticket();
        self.load_with_ticket(ticket, fetch).await
    }

    fn next_ticket(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    #[instrument(skip(self, fetch), fields(collection = T::COLLECTION))]
    async fn load_with_ticket<F>(&self, ticket: u64, fetch: F) -> LoadOutcome
    where
        F: Future<Output = Result<Vec<T>>>,
    {
        let result = fetch.await;

        let (records, outcome) = match result {
            Ok(records) => {
                let count = records.len();
                (records, LoadOutcome::Applied(count))
            }
            Err(e) => {
                error!(error = %e, "failed to load records");
                match self.cached() {
                    Some(cached) => {
                        let count = cached.len();
                        (cached, LoadOutcome::Fallback(count))
                    }
                    None => (Vec::new(), LoadOutcome::Cleared),
                }
            }
        };

        let cache_copy = matches!(outcome, LoadOutcome::Applied(_))
            .then(|| self.fallback.as_ref().map(|_| records.clone()))
            .flatten();

        let applied = self.sender.send_if_modified(|current| {
            if self.latest.load(Ordering::SeqCst) != ticket {
                return false;
            }
            *current = Arc::new(records);
            true
        });
        if !applied {
            debug!(ticket, "discarding stale response");
            return LoadOutcome::Stale;
        }

        if let (Some(storage), Some(records)) = (self.fallback.clone(), cache_copy) {
            let key = Self::cache_key();
            // the write does blocking file I/O
            match task::spawn_blocking(move || storage.set(&key, &records)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = %e, "failed to cache records"),
                Err(e) => warn!(error = %e, "cache write task failed"),
            }
        }
        debug!(?outcome, "load finished");
        outcome
    }

    fn cached(&self) -> Option<Vec<T>> {
        self.fallback.as_ref()?.get(&Self::cache_key())
    }

    /// Edit the current snapshot for immediate feedback, e.g. after an admin
    /// edit. The next load replaces it with server data.
    pub fn apply_optimistic<F>(&self, edit: F)
    where
        F: FnOnce(&mut Vec<T>),
    {
        self.sender.send_modify(|current| {
            let mut next = current.as_ref().clone();
            edit(&mut next);
            *current = Arc::new(next);
        });
    }
}

impl<T: Resource> Default for RecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Resource> RecordStore<T> {
    /// Run [`RecordStore::load`] in the background.
    ///
    /// The load's place in line is fixed here, not when the task first runs,
    /// so of two spawned loads the later call always wins. The returned guard
    /// aborts the request when dropped, so a view that goes away before the
    /// response arrives leaves the store untouched.
    pub fn spawn_load<F>(self: &Arc<Self>, fetch: F) -> LoadGuard
    where
        F: Future<Output = Result<Vec<T>>> + Send + 'static,
    {
        let ticket = self.next_ticket();
        let store = Arc::clone(self);
        let handle = tokio::spawn(async move { store.load_with_ticket(ticket, fetch).await });
        LoadGuard {
            handle: Some(handle),
        }
    }
}

/// Handle to a background load. Dropping it cancels the load.
#[derive(Debug)]
pub struct LoadGuard {
    handle: Option<JoinHandle<LoadOutcome>>,
}

impl LoadGuard {
    /// Wait for the load. `None` if it was cancelled or panicked.
    pub async fn join(mut self) -> Option<LoadOutcome> {
        let handle = self.handle.take()?;
        handle.await.ok()
    }

    pub fn cancel(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for LoadGuard {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::oneshot;

    use super::*;
    use crate::error::GuideError;
    use crate::model::Team;

    fn team(id: u64, name: &str) -> Team {
        Team {
            id: id.into(),
            name: name.into(),
            flag: String::new(),
            group: None,
            confederation: "CAF".into(),
            rank: None,
            coach: None,
        }
    }

    async fn fetched(teams: Vec<Team>) -> Result<Vec<Team>> {
        Ok(teams)
    }

    async fn offline() -> Result<Vec<Team>> {
        Err(GuideError::Config("offline".into()))
    }

    async fn wait_for(rx: oneshot::Receiver<Vec<Team>>) -> Result<Vec<Team>> {
        Ok(rx.await.unwrap_or_default())
    }

    fn names(store: &RecordStore<Team>) -> Vec<String> {
        store.snapshot().iter().map(|t| t.name.clone()).collect()
    }

    #[tokio::test]
    async fn success_replaces_wholesale() {
        let store = RecordStore::new();
        let outcome = store.load(fetched(vec![team(1, "Maroc"), team(2, "Mali")])).await;
        assert_eq!(outcome, LoadOutcome::Applied(2));

        let outcome = store.load(fetched(vec![team(3, "Zambie")])).await;
        assert_eq!(outcome, LoadOutcome::Applied(1));
        assert_eq!(names(&store), vec!["Zambie"]);
    }

    #[tokio::test]
    async fn failure_without_fallback_clears() {
        let store = RecordStore::new();
        store.load(fetched(vec![team(1, "Maroc")])).await;
        let outcome = store.load(offline()).await;
        assert_eq!(outcome, LoadOutcome::Cleared);
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn failure_restores_cached_fallback() {
        let storage = LocalStorage::in_memory();
        let store = RecordStore::new().with_fallback(storage.clone());
        store.load(fetched(vec![team(1, "Maroc"), team(2, "Mali")])).await;
        assert!(storage.contains("records.equipes"));

        let outcome = store.load(offline()).await;
        assert_eq!(outcome, LoadOutcome::Fallback(2));
        assert_eq!(names(&store), vec!["Maroc", "Mali"]);
    }

    #[tokio::test]
    async fn stale_response_never_overwrites_newer_request() {
        let store = Arc::new(RecordStore::new());
        let (slow_tx, slow_rx) = oneshot::channel::<Vec<Team>>();

        let first = store.spawn_load(wait_for(slow_rx));
        let second = store.load(fetched(vec![team(2, "Nouveau")])).await;
        assert_eq!(second, LoadOutcome::Applied(1));

        slow_tx.send(vec![team(1, "Ancien")]).unwrap();
        assert_eq!(first.join().await, Some(LoadOutcome::Stale));
        assert_eq!(names(&store), vec!["Nouveau"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn later_spawned_load_wins_regardless_of_scheduling() {
        let store = Arc::new(RecordStore::new());
        let (old_tx, old_rx) = oneshot::channel::<Vec<Team>>();

        let older = store.spawn_load(wait_for(old_rx));
        let newer = store.spawn_load(fetched(vec![team(2, "Nouveau")]));
        assert_eq!(newer.join().await, Some(LoadOutcome::Applied(1)));

        old_tx.send(vec![team(1, "Ancien")]).unwrap();
        assert_eq!(older.join().await, Some(LoadOutcome::Stale));
        assert_eq!(names(&store), vec!["Nouveau"]);
    }

    #[tokio::test]
    async fn dropping_guard_cancels_load() {
        let store = Arc::new(RecordStore::new());
        store.load(fetched(vec![team(1, "Maroc")])).await;

        let (tx, rx) = oneshot::channel::<Vec<Team>>();
        let guard = store.spawn_load(wait_for(rx));
        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(guard);
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(tx.send(vec![team(9, "Perdu")]).is_err());
        assert_eq!(names(&store), vec!["Maroc"]);
    }

    #[tokio::test]
    async fn subscribers_see_each_load() {
        let store = RecordStore::new();
        let mut rx = store.subscribe();
        store.load(fetched(vec![team(1, "Maroc")])).await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);
    }

    #[tokio::test]
    async fn optimistic_edit_is_discarded_by_next_load() {
        let store = RecordStore::new();
        store.load(fetched(vec![team(1, "Maroc")])).await;
        let before = store.snapshot();

        store.apply_optimistic(|teams| teams.push(team(2, "Brouillon")));
        assert_eq!(names(&store), vec!["Maroc", "Brouillon"]);
        assert_eq!(before.len(), 1);

        store.load(fetched(vec![team(1, "Maroc")])).await;
        assert_eq!(names(&store), vec!["Maroc"]);
    }
}
