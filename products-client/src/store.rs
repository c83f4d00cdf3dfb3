//! Fetch-or-reuse cache over the products backend.
//!
//! Each resource key maps to an [`Entry`] holding the last committed
//! snapshot, the in-flight fetch (if any) and the generation of the newest
//! fetch started for that key. A fetch only commits when its generation is
//! still the newest one, so a slow response can never overwrite a newer
//! one.

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tokio::task::AbortHandle;
use tracing::{debug, span, warn, Level};

use crate::api::ProductApi;
use crate::error::FetchError;
use crate::structs::Product;

/// Resource key of the product collection.
pub const PRODUCTS_KEY: &str = "products";

pub type Rows = Arc<[Product]>;

type SharedFetch = Shared<BoxFuture<'static, Result<Rows, FetchError>>>;

/// What subscribers of a key observe.
#[derive(Debug, Clone, Default)]
pub struct ResourceSnapshot {
    pub data: Option<Rows>,
    pub error: Option<FetchError>,
    pub is_validating: bool,
    pub fetched_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadState<'a> {
    Loading,
    Failed(&'a FetchError),
    Ready(&'a Rows),
}

impl ResourceSnapshot {
    /// An error wins over data; no data and no error means still loading.
    pub fn state(&self) -> LoadState<'_> {
        match (&self.error, &self.data) {
            (Some(err), _) => LoadState::Failed(err),
            (None, Some(rows)) => LoadState::Ready(rows),
            (None, None) => LoadState::Loading,
        }
    }
}

struct Entry {
    generation: u64,
    stale: bool,
    pending: Option<(u64, SharedFetch)>,
    tasks: Vec<AbortHandle>,
    tx: watch::Sender<ResourceSnapshot>,
}

impl Entry {
    fn new() -> Self {
        let (tx, _) = watch::channel(ResourceSnapshot::default());
        Self {
            generation: 0,
            stale: false,
            pending: None,
            tasks: Vec::new(),
            tx,
        }
    }
}

type EntryMap = Arc<RwLock<HashMap<String, Entry>>>;

pub struct ResourceCache<A> {
    api: Arc<A>,
    entries: EntryMap,
    next_generation: Arc<AtomicU64>,
}

impl<A> Clone for ResourceCache<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            entries: Arc::clone(&self.entries),
            next_generation: Arc::clone(&self.next_generation),
        }
    }
}

impl<A: ProductApi> ResourceCache<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            entries: Arc::new(RwLock::new(HashMap::new())),
            next_generation: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// Returns the cached collection, joining an in-flight fetch or starting
    /// a new one when there is nothing usable.
    ///
    /// If the fetch this call waited on was superseded, the call follows the
    /// newer fetch while one is in flight, and otherwise returns whatever the
    /// newest fetch committed (its rows or its error). It never starts a
    /// fetch of its own after waking up.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self, key: &str) -> Result<Rows, FetchError> {
        let (mut generation, mut fetch) = {
            let mut entries = self.entries.write().await;
            let entry = entries.entry(key.to_string()).or_insert_with(Entry::new);

            if entry.pending.is_none() {
                let cached = entry.tx.borrow().data.clone();
                if let Some(rows) = cached.filter(|_| !entry.stale) {
                    let _span = span!(Level::DEBUG, "load.cache_hit", key).entered();
                    return Ok(rows);
                }
                self.start_fetch(key, entry);
            } else {
                debug!(key, generation = entry.generation, "joining in-flight fetch");
            }

            match &entry.pending {
                Some(pending) => pending.clone(),
                None => return Err(FetchError::Abandoned(key.to_string())),
            }
        };

        loop {
            let result = fetch.await;

            let entries = self.entries.read().await;
            let Some(entry) = entries.get(key) else {
                return Err(FetchError::Abandoned(key.to_string()));
            };
            if entry.generation == generation {
                return result;
            }

            debug!(key, generation, newest = entry.generation, "fetch superseded");
            match &entry.pending {
                Some((newest, pending)) => {
                    generation = *newest;
                    fetch = pending.clone();
                }
                None => return committed(key, &entry.tx.borrow()),
            }
        }
    }

    /// Marks the entry stale and starts a refetch right away. Subscribers keep
    /// seeing the old data (with `is_validating` set) until it resolves.
    #[tracing::instrument(skip(self))]
    pub async fn invalidate(&self, key: &str) {
        let mut entries = self.entries.write().await;
        let entry = entries.entry(key.to_string()).or_insert_with(Entry::new);
        entry.stale = true;
        self.start_fetch(key, entry);
    }

    pub async fn subscribe(&self, key: &str) -> watch::Receiver<ResourceSnapshot> {
        let mut entries = self.entries.write().await;
        entries
            .entry(key.to_string())
            .or_insert_with(Entry::new)
            .tx
            .subscribe()
    }

    pub async fn snapshot(&self, key: &str) -> ResourceSnapshot {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .map(|entry| entry.tx.borrow().clone())
            .unwrap_or_default()
    }

    /// Aborts every fetch and drops all entries. Results that still arrive
    /// are ignored.
    #[tracing::instrument(skip(self))]
    pub async fn shutdown(&self) {
        let mut entries = self.entries.write().await;
        for (_, entry) in entries.drain() {
            for task in entry.tasks {
                task.abort();
            }
        }
    }

    /// Spawns a list fetch under a fresh generation and parks it as the
    /// entry's pending fetch.
    fn start_fetch(&self, key: &str, entry: &mut Entry) {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        entry.generation = generation;
        entry.tx.send_modify(|snap| snap.is_validating = true);
        entry.tasks.retain(|task| !task.is_finished());

        let api = Arc::clone(&self.api);
        let entries = Arc::clone(&self.entries);
        let task_key = key.to_string();
        let handle = tokio::spawn(async move {
            let result = api.list().await.map_err(|source| FetchError::Api {
                key: task_key.clone(),
                source,
            });
            commit(&entries, &task_key, generation, result).await
        });
        entry.tasks.push(handle.abort_handle());

        let abandoned_key = key.to_string();
        let fetch = handle
            .map(move |joined| joined.unwrap_or_else(|_| Err(FetchError::Abandoned(abandoned_key))))
            .boxed()
            .shared();

        debug!(key, generation, "started fetch");
        entry.pending = Some((generation, fetch));
    }
}

/// The outcome last committed for a key.
fn committed(key: &str, snap: &ResourceSnapshot) -> Result<Rows, FetchError> {
    match snap.state() {
        LoadState::Failed(err) => Err(err.clone()),
        LoadState::Ready(rows) => Ok(Arc::clone(rows)),
        LoadState::Loading => Err(FetchError::Abandoned(key.to_string())),
    }
}

/// Applies a fetch result to its entry if it is still the newest fetch.
async fn commit(
    entries: &EntryMap,
    key: &str,
    generation: u64,
    result: Result<Vec<Product>, FetchError>,
) -> Result<Rows, FetchError> {
    let result = result.map(Rows::from);
    let mut entries = entries.write().await;

    let Some(entry) = entries.get_mut(key) else {
        debug!(key, generation, "entry gone, dropping result");
        return Err(FetchError::Abandoned(key.to_string()));
    };
    if entry.generation != generation {
        debug!(key, generation, newest = entry.generation, "dropping stale result");
        return result;
    }

    entry.pending = None;
    if result.is_ok() {
        entry.stale = false;
    }
    entry.tx.send_modify(|snap| {
        snap.is_validating = false;
        match &result {
            Ok(rows) => {
                snap.data = Some(Arc::clone(rows));
                snap.error = None;
                snap.fetched_at = Some(Utc::now());
            }
            Err(err) => {
                warn!(key, error = %err, "fetch failed");
                snap.error = Some(err.clone());
            }
        }
    });

    result
}
