use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::error::Result;
use crate::model::{AnyEntity, EntityKind};
use crate::repository::clock::Clock;

/// A domain object with a stable, unique identifier, storable in an
/// [`ExpirableStore`] declared for its kind.
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Clone + Eq + Hash + Send + Sync + 'static;

    /// The kind this entity belongs to; a store is declared for exactly one.
    const KIND: EntityKind;

    fn id(&self) -> Self::Id;

    /// Converts an untyped seed record into this kind, failing with
    /// [`Error::TypeMismatch`](crate::error::Error::TypeMismatch) for a
    /// record of a foreign kind.
    fn from_any(any: AnyEntity) -> Result<Self>;
}

/// Generic keyed container with per-entry recency tracking and time-based
/// eviction.
///
/// Entries are touched on `store` and on successful lookup through [`find`];
/// bulk enumeration does not count as liveness. An entry whose last touch is
/// older than the TTL is treated as absent by every read even before the
/// [`sweep`] has physically reclaimed it.
///
/// Both maps live behind a single lock, so concurrent callers never observe
/// an entity without its recency record or vice versa.
///
/// [`find`]: ExpirableStore::find
/// [`sweep`]: ExpirableStore::sweep
pub struct ExpirableStore<E: Entity> {
    inner: Arc<Mutex<StoreInner<E>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

struct StoreInner<E: Entity> {
    entries: HashMap<E::Id, E>,
    touched_at: HashMap<E::Id, Instant>,
}

impl<E: Entity> Clone for ExpirableStore<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            ttl: self.ttl,
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<E: Entity> ExpirableStore<E> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                entries: HashMap::new(),
                touched_at: HashMap::new(),
            })),
            ttl,
            clock,
        }
    }

    /// Creates a store pre-populated from a warm-start seed.
    ///
    /// Every record must be of the declared kind; a foreign record fails
    /// construction with `TypeMismatch` rather than being silently ignored.
    pub fn with_seed<I>(ttl: Duration, clock: Arc<dyn Clock>, seed: I) -> Result<Self>
    where
        I: IntoIterator<Item = AnyEntity>,
    {
        let store = Self::new(ttl, clock);
        {
            let mut inner = store.inner.lock();
            let now = store.clock.now();
            for record in seed {
                let entity = E::from_any(record)?;
                let id = entity.id();
                inner.entries.insert(id.clone(), entity);
                inner.touched_at.insert(id, now);
            }
        }
        Ok(store)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_expired(&self, touched_at: Instant, now: Instant) -> bool {
        now.saturating_duration_since(touched_at) > self.ttl
    }

    /// Inserts or replaces the entity under its id and refreshes its touch
    /// timestamp. Storing under an existing id resurrects an
    /// expired-but-unswept entry.
    pub fn store(&self, entity: E) {
        let mut inner = self.inner.lock();
        let now = self.clock.now();
        let id = entity.id();
        inner.entries.insert(id.clone(), entity);
        inner.touched_at.insert(id, now);
    }

    /// Returns the entity for `id` if present and not expired, refreshing its
    /// touch timestamp. Expired-but-unswept entries are treated as absent;
    /// reclaiming them is left to [`sweep`](ExpirableStore::sweep).
    pub fn find(&self, id: &E::Id) -> Option<E> {
        let mut inner = self.inner.lock();
        let now = self.clock.now();
        let touched_at = *inner.touched_at.get(id)?;
        if self.is_expired(touched_at, now) {
            return None;
        }
        inner.touched_at.insert(id.clone(), now);
        inner.entries.get(id).cloned()
    }

    /// Pure existence check: no touch, expired entries count as absent.
    pub fn contains(&self, id: &E::Id) -> bool {
        let inner = self.inner.lock();
        let now = self.clock.now();
        inner
            .touched_at
            .get(id)
            .map_or(false, |touched_at| !self.is_expired(*touched_at, now))
    }

    /// Removes the entity and its recency record together. Deleting an
    /// absent id is a no-op.
    pub fn delete(&self, id: &E::Id) {
        let mut inner = self.inner.lock();
        inner.touched_at.remove(id);
        inner.entries.remove(id);
    }

    /// Snapshot of the current non-expired entities, in no particular order.
    /// Does not touch timestamps or reclaim expired entries.
    pub fn values(&self) -> Vec<E> {
        let inner = self.inner.lock();
        let now = self.clock.now();
        inner
            .entries
            .iter()
            .filter(|(id, _)| {
                inner
                    .touched_at
                    .get(*id)
                    .map_or(false, |touched_at| !self.is_expired(*touched_at, now))
            })
            .map(|(_, entity)| entity.clone())
            .collect()
    }

    /// Snapshot of the current non-expired ids, in no particular order.
    pub fn ids(&self) -> Vec<E::Id> {
        let inner = self.inner.lock();
        let now = self.clock.now();
        inner
            .touched_at
            .iter()
            .filter(|(_, touched_at)| !self.is_expired(**touched_at, now))
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Reclaims every entry whose age exceeds the TTL and returns how many
    /// were removed. Running it twice with no intervening writes removes
    /// nothing the second time.
    pub fn sweep(&self) -> usize {
        let mut inner = self.inner.lock();
        let now = self.clock.now();
        let expired: Vec<E::Id> = inner
            .touched_at
            .iter()
            .filter(|(_, touched_at)| self.is_expired(**touched_at, now))
            .map(|(id, _)| id.clone())
            .collect();
        for id in &expired {
            inner.touched_at.remove(id);
            inner.entries.remove(id);
        }
        expired.len()
    }

    /// Number of tracked entries, including expired ones the sweep has not
    /// reclaimed yet.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }
}
