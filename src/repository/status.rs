use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::model::{AnyEntity, EntityKind, Status, StatusId};
use crate::repository::clock::Clock;
use crate::repository::expirable::{Entity, ExpirableStore};

impl Entity for Status {
    type Id = StatusId;

    const KIND: EntityKind = EntityKind::Status;

    fn id(&self) -> StatusId {
        self.id.clone()
    }

    fn from_any(any: AnyEntity) -> Result<Self> {
        match any {
            AnyEntity::Status(status) => Ok(status),
            other => Err(Error::TypeMismatch {
                expected: Self::KIND,
                actual: other.kind(),
            }),
        }
    }
}

/// Status-kind repository: the expirable store plus timeline queries.
#[derive(Clone)]
pub struct StatusRepository {
    store: ExpirableStore<Status>,
}

impl StatusRepository {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: ExpirableStore::new(ttl, clock),
        }
    }

    pub fn with_seed<I>(ttl: Duration, clock: Arc<dyn Clock>, seed: I) -> Result<Self>
    where
        I: IntoIterator<Item = AnyEntity>,
    {
        Ok(Self {
            store: ExpirableStore::with_seed(ttl, clock, seed)?,
        })
    }

    pub fn store(&self, status: Status) {
        self.store.store(status);
    }

    /// Every live status, in no particular order.
    pub fn all(&self) -> Vec<Status> {
        self.store.values()
    }

    pub fn find(&self, id: &StatusId) -> Option<Status> {
        self.store.find(id)
    }

    pub fn contains(&self, id: &StatusId) -> bool {
        self.store.contains(id)
    }

    pub fn delete(&self, id: &StatusId) {
        self.store.delete(id);
    }

    /// Live statuses that are replies to `id`.
    ///
    /// A linear scan over the live set; the store keeps no index on the
    /// reply field since TTL-driven eviction keeps timelines small.
    pub fn find_replies_for(&self, id: &StatusId) -> Vec<Status> {
        self.store
            .values()
            .into_iter()
            .filter(|status| status.is_reply_to(id))
            .collect()
    }

    /// Live ids, consulted by fetch workers to decide whether a network
    /// call is needed.
    pub fn ids(&self) -> Vec<StatusId> {
        self.store.ids()
    }

    pub fn sweep(&self) -> usize {
        self.store.sweep()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
