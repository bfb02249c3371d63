use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::model::{AnyEntity, EntityKind, User, UserId};
use crate::repository::clock::Clock;
use crate::repository::expirable::{Entity, ExpirableStore};

impl Entity for User {
    type Id = UserId;

    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> UserId {
        self.id.clone()
    }

    fn from_any(any: AnyEntity) -> Result<Self> {
        match any {
            AnyEntity::User(user) => Ok(user),
            other => Err(Error::TypeMismatch {
                expected: Self::KIND,
                actual: other.kind(),
            }),
        }
    }
}

/// User-kind repository.
#[derive(Clone)]
pub struct UserRepository {
    store: ExpirableStore<User>,
}

impl UserRepository {
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

    pub fn store(&self, user: User) {
        self.store.store(user);
    }

    pub fn all(&self) -> Vec<User> {
        self.store.values()
    }

    pub fn find(&self, id: &UserId) -> Option<User> {
        self.store.find(id)
    }

    /// Live-set scan by handle, same shape as the status reply lookup.
    pub fn find_by_screen_name(&self, screen_name: &str) -> Option<User> {
        self.store
            .values()
            .into_iter()
            .find(|user| user.screen_name == screen_name)
    }

    pub fn contains(&self, id: &UserId) -> bool {
        self.store.contains(id)
    }

    pub fn delete(&self, id: &UserId) {
        self.store.delete(id);
    }

    pub fn ids(&self) -> Vec<UserId> {
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
