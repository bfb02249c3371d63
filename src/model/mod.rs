use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type StatusId = String;
pub type UserId = String;

/// A timeline post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Status {
    pub id: StatusId,
    pub user_id: UserId,
    pub text: String,
    #[serde(default)]
    pub in_reply_to_status_id: Option<StatusId>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// An account on the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub screen_name: String,
    pub name: String,
}

impl Status {
    pub fn new(id: impl Into<StatusId>, user_id: impl Into<UserId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            text: text.into(),
            in_reply_to_status_id: None,
            created_at: Some(Utc::now()),
        }
    }

    pub fn in_reply_to(mut self, id: impl Into<StatusId>) -> Self {
        self.in_reply_to_status_id = Some(id.into());
        self
    }

    pub fn is_reply(&self) -> bool {
        self.in_reply_to_status_id.is_some()
    }

    pub fn is_reply_to(&self, id: &StatusId) -> bool {
        self.in_reply_to_status_id.as_ref() == Some(id)
    }
}

impl User {
    pub fn new(
        id: impl Into<UserId>,
        screen_name: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            screen_name: screen_name.into(),
            name: name.into(),
        }
    }
}

/// The entity kinds a repository can be declared to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Status,
    User,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Status => write!(f, "status"),
            EntityKind::User => write!(f, "user"),
        }
    }
}

/// Untyped entity record, as it arrives from a warm-start seed.
///
/// Repositories accept these at construction and reject records whose kind
/// does not match the kind they are declared to hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnyEntity {
    Status(Status),
    User(User),
}

impl AnyEntity {
    pub fn kind(&self) -> EntityKind {
        match self {
            AnyEntity::Status(_) => EntityKind::Status,
            AnyEntity::User(_) => EntityKind::User,
        }
    }
}

impl From<Status> for AnyEntity {
    fn from(status: Status) -> Self {
        AnyEntity::Status(status)
    }
}

impl From<User> for AnyEntity {
    fn from(user: User) -> Self {
        AnyEntity::User(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_predicates() {
        let status = Status::new("2", "100", "hi").in_reply_to("1");
        assert!(status.is_reply());
        assert!(status.is_reply_to(&"1".to_string()));
        assert!(!status.is_reply_to(&"3".to_string()));

        let plain = Status::new("3", "100", "standalone");
        assert!(!plain.is_reply());
    }

    #[test]
    fn test_any_entity_roundtrip() {
        let json = r#"{"kind":"status","id":"1","user_id":"100","text":"hello"}"#;
        let any: AnyEntity = serde_json::from_str(json).unwrap();
        assert_eq!(any.kind(), EntityKind::Status);

        let json = r#"{"kind":"user","id":"100","screen_name":"alice","name":"Alice"}"#;
        let any: AnyEntity = serde_json::from_str(json).unwrap();
        assert_eq!(any.kind(), EntityKind::User);
    }
}
