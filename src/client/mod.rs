//! Contract between the repositories and the network layer.
//!
//! The repositories never call out themselves; fetch workers and UI command
//! handlers drive an [`ApiClient`] and feed the results in.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Status, StatusId, User, UserId};
use crate::repository::StatusRepository;

/// Parameters for posting a status, produced by the composer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostParams {
    pub text: String,
    pub in_reply_to_status_id: Option<StatusId>,
}

/// The calls the client's collaborators make against the service API.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Fetch the authenticated user's home timeline.
    async fn home_timeline(&self) -> Result<Vec<Status>>;

    /// Fetch a single status by id.
    async fn show_status(&self, id: &StatusId) -> Result<Status>;

    /// Post a new status.
    async fn post(&self, params: PostParams) -> Result<Status>;

    /// Delete a status owned by the authenticated user.
    async fn destroy_status(&self, id: &StatusId) -> Result<()>;

    /// Fetch a single user by id.
    async fn show_user(&self, id: &UserId) -> Result<User>;
}

/// Returns the cached status when it is live, otherwise fetches it and
/// stores the result. This is how fetch workers avoid network calls for
/// entities the repository already holds.
pub async fn fetch_status_if_missing<C>(
    client: &C,
    statuses: &StatusRepository,
    id: &StatusId,
) -> Result<Status>
where
    C: ApiClient + ?Sized,
{
    if let Some(status) = statuses.find(id) {
        return Ok(status);
    }

    let status = client.show_status(id).await?;
    statuses.store(status.clone());
    Ok(status)
}
