use uuid::Uuid;

use crate::api::error;
use crate::modules::friend::model::{
    CreateOutcome, FriendResponse, NewFriendRequest, PendingRequestSummary,
};
use crate::modules::friend::schema::FriendRequestEntity;

#[async_trait::async_trait]
pub trait FriendRequestRepository {
    /// Counts the sender's requests since `window_start` and inserts only when the
    /// count is below `limit` and the ordered pair is free. Both checks and the insert
    /// are atomic per sender.
    async fn create_rate_limited(
        &self,
        request: &NewFriendRequest,
    ) -> Result<CreateOutcome, error::SystemError>;

    /// Request `request_id` addressed to `to_user_id`, if any.
    async fn find_incoming(
        &self,
        request_id: &Uuid,
        to_user_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError>;

    async fn mark_accepted(
        &self,
        request_id: &Uuid,
        accepted_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError>;

    async fn delete_friend_request(&self, request_id: &Uuid) -> Result<bool, error::SystemError>;

    async fn find_friends(&self, user_id: &Uuid)
    -> Result<Vec<FriendResponse>, error::SystemError>;

    async fn find_pending_to_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestEntity>, error::SystemError>;

    async fn find_pending_summaries(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<PendingRequestSummary>, error::SystemError>;
}
