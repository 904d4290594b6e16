use serde::Serialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// Directed proposal from `from_user_id` to `to_user_id`. Rejected requests are deleted,
/// so a row is either pending or accepted.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FriendRequestEntity {
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub is_accepted: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub accepted_at: Option<chrono::DateTime<chrono::Utc>>,
}
