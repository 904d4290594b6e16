use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::modules::friend::schema::FriendRequestEntity;

#[derive(Debug, Deserialize, Validate)]
pub struct SendFriendRequestBody {
    pub to_user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RespondFriendRequestBody {
    pub request_id: Option<Uuid>,
    #[validate(length(min = 1, message = "Request ID and action are required."))]
    pub action: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FriendRequestAction {
    Accept,
    Reject,
}

impl FromStr for FriendRequestAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accept" => Ok(FriendRequestAction::Accept),
            "reject" => Ok(FriendRequestAction::Reject),
            _ => Err(()),
        }
    }
}

/// Summary of a user on the other side of an accepted request.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct FriendResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct PendingRequestSummary {
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub from_user_email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendRequestResponse {
    pub id: Uuid,
    pub from_user: Uuid,
    pub to_user: Uuid,
    pub is_accepted: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<FriendRequestEntity> for FriendRequestResponse {
    fn from(entity: FriendRequestEntity) -> Self {
        FriendRequestResponse {
            id: entity.id,
            from_user: entity.from_user_id,
            to_user: entity.to_user_id,
            is_accepted: entity.is_accepted,
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FriendsList {
    pub friends: Vec<FriendResponse>,
}

#[derive(Debug, Serialize)]
pub struct PendingRequestsList {
    pub pending_requests: Vec<PendingRequestSummary>,
}

/// Insert parameters, including the sliding rate-limit window evaluated in the same
/// transaction as the insert.
pub struct NewFriendRequest {
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub window_start: chrono::DateTime<chrono::Utc>,
    pub limit: i64,
}

#[derive(Debug)]
pub enum CreateOutcome {
    Created(FriendRequestEntity),
    RateLimited,
    Duplicate,
}
