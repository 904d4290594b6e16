use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    api::error,
    constants::{FRIEND_REQUEST_LIMIT, FRIEND_REQUEST_WINDOW_SECS},
    modules::{
        friend::{
            model::{
                CreateOutcome, FriendRequestAction, FriendRequestResponse, FriendResponse,
                NewFriendRequest, PendingRequestSummary,
            },
            repository::FriendRequestRepository,
        },
        user::repository::UserRepository,
    },
};

#[derive(Clone)]
pub struct FriendService {
    friend_repo: Arc<dyn FriendRequestRepository + Send + Sync>,
    user_repo: Arc<dyn UserRepository + Send + Sync>,
}

impl FriendService {
    pub fn with_dependencies(
        friend_repo: Arc<dyn FriendRequestRepository + Send + Sync>,
        user_repo: Arc<dyn UserRepository + Send + Sync>,
    ) -> Self {
        FriendService { friend_repo, user_repo }
    }

    pub async fn send_friend_request(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<FriendRequestResponse, error::SystemError> {
        self.send_friend_request_at(sender_id, receiver_id, Utc::now()).await
    }

    /// Checks run in order: self-request, receiver exists, rate limit, pair uniqueness.
    pub(crate) async fn send_friend_request_at(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<FriendRequestResponse, error::SystemError> {
        if receiver_id == sender_id {
            return Err(error::SystemError::bad_request("Cannot send friend request to yourself"));
        }

        if self.user_repo.find_by_id(&receiver_id).await?.is_none() {
            return Err(error::SystemError::not_found("User not found."));
        }

        let request = NewFriendRequest {
            from_user_id: sender_id,
            to_user_id: receiver_id,
            created_at: now,
            window_start: now - chrono::Duration::seconds(FRIEND_REQUEST_WINDOW_SECS),
            limit: FRIEND_REQUEST_LIMIT,
        };

        match self.friend_repo.create_rate_limited(&request).await {
            Ok(CreateOutcome::Created(entity)) => {
                tracing::info!(
                    request_id = %entity.id,
                    from = %sender_id,
                    to = %receiver_id,
                    "friend request sent"
                );
                Ok(FriendRequestResponse::from(entity))
            }
            Ok(CreateOutcome::RateLimited) => {
                tracing::warn!(from = %sender_id, "friend request rate limit reached");
                Err(error::SystemError::too_many_requests(
                    "You cannot send more than 3 friend requests per minute.",
                ))
            }
            Ok(CreateOutcome::Duplicate) | Err(error::SystemError::Conflict(_)) => {
                Err(error::SystemError::duplicate("Friend request already sent."))
            }
            Err(e) => Err(e),
        }
    }

    /// Only the addressee may respond; anyone else sees the request as missing.
    /// The action is checked after the lookup, so a missing request wins over a bad action.
    /// Returns the updated request on accept and `None` on reject.
    pub async fn respond_to_friend_request(
        &self,
        user_id: Uuid,
        request_id: Uuid,
        action: &str,
    ) -> Result<Option<FriendRequestResponse>, error::SystemError> {
        let request = self
            .friend_repo
            .find_incoming(&request_id, &user_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Friend request not found."))?;

        let action = action
            .parse::<FriendRequestAction>()
            .map_err(|_| error::SystemError::bad_request("Invalid action."))?;

        match action {
            FriendRequestAction::Accept => {
                if request.is_accepted {
                    return Err(error::SystemError::bad_request(
                        "Friend request already accepted.",
                    ));
                }

                let accepted = self
                    .friend_repo
                    .mark_accepted(&request_id, Utc::now())
                    .await?
                    .ok_or_else(|| {
                        error::SystemError::bad_request("Friend request already accepted.")
                    })?;

                tracing::info!(
                    request_id = %accepted.id,
                    from = %accepted.from_user_id,
                    to = %accepted.to_user_id,
                    "friend request accepted"
                );
                Ok(Some(FriendRequestResponse::from(accepted)))
            }
            FriendRequestAction::Reject => {
                if !self.friend_repo.delete_friend_request(&request_id).await? {
                    return Err(error::SystemError::not_found("Friend request not found."));
                }

                tracing::info!(
                    request_id = %request.id,
                    from = %request.from_user_id,
                    to = %request.to_user_id,
                    rejected_at = %Utc::now(),
                    "friend request rejected"
                );
                Ok(None)
            }
        }
    }

    pub async fn get_friends(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendResponse>, error::SystemError> {
        self.friend_repo.find_friends(&user_id).await
    }

    pub async fn get_pending_summaries(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<PendingRequestSummary>, error::SystemError> {
        self.friend_repo.find_pending_summaries(&user_id).await
    }

    pub async fn get_pending_requests(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        let requests = self.friend_repo.find_pending_to_user(&user_id).await?;
        Ok(requests.into_iter().map(FriendRequestResponse::from).collect())
    }
}
