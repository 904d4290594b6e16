//! In-memory stand-ins for Postgres and Redis used by service and HTTP tests.


use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
};
use uuid::Uuid;

use crate::{
    api::error::{self, DbErrorMeta},
    configs::{CacheStore, JwtConfig},
    modules::{
        friend::{
            model::{CreateOutcome, FriendResponse, NewFriendRequest, PendingRequestSummary},
            repository::FriendRequestRepository,
            schema::FriendRequestEntity,
        },
        user::{
            model::InsertUser,
            repository::UserRepository,
            schema::{UserEntity, UserFilter},
        },
    },
};

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret".to_string(),
        access_token_expiration: 900,
        refresh_token_expiration: 3600,
    }
}

fn new_id() -> Uuid {
    Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext))
}

#[derive(Default)]
struct State {
    users: Vec<UserEntity>,
    requests: Vec<FriendRequestEntity>,
}

/// Users and friend requests behind one lock, so every repository call is atomic.
#[derive(Clone, Default)]
pub struct MemoryStore(Arc<Mutex<State>>);

impl MemoryStore {
    /// Inserts a user whose password can never verify; enough for engine tests.
    pub fn seed_user(&self, email: &str, first_name: &str, last_name: &str) -> Uuid {
        let user = UserEntity {
            id: new_id(),
            email: email.to_lowercase(),
            hash_password: String::new(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            is_active: true,
            is_staff: false,
            created_at: Utc::now(),
        };
        let id = user.id;
        self.0.lock().users.push(user);
        id
    }

    pub fn deactivate(&self, id: &Uuid) {
        if let Some(user) = self.0.lock().users.iter_mut().find(|u| u.id == *id) {
            user.is_active = false;
        }
    }

    pub fn friend_request(&self, id: &Uuid) -> Option<FriendRequestEntity> {
        self.0.lock().requests.iter().find(|r| r.id == *id).cloned()
    }
}

fn matches_filter(filter: &UserFilter, user: &UserEntity) -> bool {
    match filter {
        UserFilter::Email(email) => user.email.to_lowercase() == email.to_lowercase(),
        UserFilter::Name(needle) => {
            let needle = needle.to_lowercase();
            user.first_name.to_lowercase().contains(&needle)
                || user.last_name.to_lowercase().contains(&needle)
        }
    }
}

#[async_trait::async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError> {
        Ok(self.0.lock().users.iter().find(|u| u.id == *id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, error::SystemError> {
        let email = email.to_lowercase();
        Ok(self.0.lock().users.iter().find(|u| u.email.to_lowercase() == email).cloned())
    }

    async fn create(&self, user: &InsertUser) -> Result<UserEntity, error::SystemError> {
        let mut state = self.0.lock();
        let email = user.email.to_lowercase();
        if state.users.iter().any(|u| u.email.to_lowercase() == email) {
            return Err(error::SystemError::Conflict(Some(DbErrorMeta {
                code: Some("23505".to_string()),
                constraint: Some("uq_users_email".to_string()),
                message: "duplicate key value violates unique constraint".to_string(),
            })));
        }

        let entity = UserEntity {
            id: new_id(),
            email: user.email.clone(),
            hash_password: user.hash_password.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_active: true,
            is_staff: false,
            created_at: Utc::now(),
        };
        state.users.push(entity.clone());
        Ok(entity)
    }

    async fn find_all(&self) -> Result<Vec<UserEntity>, error::SystemError> {
        Ok(self.0.lock().users.clone())
    }

    async fn search(
        &self,
        filter: &UserFilter,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<Vec<UserEntity>, error::SystemError> {
        let state = self.0.lock();
        let matching = state.users.iter().filter(|u| matches_filter(filter, u)).cloned();
        let paged = matching.skip(offset.max(0) as usize);
        Ok(match limit {
            Some(limit) => paged.take(limit.max(0) as usize).collect(),
            None => paged.collect(),
        })
    }

    async fn count_search(&self, filter: &UserFilter) -> Result<i64, error::SystemError> {
        Ok(self.0.lock().users.iter().filter(|u| matches_filter(filter, u)).count() as i64)
    }
}

#[async_trait::async_trait]
impl FriendRequestRepository for MemoryStore {
    async fn create_rate_limited(
        &self,
        request: &NewFriendRequest,
    ) -> Result<CreateOutcome, error::SystemError> {
        let mut state = self.0.lock();

        let sent = state
            .requests
            .iter()
            .filter(|r| r.from_user_id == request.from_user_id)
            .filter(|r| r.created_at >= request.window_start)
            .count() as i64;
        if sent >= request.limit {
            return Ok(CreateOutcome::RateLimited);
        }

        if state
            .requests
            .iter()
            .any(|r| r.from_user_id == request.from_user_id && r.to_user_id == request.to_user_id)
        {
            return Ok(CreateOutcome::Duplicate);
        }

        let entity = FriendRequestEntity {
            id: new_id(),
            from_user_id: request.from_user_id,
            to_user_id: request.to_user_id,
            is_accepted: false,
            created_at: request.created_at,
            accepted_at: None,
        };
        state.requests.push(entity.clone());
        Ok(CreateOutcome::Created(entity))
    }

    async fn find_incoming(
        &self,
        request_id: &Uuid,
        to_user_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        Ok(self
            .0
            .lock()
            .requests
            .iter()
            .find(|r| r.id == *request_id && r.to_user_id == *to_user_id)
            .cloned())
    }

    async fn mark_accepted(
        &self,
        request_id: &Uuid,
        accepted_at: DateTime<Utc>,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let mut state = self.0.lock();
        let Some(request) =
            state.requests.iter_mut().find(|r| r.id == *request_id && !r.is_accepted)
        else {
            return Ok(None);
        };
        request.is_accepted = true;
        request.accepted_at = Some(accepted_at);
        Ok(Some(request.clone()))
    }

    async fn delete_friend_request(&self, request_id: &Uuid) -> Result<bool, error::SystemError> {
        let mut state = self.0.lock();
        let before = state.requests.len();
        state.requests.retain(|r| r.id != *request_id);
        Ok(state.requests.len() < before)
    }

    async fn find_friends(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendResponse>, error::SystemError> {
        let state = self.0.lock();
        let ids: BTreeSet<Uuid> = state
            .requests
            .iter()
            .filter(|r| r.is_accepted)
            .filter_map(|r| {
                if r.from_user_id == *user_id {
                    Some(r.to_user_id)
                } else if r.to_user_id == *user_id {
                    Some(r.from_user_id)
                } else {
                    None
                }
            })
            .collect();

        let mut friends: Vec<FriendResponse> = state
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .map(|u| FriendResponse {
                id: u.id,
                email: u.email.clone(),
                first_name: u.first_name.clone(),
                last_name: u.last_name.clone(),
            })
            .collect();
        friends.sort_by(|a, b| {
            (&a.first_name, &a.last_name, a.id).cmp(&(&b.first_name, &b.last_name, b.id))
        });
        Ok(friends)
    }

    async fn find_pending_to_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestEntity>, error::SystemError> {
        let mut pending: Vec<FriendRequestEntity> = self
            .0
            .lock()
            .requests
            .iter()
            .filter(|r| r.to_user_id == *user_id && !r.is_accepted)
            .cloned()
            .collect();
        pending.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(pending)
    }

    async fn find_pending_summaries(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<PendingRequestSummary>, error::SystemError> {
        let pending = self.find_pending_to_user(user_id).await?;
        let state = self.0.lock();
        Ok(pending
            .into_iter()
            .filter_map(|r| {
                let sender = state.users.iter().find(|u| u.id == r.from_user_id)?;
                Some(PendingRequestSummary {
                    id: r.id,
                    from_user_id: sender.id,
                    from_user_email: sender.email.clone(),
                })
            })
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryCache(Mutex<HashMap<String, (Vec<u8>, DateTime<Utc>)>>);

impl MemoryCache {
    pub fn contains(&self, key: &str) -> bool {
        self.0.lock().get(key).is_some_and(|(_, expires)| *expires > Utc::now())
    }
}

#[async_trait::async_trait]
impl CacheStore for MemoryCache {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, error::SystemError> {
        let entries = self.0.lock();
        Ok(entries
            .get(key)
            .filter(|(_, expires)| *expires > Utc::now())
            .map(|(value, _)| value.clone()))
    }

    async fn set_bytes(
        &self,
        key: &str,
        value: Vec<u8>,
        expiration: usize,
    ) -> Result<(), error::SystemError> {
        let expires = Utc::now() + chrono::Duration::seconds(expiration as i64);
        self.0.lock().insert(key.to_string(), (value, expires));
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, error::SystemError> {
        Ok(self.contains(key))
    }

}
