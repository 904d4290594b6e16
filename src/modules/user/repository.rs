use uuid::Uuid;

use crate::{
    api::error,
    modules::user::{
        model::InsertUser,
        schema::{UserEntity, UserFilter},
    },
};

#[async_trait::async_trait]
pub trait UserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError>;

    /// Case-insensitive lookup.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, error::SystemError>;

    async fn create(&self, user: &InsertUser) -> Result<UserEntity, error::SystemError>;

    async fn find_all(&self) -> Result<Vec<UserEntity>, error::SystemError>;

    /// Users matching `filter` ordered by join date. `limit = None` returns every match.
    async fn search(
        &self,
        filter: &UserFilter,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<Vec<UserEntity>, error::SystemError>;

    async fn count_search(&self, filter: &UserFilter) -> Result<i64, error::SystemError>;
}
