use uuid::Uuid;

use crate::{
    api::error,
    modules::user::{
        model::InsertUser,
        repository::UserRepository,
        schema::{UserEntity, UserFilter},
    },
};

#[derive(Clone)]
pub struct UserRepositoryPg {
    pool: sqlx::PgPool,
}

impl UserRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

fn like_pattern(query: &str) -> String {
    format!("%{}%", query.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_"))
}

/// `$1` parameter and WHERE clause for a filter.
fn filter_clause(filter: &UserFilter) -> (String, &'static str) {
    match filter {
        UserFilter::Email(email) => (email.clone(), "lower(email) = lower($1)"),
        UserFilter::Name(name) => (
            like_pattern(name),
            "(lower(first_name) LIKE lower($1) OR lower(last_name) LIKE lower($1))",
        ),
    }
}

#[async_trait::async_trait]
impl UserRepository for UserRepositoryPg {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError> {
        let user = sqlx::query_as::<_, UserEntity>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, error::SystemError> {
        let user =
            sqlx::query_as::<_, UserEntity>("SELECT * FROM users WHERE lower(email) = lower($1)")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user)
    }

    async fn create(&self, user: &InsertUser) -> Result<UserEntity, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let user = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (id, email, hash_password, first_name, last_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&user.email)
        .bind(&user.hash_password)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_all(&self) -> Result<Vec<UserEntity>, error::SystemError> {
        let users = sqlx::query_as::<_, UserEntity>("SELECT * FROM users ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn search(
        &self,
        filter: &UserFilter,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<Vec<UserEntity>, error::SystemError> {
        let (param, clause) = filter_clause(filter);
        // LIMIT NULL means no limit in Postgres
        let sql = format!(
            "SELECT * FROM users WHERE {clause} ORDER BY created_at, id LIMIT $2 OFFSET $3"
        );
        let users = sqlx::query_as::<_, UserEntity>(&sql)
            .bind(param)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn count_search(&self, filter: &UserFilter) -> Result<i64, error::SystemError> {
        let (param, clause) = filter_clause(filter);
        let sql = format!("SELECT COUNT(*) FROM users WHERE {clause}");
        let count: i64 = sqlx::query_scalar(&sql).bind(param).fetch_one(&self.pool).await?;
        Ok(count)
    }
}
