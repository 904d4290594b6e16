use uuid::Uuid;

use crate::{
    api::error,
    modules::friend::{
        model::{CreateOutcome, FriendResponse, NewFriendRequest, PendingRequestSummary},
        repository::FriendRequestRepository,
        schema::FriendRequestEntity,
    },
};

#[derive(Clone)]
pub struct FriendRequestRepositoryPg {
    pool: sqlx::PgPool,
}

impl FriendRequestRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl FriendRequestRepository for FriendRequestRepositoryPg {
    async fn create_rate_limited(
        &self,
        request: &NewFriendRequest,
    ) -> Result<CreateOutcome, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        // Serializes count-then-insert per sender until the transaction ends.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
            .bind(request.from_user_id)
            .execute(&mut *tx)
            .await?;

        let sent: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM friend_requests WHERE from_user_id = $1 AND created_at >= $2",
        )
        .bind(request.from_user_id)
        .bind(request.window_start)
        .fetch_one(&mut *tx)
        .await?;

        if sent >= request.limit {
            tx.rollback().await?;
            return Ok(CreateOutcome::RateLimited);
        }

        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let created = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            INSERT INTO friend_requests (id, from_user_id, to_user_id, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT ON CONSTRAINT uq_friend_requests_pair DO NOTHING
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.from_user_id)
        .bind(request.to_user_id)
        .bind(request.created_at)
        .fetch_optional(&mut *tx)
        .await?;

        match created {
            Some(entity) => {
                tx.commit().await?;
                Ok(CreateOutcome::Created(entity))
            }
            None => {
                tx.rollback().await?;
                Ok(CreateOutcome::Duplicate)
            }
        }
    }

    async fn find_incoming(
        &self,
        request_id: &Uuid,
        to_user_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let request = sqlx::query_as::<_, FriendRequestEntity>(
            "SELECT * FROM friend_requests WHERE id = $1 AND to_user_id = $2",
        )
        .bind(request_id)
        .bind(to_user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn mark_accepted(
        &self,
        request_id: &Uuid,
        accepted_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let request = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            UPDATE friend_requests
            SET is_accepted = TRUE, accepted_at = $2
            WHERE id = $1 AND NOT is_accepted
            RETURNING *
            "#,
        )
        .bind(request_id)
        .bind(accepted_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn delete_friend_request(&self, request_id: &Uuid) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM friend_requests WHERE id = $1")
            .bind(request_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows > 0)
    }

    async fn find_friends(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendResponse>, error::SystemError> {
        let friends = sqlx::query_as::<_, FriendResponse>(
            r#"
            SELECT u.id, u.email, u.first_name, u.last_name
            FROM users u
            WHERE u.id IN (
                SELECT to_user_id FROM friend_requests
                WHERE from_user_id = $1 AND is_accepted
                UNION
                SELECT from_user_id FROM friend_requests
                WHERE to_user_id = $1 AND is_accepted
            )
            ORDER BY u.first_name, u.last_name, u.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(friends)
    }

    async fn find_pending_to_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestEntity>, error::SystemError> {
        let requests = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            SELECT *
            FROM friend_requests
            WHERE to_user_id = $1 AND NOT is_accepted
            ORDER BY created_at DESC, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    async fn find_pending_summaries(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<PendingRequestSummary>, error::SystemError> {
        let rows = sqlx::query_as::<_, PendingRequestSummary>(
            r#"
            SELECT
                fr.id,
                fr.from_user_id,
                u.email AS from_user_email
            FROM friend_requests fr
            JOIN users u
                ON fr.from_user_id = u.id
            WHERE fr.to_user_id = $1 AND NOT fr.is_accepted
            ORDER BY fr.created_at DESC, fr.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
