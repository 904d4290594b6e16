use sqlx::prelude::FromRow;
use uuid::Uuid;

#[allow(unused)]
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub email: String,
    pub hash_password: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Predicate used by user search.
#[derive(Debug, Clone, PartialEq)]
pub enum UserFilter {
    /// Exact, case-insensitive e-mail match.
    Email(String),
    /// Case-insensitive substring of first or last name.
    Name(String),
}

impl UserFilter {
    pub fn from_query(query: &str) -> Self {
        if query.contains('@') {
            UserFilter::Email(query.to_string())
        } else {
            UserFilter::Name(query.to_string())
        }
    }
}
