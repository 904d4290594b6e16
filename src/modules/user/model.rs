use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::modules::user::schema::UserEntity;

#[derive(Deserialize, Validate)]
pub struct RegisterModel {
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Deserialize, Validate)]
pub struct LoginModel {
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct LogoutModel {
    #[validate(length(min = 1, message = "Refresh token cannot be empty"))]
    pub refresh_token: String,
}

#[derive(Deserialize, Validate)]
pub struct RefreshTokenModel {
    #[validate(length(min = 1, message = "Refresh token cannot be empty"))]
    pub refresh: String,
}

#[derive(Deserialize, Validate)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[validate(range(min = 1, message = "Invalid page."))]
    pub page: Option<i64>,
}

pub struct InsertUser {
    pub email: String,
    pub hash_password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct AccessTokenResponse {
    pub access: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct UserResponse {
    pub id: uuid::Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<UserEntity> for UserResponse {
    fn from(entity: UserEntity) -> Self {
        UserResponse {
            id: entity.id,
            email: entity.email,
            first_name: entity.first_name,
            last_name: entity.last_name,
        }
    }
}

/// Row of the full user listing.
#[derive(Debug, Serialize)]
pub struct UserListItem {
    pub id: uuid::Uuid,
    pub first_name: String,
    pub email: String,
}

impl From<UserEntity> for UserListItem {
    fn from(entity: UserEntity) -> Self {
        UserListItem { id: entity.id, first_name: entity.first_name, email: entity.email }
    }
}

/// Page-number pagination envelope.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub count: i64,
    pub next: Option<i64>,
    pub previous: Option<i64>,
    pub results: Vec<T>,
}

impl<T: Serialize> Page<T> {
    pub fn new(results: Vec<T>, count: i64, page: i64, page_size: i64) -> Self {
        let last_page = ((count + page_size - 1) / page_size).max(1);
        Page {
            count,
            next: (page < last_page).then_some(page + 1),
            previous: (page > 1).then_some(page - 1),
            results,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResults<T: Serialize> {
    pub results: Vec<T>,
}
