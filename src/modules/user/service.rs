use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::configs::{CacheStore, JwtConfig};
use crate::constants::{PROFILE_CACHE_TTL, SEARCH_PAGE_SIZE};
use crate::modules::user::model::{
    AccessTokenResponse, InsertUser, LoginModel, Page, RegisterModel, SearchResults,
    TokenPairResponse, UserListItem, UserResponse,
};
use crate::modules::user::repository::UserRepository;
use crate::modules::user::schema::{UserEntity, UserFilter};
use crate::utils::{hash_password, verify_password, Claims, TokenType};

const INVALID_CREDENTIALS: &str = "Unable to log in with provided credentials.";

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository + Send + Sync>,
    cache: Arc<dyn CacheStore>,
    jwt: JwtConfig,
}

impl UserService {
    pub fn with_dependencies(
        repo: Arc<dyn UserRepository + Send + Sync>,
        cache: Arc<dyn CacheStore>,
        jwt: JwtConfig,
    ) -> Self {
        info!("UserService initialized with dependencies");
        UserService { repo, cache, jwt }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<UserResponse, error::SystemError> {
        let key = format!("user:{}", id);
        if let Some(cached_user) = self.cache.get::<UserResponse>(&key).await? {
            info!("User {} found in cache", id);
            return Ok(cached_user);
        }
        let entity = self
            .repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;
        let user = UserResponse::from(entity);
        self.cache.set(&key, &user, PROFILE_CACHE_TTL).await?;
        info!("User {} cached", id);
        Ok(user)
    }

    pub async fn register(&self, user: RegisterModel) -> Result<UserResponse, error::SystemError> {
        let email = user.email.trim().to_lowercase();

        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(error::SystemError::duplicate("Email already exists"));
        }

        let new_user = InsertUser {
            email,
            hash_password: hash_password(&user.password)?,
            first_name: user.first_name,
            last_name: user.last_name,
        };

        // A concurrent registration can still lose the race on the unique index.
        let created = self.repo.create(&new_user).await?;
        info!("User {} registered", created.id);
        Ok(UserResponse::from(created))
    }

    pub async fn login(&self, user: LoginModel) -> Result<TokenPairResponse, error::SystemError> {
        let entity = self
            .repo
            .find_by_email(user.email.trim())
            .await?
            .ok_or_else(|| error::SystemError::bad_request(INVALID_CREDENTIALS))?;

        if !verify_password(&entity.hash_password, &user.password)? || !entity.is_active {
            return Err(error::SystemError::bad_request(INVALID_CREDENTIALS));
        }

        self.issue_token_pair(&entity)
    }

    fn issue_token_pair(&self, user: &UserEntity) -> Result<TokenPairResponse, error::SystemError> {
        let secret = self.jwt.secret.as_bytes();
        let access =
            Claims::new(&user.id, &user.email, TokenType::Access, self.jwt.access_token_expiration)
                .encode(secret)?;
        let refresh = Claims::new(
            &user.id,
            &user.email,
            TokenType::Refresh,
            self.jwt.refresh_token_expiration,
        )
        .encode(secret)?;

        Ok(TokenPairResponse { access, refresh })
    }

    fn decode_refresh(&self, token: &str) -> Option<Claims> {
        Claims::decode(token, self.jwt.secret.as_bytes())
            .ok()
            .filter(|claims| claims.token_type == TokenType::Refresh)
    }

    pub async fn refresh(&self, token: &str) -> Result<AccessTokenResponse, error::SystemError> {
        let claims = self
            .decode_refresh(token)
            .ok_or_else(|| error::SystemError::unauthorized("Token is invalid or expired"))?;

        if self.cache.exists(&blacklist_key(&claims.jti)).await? {
            return Err(error::SystemError::unauthorized("Token is blacklisted"));
        }

        let access = Claims::new(
            &claims.sub,
            &claims.email,
            TokenType::Access,
            self.jwt.access_token_expiration,
        )
        .encode(self.jwt.secret.as_bytes())?;

        Ok(AccessTokenResponse { access })
    }

    /// Blacklists the refresh token until it would have expired anyway.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), error::SystemError> {
        let claims = self
            .decode_refresh(refresh_token)
            .ok_or_else(|| error::SystemError::bad_request("Token is invalid or expired"))?;

        let key = blacklist_key(&claims.jti);
        if self.cache.exists(&key).await? {
            return Err(error::SystemError::bad_request("Token is blacklisted"));
        }

        self.cache.set(&key, &claims.sub, claims.remaining_secs()).await?;
        info!("Refresh token {} blacklisted for user {}", claims.jti, claims.sub);
        Ok(())
    }

    pub async fn search_users(
        &self,
        query: &str,
        page: i64,
    ) -> Result<Page<UserResponse>, error::SystemError> {
        let filter = UserFilter::from_query(query);
        let count = self.repo.count_search(&filter).await?;

        let offset = match page.checked_sub(1).and_then(|p| p.checked_mul(SEARCH_PAGE_SIZE)) {
            Some(offset) if page >= 1 && (page == 1 || offset < count) => offset,
            _ => return Err(error::SystemError::not_found("Invalid page.")),
        };

        let users = self.repo.search(&filter, Some(SEARCH_PAGE_SIZE), offset).await?;
        Ok(Page::new(
            users.into_iter().map(UserResponse::from).collect(),
            count,
            page,
            SEARCH_PAGE_SIZE,
        ))
    }

    pub async fn search_users_unpaginated(
        &self,
        query: &str,
    ) -> Result<SearchResults<UserResponse>, error::SystemError> {
        let filter = UserFilter::from_query(query);
        let users = self.repo.search(&filter, None, 0).await?;
        Ok(SearchResults { results: users.into_iter().map(UserResponse::from).collect() })
    }

    pub async fn list_users(&self) -> Result<Vec<UserListItem>, error::SystemError> {
        let users = self.repo.find_all().await?;
        Ok(users.into_iter().map(UserListItem::from).collect())
    }
}

fn blacklist_key(jti: &Uuid) -> String {
    format!("blacklist:{jti}")
}
