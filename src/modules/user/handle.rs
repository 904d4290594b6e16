use actix_web::{get, post, web, HttpRequest};

use crate::modules::user::{model, service::UserService};
use crate::{
    api::{error, success},
    middlewares::get_claims,
    utils::{ValidatedJson, ValidatedQuery},
};

#[post("/register")]
pub async fn register(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::RegisterModel>,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let user = user_service.register(user_data.0).await?;
    Ok(success::Success::created(Some(user)).message("Registration successful"))
}

#[post("/login")]
pub async fn login(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::LoginModel>,
) -> Result<success::Success<model::TokenPairResponse>, error::Error> {
    let tokens = user_service.login(user_data.0).await?;
    Ok(success::Success::ok(Some(tokens)).message("Login successful"))
}

#[post("/token")]
pub async fn obtain_token_pair(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::LoginModel>,
) -> Result<success::Success<model::TokenPairResponse>, error::Error> {
    let tokens = user_service.login(user_data.0).await?;
    Ok(success::Success::ok(Some(tokens)))
}

#[post("/token/refresh")]
pub async fn refresh_token(
    user_service: web::Data<UserService>,
    body: ValidatedJson<model::RefreshTokenModel>,
) -> Result<success::Success<model::AccessTokenResponse>, error::Error> {
    let access = user_service.refresh(&body.0.refresh).await?;
    Ok(success::Success::ok(Some(access)))
}

#[post("/logout")]
pub async fn logout(
    user_service: web::Data<UserService>,
    body: ValidatedJson<model::LogoutModel>,
) -> Result<success::Success<()>, error::Error> {
    user_service.logout(&body.0.refresh_token).await?;
    Ok(success::Success::reset_content())
}

#[get("/profile")]
pub async fn get_profile(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let id = get_claims(&req)?.sub;
    let user = user_service.get_by_id(id).await?;
    Ok(success::Success::ok(Some(user)).message("Profile retrieved successfully"))
}

#[get("/search-users")]
pub async fn search_users(
    user_service: web::Data<UserService>,
    query: ValidatedQuery<model::SearchQuery>,
) -> Result<success::Success<model::Page<model::UserResponse>>, error::Error> {
    let model::SearchQuery { q, page } = query.0;
    let page = user_service.search_users(&q, page.unwrap_or(1)).await?;
    Ok(success::Success::ok(Some(page)))
}

#[get("/search-users/all")]
pub async fn search_users_unpaginated(
    user_service: web::Data<UserService>,
    query: ValidatedQuery<model::SearchQuery>,
) -> Result<success::Success<model::SearchResults<model::UserResponse>>, error::Error> {
    let results = user_service.search_users_unpaginated(&query.0.q).await?;
    Ok(success::Success::ok(Some(results)))
}

#[get("/users")]
pub async fn list_users(
    user_service: web::Data<UserService>,
) -> Result<success::Success<Vec<model::UserListItem>>, error::Error> {
    let users = user_service.list_users().await?;
    Ok(success::Success::ok(Some(users)))
}
