use actix_cors::Cors;
use actix_web::{
    self, App, HttpServer,
    middleware::{Logger, from_fn},
    web,
};
use std::sync::{Arc, LazyLock};

use crate::{
    api::error,
    configs::{JwtConfig, RedisCache, connect_database},
    middlewares::authentication,
    modules::{
        friend::{repository_pg::FriendRequestRepositoryPg, service::FriendService},
        user::{repository_pg::UserRepositoryPg, service::UserService},
    },
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
#[cfg(test)]
mod test;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check(db_pool: web::Data<sqlx::PgPool>) -> Result<&'static str, error::Error> {
    sqlx::query("SELECT 1").execute(db_pool.get_ref()).await.map_err(|e| {
        log::error!("Health check failed: {e:?}");
        error::Error::InternalServer
    })?;
    Ok("Server is running")
}

/// Public auth routes first; everything else under `/api` requires a bearer access token.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api").configure(modules::user::route::public_api_configure).service(
            web::scope("")
                .wrap(from_fn(authentication))
                .configure(modules::user::route::configure)
                .configure(modules::friend::route::configure),
        ),
    );
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let db_pool =
        connect_database().await.map_err(|_| std::io::Error::other("Database connection error"))?;

    let redis_pool =
        RedisCache::new().await.map_err(|_| std::io::Error::other("Redis connection error"))?;

    let jwt_config = JwtConfig::from_env();
    let user_repo = Arc::new(UserRepositoryPg::new(db_pool.clone()));
    let friend_repo = Arc::new(FriendRequestRepositoryPg::new(db_pool.clone()));

    let user_service =
        UserService::with_dependencies(user_repo.clone(), Arc::new(redis_pool), jwt_config.clone());
    let friend_service = FriendService::with_dependencies(friend_repo, user_repo);

    log::info!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(ENV.frontend_url.as_str())
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(friend_service.clone()))
            .app_data(web::Data::new(jwt_config.clone()))
            .app_data(web::Data::new(db_pool.clone()))
            .service(health_check)
            .configure(configure_api)
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}
