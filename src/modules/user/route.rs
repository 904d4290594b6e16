use crate::modules::user::handle::*;
use actix_web::web::ServiceConfig;

pub fn public_api_configure(cfg: &mut ServiceConfig) {
    cfg.service(register).service(login).service(obtain_token_pair).service(refresh_token);
}

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(logout)
        .service(get_profile)
        .service(search_users_unpaginated)
        .service(search_users)
        .service(list_users);
}
