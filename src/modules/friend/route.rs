use crate::modules::friend::handle::*;
use actix_web::web::ServiceConfig;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(send_friend_request)
        .service(respond_friend_request)
        .service(list_friends)
        .service(list_pending_requests)
        .service(list_pending_friend_requests);
}
