use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web, Error, HttpMessage, HttpRequest,
};

use crate::{
    api::error,
    configs::JwtConfig,
    utils::{Claims, TokenType},
};

pub async fn authentication<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<B>, Error>
where
    B: MessageBody + 'static,
{
    let auth = req.headers().get("Authorization").and_then(|h| h.to_str().ok());
    let token = match auth.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(t) => t,
        None => {
            return Err(error::Error::unauthorized(
                "Authentication credentials were not provided.",
            )
            .into());
        }
    };

    let config = req.app_data::<web::Data<JwtConfig>>().ok_or_else(|| {
        log::error!("JwtConfig is not registered as app data");
        error::Error::InternalServer
    })?;

    let claims = Claims::decode(token, config.secret.as_bytes())
        .ok()
        .filter(|c| c.token_type == TokenType::Access)
        .ok_or_else(|| error::Error::unauthorized("Token Invalid or Expired"))?;

    req.extensions_mut().insert(claims);

    next.call(req).await
}

pub fn get_claims(req: &HttpRequest) -> Result<Claims, error::Error> {
    let extensions = req.extensions();

    let claims = extensions
        .get::<Claims>()
        .ok_or_else(|| error::Error::unauthorized("Unauthorized"))?
        .clone();

    Ok(claims)
}
