use crate::auth::auth::AuthUser;
use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::error::ApiError;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};

/// Bearer gate for the protected scope. On success the verified identity is
/// stashed in the request extensions; handlers take it via the `AuthUser`
/// extractor.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?;

    let header_value = match req.headers().get("Authorization") {
        Some(h) => h
            .to_str()
            .map_err(|_| ApiError::auth("Invalid Authorization header encoding."))?,
        None => return Err(ApiError::auth("No token provided.").into()),
    };

    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::auth("Authorization header must start with Bearer."))?;

    let claims =
        verify_token(token, &config.jwt_secret).map_err(|_| ApiError::auth("Invalid token."))?;

    let auth_user = AuthUser {
        user_id: claims.user_id,
        email: claims.sub,
    };

    req.extensions_mut().insert(auth_user);

    next.call(req).await
}
