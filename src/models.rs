use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct SignupReq {
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane@example.com", format = "email")]
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReq {
    #[schema(example = "jane@example.com", format = "email")]
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(FromRow)]
pub struct UserSql {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    /// Email of the authenticated user.
    pub sub: String,
    pub exp: usize,
    pub jti: String,
}
