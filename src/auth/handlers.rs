use crate::{
    auth::{
        jwt::generate_token,
        password::{hash_password, verify_password},
    },
    config::Config,
    error::ApiError,
    models::{LoginReq, LoginResponse, SignupReq, UserSql},
};
use actix_web::{HttpResponse, web};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{debug, error, info, instrument};

async fn insert_user(
    name: &str,
    email: &str,
    password: &str,
    pool: &SqlitePool,
) -> Result<(), ApiError> {
    let hashed = hash_password(password).map_err(|e| {
        error!(error = %e, "Password hashing failed");
        ApiError::Storage("Failed to register user.".to_string())
    })?;

    let result = sqlx::query(
        r#"INSERT INTO users (name, email, password_hash) VALUES (?, ?, ?)"#,
    )
    .bind(name)
    .bind(email)
    .bind(hashed)
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(()),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return Err(ApiError::conflict("User with this email already exists."));
                }
            }
            Err(ApiError::storage("Failed to register user.", e))
        }
    }
}

/// User signup handler
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupReq,
    responses(
        (status = 201, description = "User created", body = Object, example = json!({
            "message": "User created successfully."
        })),
        (status = 400, description = "Missing field or duplicate email"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn signup(
    body: web::Json<SignupReq>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let name = body.name.trim();
    let email = body.email.trim().to_lowercase();

    if name.is_empty() || email.is_empty() || body.password.is_empty() {
        return Err(ApiError::validation("All fields are required."));
    }

    insert_user(name, &email, &body.password, pool.get_ref()).await?;

    info!(email = %email, "User registered");

    Ok(HttpResponse::Created().json(json!({
        "message": "User created successfully."
    })))
}

/// User login handler
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Bad credentials"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(pool, config, body), fields(email = %body.email))]
pub async fn login(
    body: web::Json<LoginReq>,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    info!("Login request received");

    if body.email.trim().is_empty() || body.password.is_empty() {
        info!("Validation failed: empty email or password");
        return Err(ApiError::validation("Email and password are required."));
    }

    debug!("Fetching user from database");

    let db_user = match sqlx::query_as::<_, UserSql>(
        r#"
        SELECT id, name, email, password_hash
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(body.email.trim().to_lowercase())
    .fetch_optional(pool.get_ref())
    .await
    {
        Ok(Some(user)) => {
            debug!(user_id = user.id, "User found");
            user
        }
        Ok(None) => {
            info!("Invalid credentials: user not found");
            return Err(ApiError::validation("Invalid email or password."));
        }
        Err(e) => {
            return Err(ApiError::storage("Failed to log in.", e));
        }
    };

    debug!("Verifying password");

    if verify_password(&body.password, &db_user.password_hash).is_err() {
        info!("Invalid credentials: password mismatch");
        return Err(ApiError::validation("Invalid email or password."));
    }

    debug!("Generating token");

    let token = generate_token(
        db_user.id,
        db_user.email,
        &config.jwt_secret,
        config.token_ttl,
    )
    .map_err(|e| {
        error!(error = %e, "Token generation failed");
        ApiError::Storage("Failed to log in.".to_string())
    })?;

    info!("Login successful");

    Ok(HttpResponse::Ok().json(LoginResponse { token }))
}
