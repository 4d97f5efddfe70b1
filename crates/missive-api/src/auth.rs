use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::{info, warn};

use missive_directory::DirectoryError;
use missive_types::api::{Claims, LoginRequest, RegisterRequest, TokenResponse};

use crate::error::ApiError;
use crate::{AppState, run_blocking};

const TOKEN_LIFETIME_DAYS: i64 = 30;

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.username.is_empty() {
        return Err(ApiError::bad_request("username must not be empty"));
    }

    // Check first so a taken username is a 409 rather than a store error.
    // A concurrent registration can still win between the check and the
    // insert; its primary key violation is also reported as taken.
    let created = run_blocking(&state, move |dir| {
        match dir.get(&req.username) {
            Ok(_) => return Ok(None),
            Err(DirectoryError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }
        match dir.register(
            &req.username,
            &req.password,
            &req.first_name,
            &req.last_name,
            &req.phone,
        ) {
            Ok(user) => Ok(Some(user)),
            Err(e) if is_duplicate_username(&e) => Ok(None),
            Err(e) => Err(e),
        }
    })
    .await?;

    let Some(user) = created else {
        return Err(ApiError::conflict("username already taken"));
    };

    let token = create_token(&state.jwt_secret, &user.username)?;
    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = req.username.clone();

    let authenticated = run_blocking(&state, move |dir| {
        if !dir.authenticate(&req.username, &req.password)? {
            return Ok(false);
        }
        dir.record_login(&req.username)?;
        Ok(true)
    })
    .await?;

    if !authenticated {
        warn!(username = %username, "Failed login");
        return Err(ApiError::unauthorized("invalid username/password"));
    }

    info!(username = %username, "User logged in");
    let token = create_token(&state.jwt_secret, &username)?;
    Ok(Json(TokenResponse { token }))
}

/// True when the store rejected a user insert because the username
/// (the users primary key) already exists.
fn is_duplicate_username(err: &DirectoryError) -> bool {
    let DirectoryError::Store(e) = err else {
        return false;
    };
    matches!(
        e.downcast_ref::<rusqlite::Error>(),
        Some(rusqlite::Error::SqliteFailure(f, _))
            if f.code == rusqlite::ErrorCode::ConstraintViolation
                && f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

pub fn create_token(secret: &str, username: &str) -> anyhow::Result<String> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: username.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + chrono::Duration::days(TOKEN_LIFETIME_DAYS)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
