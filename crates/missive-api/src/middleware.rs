use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};

use missive_types::api::Claims;

use crate::AppState;
use crate::error::ApiError;

/// Extract and validate the JWT from the Authorization header, then make the
/// claims available to handlers as an `Extension<Claims>`.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::unauthorized("missing bearer token"))?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::unauthorized("invalid token"))?;

    req.extensions_mut().insert(token_data.claims);
    Ok(next.run(req).await)
}

/// Only the user named in the path may see their own profile and threads.
pub fn ensure_correct_user(claims: &Claims, username: &str) -> Result<(), ApiError> {
    if claims.sub != username {
        return Err(ApiError::forbidden("not permitted for this user"));
    }
    Ok(())
}
