use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};

use missive_types::api::{
    Claims, MessagesResponse, ReceivedMessage, SentMessage, UserResponse, UsersResponse,
};

use crate::error::ApiError;
use crate::middleware::ensure_correct_user;
use crate::{AppState, run_blocking};

/// Any logged-in user may list the directory.
pub async fn list_users(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let users = run_blocking(&state, |dir| dir.list_all()).await?;
    Ok(Json(UsersResponse { users }))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_correct_user(&claims, &username)?;

    let user = run_blocking(&state, move |dir| dir.get(&username)).await?;
    Ok(Json(UserResponse { user }))
}

/// Messages sent to `username`.
pub async fn messages_to(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_correct_user(&claims, &username)?;

    let thread = run_blocking(&state, move |dir| dir.messages_received(&username)).await?;
    let messages = thread.into_iter().map(ReceivedMessage::from).collect();
    Ok(Json(MessagesResponse { messages }))
}

/// Messages sent from `username`.
pub async fn messages_from(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_correct_user(&claims, &username)?;

    let thread = run_blocking(&state, move |dir| dir.messages_sent(&username)).await?;
    let messages = thread.into_iter().map(SentMessage::from).collect();
    Ok(Json(MessagesResponse { messages }))
}
