use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::warn;

use missive_types::api::{Claims, MessageResponse};

use crate::error::ApiError;
use crate::{AppState, run_blocking};

/// A single message, visible only to its sender and recipient.
pub async fn get_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let message = run_blocking(&state, move |dir| dir.message(id)).await?;

    if !message.involves(&claims.sub) {
        warn!(username = %claims.sub, message_id = id, "Message read by non-participant refused");
        return Err(ApiError::forbidden("not a participant in this message"));
    }

    Ok(Json(MessageResponse { message }))
}
