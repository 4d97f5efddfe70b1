pub mod auth;
pub mod error;
pub mod messages;
pub mod middleware;
pub mod users;

use std::sync::Arc;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tracing::error;

use missive_directory::UserDirectory;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub directory: UserDirectory,
    pub jwt_secret: String,
}

/// All routes. Everything except `/auth/*` requires a bearer token.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    let protected_routes = Router::new()
        .route("/users", get(users::list_users))
        .route("/users/{username}", get(users::get_user))
        .route("/users/{username}/to", get(users::messages_to))
        .route("/users/{username}/from", get(users::messages_from))
        .route("/messages/{id}", get(messages::get_message))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

/// Run a directory call off the async runtime; every directory operation
/// touches SQLite and some hash passwords.
pub(crate) async fn run_blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&UserDirectory) -> missive_directory::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let directory = state.directory.clone();
    tokio::task::spawn_blocking(move || f(&directory))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::internal()
        })?
        .map_err(ApiError::from)
}
