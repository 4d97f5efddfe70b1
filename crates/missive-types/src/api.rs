use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{MessageDetail, ThreadMessage, UserDetail, UserSummary};

// -- JWT Claims --

/// Token claims issued on login/registration and checked by the auth middleware.
/// `sub` is the username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

// -- Users --

#[derive(Debug, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<UserSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: UserDetail,
}

// -- Messages --

/// A message the subject sent, as listed under `/users/{username}/from`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SentMessage {
    pub id: i64,
    pub to_user: UserSummary,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl From<ThreadMessage> for SentMessage {
    fn from(m: ThreadMessage) -> Self {
        Self {
            id: m.id,
            to_user: m.counterpart,
            body: m.body,
            sent_at: m.sent_at,
            read_at: m.read_at,
        }
    }
}

/// A message the subject received, as listed under `/users/{username}/to`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReceivedMessage {
    pub id: i64,
    pub from_user: UserSummary,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl From<ThreadMessage> for ReceivedMessage {
    fn from(m: ThreadMessage) -> Self {
        Self {
            id: m.id,
            from_user: m.counterpart,
            body: m.body,
            sent_at: m.sent_at,
            read_at: m.read_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessagesResponse<T> {
    pub messages: Vec<T>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: MessageDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
