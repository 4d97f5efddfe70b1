use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public profile fields of a user. This is the shape used for directory
/// listings and for the counterpart side of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// Full profile of a single user, including login bookkeeping.
/// Never carries credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetail {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub joined_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

/// A freshly created account as returned to the account-creation flow.
///
/// The digest rides along so the creating caller can inspect what was stored,
/// but it is skipped on serialization and redacted from `Debug` output.
#[derive(Clone, Serialize)]
pub struct RegisteredUser {
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub joined_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

impl fmt::Debug for RegisteredUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredUser")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("phone", &self.phone)
            .field("joined_at", &self.joined_at)
            .field("last_login_at", &self.last_login_at)
            .finish()
    }
}

/// One message in a user's sent or received thread.
/// `counterpart` is the recipient for sent messages and the sender for received ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub id: i64,
    pub counterpart: UserSummary,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

/// A single message with both parties resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDetail {
    pub id: i64,
    pub from_user: UserSummary,
    pub to_user: UserSummary,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl MessageDetail {
    /// True when `username` is the sender or the recipient.
    pub fn involves(&self, username: &str) -> bool {
        self.from_user.username == username || self.to_user.username == username
    }
}
