use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info};

use missive_db::models::{MessageRow, NewUserRow, ProfileRow, ThreadRow, UserRow};
use missive_db::{Database, Direction};
use missive_types::models::{MessageDetail, RegisteredUser, ThreadMessage, UserDetail, UserSummary};

use crate::credentials::Credentials;
use crate::error::{DirectoryError, Result};

/// Handle over the store plus the credential configuration. Cheap to clone;
/// holds no per-call state.
#[derive(Clone)]
pub struct UserDirectory {
    db: Arc<Database>,
    credentials: Credentials,
}

impl UserDirectory {
    pub fn new(db: Arc<Database>, credentials: Credentials) -> Self {
        Self { db, credentials }
    }

    // -- Credentials --

    /// Create an account. A taken username surfaces as a store error from the
    /// unique constraint; callers wanting a friendlier answer check first.
    pub fn register(
        &self,
        username: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
        phone: &str,
    ) -> Result<RegisteredUser> {
        if password.is_empty() {
            return Err(DirectoryError::InvalidInput("password must not be empty"));
        }

        let password_hash = self.credentials.hash(password)?;
        let now = Utc::now();

        self.db.insert_user(&NewUserRow {
            username,
            password: &password_hash,
            first_name,
            last_name,
            phone,
            joined_at: now,
        })?;

        info!(username, "Registered user");
        Ok(RegisteredUser {
            username: username.to_string(),
            password_hash,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            phone: phone.to_string(),
            joined_at: now,
            last_login_at: now,
        })
    }

    /// `false` for both an unknown username and a wrong password, so the
    /// answer never reveals whether an account exists.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<bool> {
        let Some(digest) = self.db.get_password_hash(username)? else {
            debug!(username, "Authentication for unknown user");
            return Ok(false);
        };

        self.credentials.verify(password, &digest)
    }

    /// Stamp `last_login_at` with the current time. The caller must already
    /// have authenticated `username`; a missing row is an invariant violation.
    pub fn record_login(&self, username: &str) -> Result<()> {
        let changed = self.db.update_last_login(username, Utc::now())?;
        if changed == 0 {
            error!(username, "Login recorded for a user that does not exist");
            return Err(DirectoryError::InvariantViolation(format!(
                "login recorded for unknown user '{username}'"
            )));
        }
        Ok(())
    }

    // -- Lookups --

    pub fn list_all(&self) -> Result<Vec<UserSummary>> {
        let rows = self.db.list_users()?;
        Ok(rows.into_iter().map(summary).collect())
    }

    pub fn get(&self, username: &str) -> Result<UserDetail> {
        self.db
            .get_user(username)?
            .map(detail)
            .ok_or_else(|| DirectoryError::NotFound(format!("user '{username}'")))
    }

    // -- Messages --

    pub fn messages_sent(&self, username: &str) -> Result<Vec<ThreadMessage>> {
        self.thread(username, Direction::Sent)
    }

    pub fn messages_received(&self, username: &str) -> Result<Vec<ThreadMessage>> {
        self.thread(username, Direction::Received)
    }

    pub fn message(&self, id: i64) -> Result<MessageDetail> {
        self.db
            .get_message(id)?
            .map(message_detail)
            .ok_or_else(|| DirectoryError::NotFound(format!("message {id}")))
    }

    /// An empty thread is reported as NotFound rather than an empty list,
    /// so a user with no traffic in `direction` looks the same as an unknown one.
    fn thread(&self, username: &str, direction: Direction) -> Result<Vec<ThreadMessage>> {
        let rows = self.db.get_thread(username, direction)?;
        debug!(username, ?direction, count = rows.len(), "Loaded message thread");

        if rows.is_empty() {
            let side = match direction {
                Direction::Sent => "sent by",
                Direction::Received => "received by",
            };
            return Err(DirectoryError::NotFound(format!("messages {side} '{username}'")));
        }

        Ok(rows.into_iter().map(thread_message).collect())
    }
}

fn summary(row: ProfileRow) -> UserSummary {
    UserSummary {
        username: row.username,
        first_name: row.first_name,
        last_name: row.last_name,
        phone: row.phone,
    }
}

fn detail(row: UserRow) -> UserDetail {
    UserDetail {
        username: row.username,
        first_name: row.first_name,
        last_name: row.last_name,
        phone: row.phone,
        joined_at: row.joined_at,
        last_login_at: row.last_login_at,
    }
}

fn thread_message(row: ThreadRow) -> ThreadMessage {
    ThreadMessage {
        id: row.id,
        counterpart: summary(row.counterpart),
        body: row.body,
        sent_at: row.sent_at,
        read_at: row.read_at,
    }
}

fn message_detail(row: MessageRow) -> MessageDetail {
    MessageDetail {
        id: row.id,
        from_user: summary(row.from_user),
        to_user: summary(row.to_user),
        body: row.body,
        sent_at: row.sent_at,
        read_at: row.read_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn profile(name: &str) -> ProfileRow {
        ProfileRow {
            username: name.into(),
            first_name: format!("{name}-first"),
            last_name: format!("{name}-last"),
            phone: "555".into(),
        }
    }

    #[test]
    fn thread_row_reshapes_counterpart() {
        let sent_at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
        let msg = thread_message(ThreadRow {
            id: 7,
            counterpart: profile("b"),
            body: "hey".into(),
            sent_at,
            read_at: None,
        });

        assert_eq!(msg.id, 7);
        assert_eq!(msg.counterpart.username, "b");
        assert_eq!(msg.counterpart.first_name, "b-first");
        assert_eq!(msg.sent_at, sent_at);
        assert!(msg.read_at.is_none());
    }

    #[test]
    fn message_row_keeps_sides_apart() {
        let now = Utc::now();
        let msg = message_detail(MessageRow {
            id: 1,
            from_user: profile("a"),
            to_user: profile("b"),
            body: "x".into(),
            sent_at: now,
            read_at: Some(now),
        });

        assert_eq!(msg.from_user.username, "a");
        assert_eq!(msg.to_user.username, "b");
        assert_eq!(msg.read_at, Some(now));
    }
}
