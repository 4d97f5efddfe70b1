//! Database row types. These map directly to SQLite result rows and stay
//! independent of the missive-types models; the directory reshapes them.

use chrono::{DateTime, Utc};

/// Values for a new `users` row. `password` is already a digest.
pub struct NewUserRow<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: &'a str,
    pub joined_at: DateTime<Utc>,
}

/// Public columns of a user, as selected for listings and joins.
#[derive(Debug, Clone)]
pub struct ProfileRow {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// A user row minus the password column.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub joined_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

/// A message joined with the profile of the party on the other side.
#[derive(Debug, Clone)]
pub struct ThreadRow {
    pub id: i64,
    pub counterpart: ProfileRow,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

/// A message joined with both sender and recipient profiles.
#[derive(Debug, Clone)]
pub struct MessageRow {
    pub id: i64,
    pub from_user: ProfileRow,
    pub to_user: ProfileRow,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}
