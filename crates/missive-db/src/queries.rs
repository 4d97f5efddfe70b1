use crate::Database;
use crate::models::{MessageRow, NewUserRow, ProfileRow, ThreadRow, UserRow};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row};

/// Which side of a message the subject user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Subject is the sender; the counterpart is the recipient.
    Sent,
    /// Subject is the recipient; the counterpart is the sender.
    Received,
}

impl Direction {
    fn subject_column(self) -> &'static str {
        match self {
            Direction::Sent => "from_username",
            Direction::Received => "to_username",
        }
    }

    fn counterpart_column(self) -> &'static str {
        match self {
            Direction::Sent => "to_username",
            Direction::Received => "from_username",
        }
    }
}

impl Database {
    // -- Users --

    pub fn insert_user(&self, user: &NewUserRow<'_>) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO users (username, password, first_name, last_name, phone, joined_at, last_login_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                rusqlite::params![
                    user.username,
                    user.password,
                    user.first_name,
                    user.last_name,
                    user.phone,
                    user.joined_at,
                ],
            )?;
            Ok(())
        })
    }

    /// Stored digest for `username`, if the user exists.
    pub fn get_password_hash(&self, username: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            let hash = conn
                .query_row(
                    "SELECT password FROM users WHERE username = ?1",
                    [username],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(hash)
        })
    }

    /// Returns the number of rows touched (0 when the user does not exist).
    pub fn update_last_login(&self, username: &str, at: DateTime<Utc>) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE users SET last_login_at = ?1 WHERE username = ?2",
                rusqlite::params![at, username],
            )?;
            Ok(changed)
        })
    }

    /// All users ordered by last name, then first name. SQLite's default
    /// BINARY collation makes this a byte-wise, locale independent ordering.
    pub fn list_users(&self) -> Result<Vec<ProfileRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT username, first_name, last_name, phone
                 FROM users
                 ORDER BY last_name, first_name, username",
            )?;

            let rows = stmt
                .query_map([], |row| profile_at(row, 0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn get_user(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, username))
    }

    // -- Messages --

    /// Messages on one side of `username`'s inbox, each joined with the
    /// other party's profile, oldest first.
    pub fn get_thread(&self, username: &str, direction: Direction) -> Result<Vec<ThreadRow>> {
        self.with_conn(|conn| query_thread(conn, username, direction))
    }

    pub fn get_message(&self, id: i64) -> Result<Option<MessageRow>> {
        self.with_conn(|conn| query_message(conn, id))
    }
}

fn query_user(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT username, first_name, last_name, phone, joined_at, last_login_at
         FROM users WHERE username = ?1",
    )?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                username: row.get(0)?,
                first_name: row.get(1)?,
                last_name: row.get(2)?,
                phone: row.get(3)?,
                joined_at: row.get(4)?,
                last_login_at: row.get(5)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_thread(conn: &Connection, username: &str, direction: Direction) -> Result<Vec<ThreadRow>> {
    // Column names come from `Direction`, never from the caller.
    let sql = format!(
        "SELECT m.id, u.username, u.first_name, u.last_name, u.phone, m.body, m.sent_at, m.read_at
         FROM messages m
         JOIN users u ON u.username = m.{counterpart}
         WHERE m.{subject} = ?1
         ORDER BY m.sent_at, m.id",
        counterpart = direction.counterpart_column(),
        subject = direction.subject_column(),
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([username], |row| {
            Ok(ThreadRow {
                id: row.get(0)?,
                counterpart: profile_at(row, 1)?,
                body: row.get(5)?,
                sent_at: row.get(6)?,
                read_at: row.get(7)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_message(conn: &Connection, id: i64) -> Result<Option<MessageRow>> {
    let mut stmt = conn.prepare(
        "SELECT m.id,
                f.username, f.first_name, f.last_name, f.phone,
                t.username, t.first_name, t.last_name, t.phone,
                m.body, m.sent_at, m.read_at
         FROM messages m
         JOIN users f ON f.username = m.from_username
         JOIN users t ON t.username = m.to_username
         WHERE m.id = ?1",
    )?;

    let row = stmt
        .query_row([id], |row| {
            Ok(MessageRow {
                id: row.get(0)?,
                from_user: profile_at(row, 1)?,
                to_user: profile_at(row, 5)?,
                body: row.get(9)?,
                sent_at: row.get(10)?,
                read_at: row.get(11)?,
            })
        })
        .optional()?;

    Ok(row)
}

/// Read four consecutive profile columns starting at `start`.
fn profile_at(row: &Row<'_>, start: usize) -> rusqlite::Result<ProfileRow> {
    Ok(ProfileRow {
        username: row.get(start)?,
        first_name: row.get(start + 1)?,
        last_name: row.get(start + 2)?,
        phone: row.get(start + 3)?,
    })
}
