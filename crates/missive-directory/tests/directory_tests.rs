//! Directory behavior against a real SQLite file.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use missive_db::Database;
use missive_directory::{Credentials, DirectoryError, HashConfig, UserDirectory};
use tempfile::TempDir;

fn test_directory() -> (UserDirectory, Arc<Database>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db = Arc::new(Database::open(&temp_dir.path().join("directory_test.db")).unwrap());
    let credentials = Credentials::new(HashConfig {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    })
    .unwrap();
    (UserDirectory::new(db.clone(), credentials), db, temp_dir)
}

fn register(dir: &UserDirectory, username: &str, first: &str, last: &str) {
    dir.register(username, "password123", first, last, "555-0100").unwrap();
}

/// Messages are created elsewhere; tests write the rows directly.
fn send(db: &Database, from: &str, to: &str, body: &str) -> i64 {
    db.with_conn_mut(|conn| {
        conn.execute(
            "INSERT INTO messages (from_username, to_username, body, sent_at) VALUES (?1, ?2, ?3, ?4)",
            (from, to, body, Utc::now()),
        )?;
        Ok(conn.last_insert_rowid())
    })
    .unwrap()
}

#[test]
fn register_then_get_returns_profile() {
    let (dir, _db, _tmp) = test_directory();

    let created = dir
        .register("ada", "analytical", "Ada", "Lovelace", "+44 20 7946 0000")
        .unwrap();
    assert_ne!(created.password_hash, "analytical");
    assert!(created.password_hash.starts_with("$argon2id$"));
    assert_eq!(created.joined_at, created.last_login_at);

    let user = dir.get("ada").unwrap();
    assert_eq!(user.username, "ada");
    assert_eq!(user.first_name, "Ada");
    assert_eq!(user.last_name, "Lovelace");
    assert_eq!(user.phone, "+44 20 7946 0000");
    assert_eq!(user.joined_at, created.joined_at);
    assert_eq!(user.last_login_at, user.joined_at);
}

#[test]
fn register_rejects_empty_password() {
    let (dir, _db, _tmp) = test_directory();
    let result = dir.register("ada", "", "Ada", "Lovelace", "");
    assert!(matches!(result, Err(DirectoryError::InvalidInput(_))));
    assert!(matches!(dir.get("ada"), Err(DirectoryError::NotFound(_))));
}

#[test]
fn duplicate_registration_is_a_store_failure() {
    let (dir, _db, _tmp) = test_directory();
    register(&dir, "ada", "Ada", "Lovelace");

    let result = dir.register("ada", "other", "A", "L", "");
    assert!(matches!(result, Err(DirectoryError::Store(_))));
}

#[test]
fn authenticate_outcomes() {
    let (dir, _db, _tmp) = test_directory();
    register(&dir, "ada", "Ada", "Lovelace");

    assert!(dir.authenticate("ada", "password123").unwrap());
    assert!(!dir.authenticate("ada", "wrong").unwrap());
    assert!(!dir.authenticate("nobody", "password123").unwrap());
}

#[test]
fn record_login_moves_timestamp_forward() {
    let (dir, _db, _tmp) = test_directory();
    register(&dir, "ada", "Ada", "Lovelace");
    let before = dir.get("ada").unwrap();

    thread::sleep(Duration::from_millis(5));
    dir.record_login("ada").unwrap();

    let after = dir.get("ada").unwrap();
    assert!(after.last_login_at > before.last_login_at);
    assert_eq!(after.joined_at, before.joined_at);
}

#[test]
fn record_login_for_unknown_user_is_invariant_violation() {
    let (dir, _db, _tmp) = test_directory();
    let result = dir.record_login("ghost");
    assert!(matches!(result, Err(DirectoryError::InvariantViolation(_))));
}

#[test]
fn list_all_empty_then_ordered() {
    let (dir, _db, _tmp) = test_directory();
    assert!(dir.list_all().unwrap().is_empty());

    register(&dir, "turing", "Alan", "Turing");
    register(&dir, "grace", "Grace", "Hopper");
    register(&dir, "ada", "Ada", "Lovelace");
    register(&dir, "bhopper", "Barbara", "Hopper");

    let users = dir.list_all().unwrap();
    assert_eq!(users.len(), 4);
    let order: Vec<(&str, &str)> = users
        .iter()
        .map(|u| (u.last_name.as_str(), u.first_name.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("Hopper", "Barbara"),
            ("Hopper", "Grace"),
            ("Lovelace", "Ada"),
            ("Turing", "Alan"),
        ]
    );
}

#[test]
fn get_unknown_user_is_not_found() {
    let (dir, _db, _tmp) = test_directory();
    assert!(matches!(dir.get("doesNotExist"), Err(DirectoryError::NotFound(_))));
}

#[test]
fn messages_sent_resolves_each_recipient() {
    let (dir, db, _tmp) = test_directory();
    register(&dir, "a", "Alice", "Adams");
    register(&dir, "b", "Bob", "Brown");
    register(&dir, "c", "Cara", "Cole");

    let to_b = send(&db, "a", "b", "hi bob");
    let to_c = send(&db, "a", "c", "hi cara");

    let sent = dir.messages_sent("a").unwrap();
    assert_eq!(sent.len(), 2);

    let bob = sent.iter().find(|m| m.id == to_b).unwrap();
    assert_eq!(bob.counterpart, dir.list_all().unwrap()[1]);
    assert_eq!(bob.counterpart.username, "b");
    assert_eq!(bob.body, "hi bob");

    let cara = sent.iter().find(|m| m.id == to_c).unwrap();
    assert_eq!(cara.counterpart.username, "c");
    assert_eq!(cara.counterpart.last_name, "Cole");
}

#[test]
fn empty_threads_are_not_found() {
    let (dir, _db, _tmp) = test_directory();
    register(&dir, "quiet", "Quinn", "Quiet");

    assert!(matches!(dir.messages_sent("quiet"), Err(DirectoryError::NotFound(_))));
    assert!(matches!(dir.messages_received("quiet"), Err(DirectoryError::NotFound(_))));
    assert!(matches!(dir.messages_sent("nobody"), Err(DirectoryError::NotFound(_))));
}

#[test]
fn received_mirrors_sent() {
    let (dir, db, _tmp) = test_directory();
    register(&dir, "a", "Alice", "Adams");
    register(&dir, "b", "Bob", "Brown");

    let id = send(&db, "a", "b", "mirror");

    let sent = dir.messages_sent("a").unwrap();
    let received = dir.messages_received("b").unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(received.len(), 1);

    assert_eq!(sent[0].id, id);
    assert_eq!(received[0].id, id);
    assert_eq!(sent[0].body, received[0].body);
    assert_eq!(sent[0].sent_at, received[0].sent_at);
    assert_eq!(sent[0].counterpart.username, "b");
    assert_eq!(received[0].counterpart.username, "a");

    // b never sent anything and a never received anything
    assert!(matches!(dir.messages_sent("b"), Err(DirectoryError::NotFound(_))));
    assert!(matches!(dir.messages_received("a"), Err(DirectoryError::NotFound(_))));
}

#[test]
fn thread_is_oldest_first() {
    let (dir, db, _tmp) = test_directory();
    register(&dir, "a", "Alice", "Adams");
    register(&dir, "b", "Bob", "Brown");

    let first = send(&db, "a", "b", "one");
    thread::sleep(Duration::from_millis(2));
    let second = send(&db, "a", "b", "two");

    let ids: Vec<i64> = dir.messages_sent("a").unwrap().iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![first, second]);
}

#[test]
fn message_lookup_by_id() {
    let (dir, db, _tmp) = test_directory();
    register(&dir, "a", "Alice", "Adams");
    register(&dir, "b", "Bob", "Brown");
    let id = send(&db, "a", "b", "detail");

    let msg = dir.message(id).unwrap();
    assert_eq!(msg.from_user.username, "a");
    assert_eq!(msg.to_user.username, "b");
    assert_eq!(msg.body, "detail");
    assert!(msg.read_at.is_none());

    assert!(matches!(dir.message(id + 1), Err(DirectoryError::NotFound(_))));
}
