//! Row mapping from PostgreSQL rows to record types.
//!
//! Columns are read by name; no derive-based mapping.

use ecodnp_core::{ForumPost, LoginInstance, Person, Relationship};
use sqlx::{Row as _, postgres::PgRow};

use crate::Result;

// ─── Column lists ────────────────────────────────────────────────────────────

pub const PERSON_COLUMNS: &str = r#""user_id", "username", "password", "score", "email",
  "is_forum_contributor", "createdAt", "updatedAt""#;

pub const LOGIN_COLUMNS: &str = r#""login_id", "user_id", "createdAt", "updatedAt""#;

pub const RELATIONSHIP_COLUMNS: &str =
  r#""relationship_id", "first_user_id", "second_user_id", "createdAt", "updatedAt""#;

pub const POST_COLUMNS: &str =
  r#""post_id", "creator_id", "content", "title", "createdAt", "updatedAt""#;

// ─── Rows ────────────────────────────────────────────────────────────────────

pub fn person(row: &PgRow) -> Result<Person> {
  Ok(Person {
    user_id:              row.try_get("user_id")?,
    username:             row.try_get("username")?,
    password:             row.try_get("password")?,
    score:                row.try_get("score")?,
    email:                row.try_get("email")?,
    is_forum_contributor: row.try_get("is_forum_contributor")?,
    created_at:           row.try_get("createdAt")?,
    updated_at:           row.try_get("updatedAt")?,
  })
}

pub fn login(row: &PgRow) -> Result<LoginInstance> {
  Ok(LoginInstance {
    login_id:   row.try_get("login_id")?,
    user_id:    row.try_get("user_id")?,
    created_at: row.try_get("createdAt")?,
    updated_at: row.try_get("updatedAt")?,
  })
}

pub fn relationship(row: &PgRow) -> Result<Relationship> {
  Ok(Relationship {
    relationship_id: row.try_get("relationship_id")?,
    first_user_id:   row.try_get("first_user_id")?,
    second_user_id:  row.try_get("second_user_id")?,
    created_at:      row.try_get("createdAt")?,
    updated_at:      row.try_get("updatedAt")?,
  })
}

pub fn post(row: &PgRow) -> Result<ForumPost> {
  Ok(ForumPost {
    post_id:    row.try_get("post_id")?,
    creator_id: row.try_get("creator_id")?,
    content:    row.try_get("content")?,
    title:      row.try_get("title")?,
    created_at: row.try_get("createdAt")?,
    updated_at: row.try_get("updatedAt")?,
  })
}
