//! Encoding and decoding helpers between record types and the plain values
//! stored in SQLite columns.
//!
//! Timestamps are written as `YYYY-MM-DD HH:MM:SS.mmm +00:00`, the format
//! existing ecodnp database files already contain. Reads also accept RFC 3339.
//! Booleans are `0`/`1` integers.

use chrono::{DateTime, Utc};
use ecodnp_core::{ForumPost, LoginInstance, Person, Relationship};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

const DT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f %:z";

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.format(DT_FORMAT).to_string() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f %:z")
    .or_else(|_| DateTime::parse_from_rfc3339(s))
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Column lists ────────────────────────────────────────────────────────────

pub const PERSON_COLUMNS: &str = r#""user_id", "username", "password", "score", "email",
  "is_forum_contributor", "createdAt", "updatedAt""#;

pub const LOGIN_COLUMNS: &str = r#""login_id", "user_id", "createdAt", "updatedAt""#;

pub const RELATIONSHIP_COLUMNS: &str =
  r#""relationship_id", "first_user_id", "second_user_id", "createdAt", "updatedAt""#;

pub const POST_COLUMNS: &str =
  r#""post_id", "creator_id", "content", "title", "createdAt", "updatedAt""#;

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `People` row.
pub struct RawPerson {
  pub user_id:              i32,
  pub username:             String,
  pub password:             String,
  pub score:                i32,
  pub email:                String,
  pub is_forum_contributor: bool,
  pub created_at:           String,
  pub updated_at:           String,
}

impl RawPerson {
  /// Row mapper for a `SELECT` of [`PERSON_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:              row.get(0)?,
      username:             row.get(1)?,
      password:             row.get(2)?,
      score:                row.get(3)?,
      email:                row.get(4)?,
      is_forum_contributor: row.get(5)?,
      created_at:           row.get(6)?,
      updated_at:           row.get(7)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      user_id:              self.user_id,
      username:             self.username,
      password:             self.password,
      score:                self.score,
      email:                self.email,
      is_forum_contributor: self.is_forum_contributor,
      created_at:           decode_dt(&self.created_at)?,
      updated_at:           decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `LoginInstances` row.
pub struct RawLogin {
  pub login_id:   String,
  pub user_id:    i32,
  pub created_at: String,
  pub updated_at: String,
}

impl RawLogin {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      login_id:   row.get(0)?,
      user_id:    row.get(1)?,
      created_at: row.get(2)?,
      updated_at: row.get(3)?,
    })
  }

  pub fn into_login(self) -> Result<LoginInstance> {
    Ok(LoginInstance {
      login_id:   self.login_id,
      user_id:    self.user_id,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `Relationships` row.
pub struct RawRelationship {
  pub relationship_id: i32,
  pub first_user_id:   i32,
  pub second_user_id:  i32,
  pub created_at:      String,
  pub updated_at:      String,
}

impl RawRelationship {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      relationship_id: row.get(0)?,
      first_user_id:   row.get(1)?,
      second_user_id:  row.get(2)?,
      created_at:      row.get(3)?,
      updated_at:      row.get(4)?,
    })
  }

  pub fn into_relationship(self) -> Result<Relationship> {
    Ok(Relationship {
      relationship_id: self.relationship_id,
      first_user_id:   self.first_user_id,
      second_user_id:  self.second_user_id,
      created_at:      decode_dt(&self.created_at)?,
      updated_at:      decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `ForumPosts` row.
pub struct RawPost {
  pub post_id:    i32,
  pub creator_id: i32,
  pub content:    String,
  pub title:      Option<String>,
  pub created_at: String,
  pub updated_at: String,
}

impl RawPost {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      post_id:    row.get(0)?,
      creator_id: row.get(1)?,
      content:    row.get(2)?,
      title:      row.get(3)?,
      created_at: row.get(4)?,
      updated_at: row.get(5)?,
    })
  }

  pub fn into_post(self) -> Result<ForumPost> {
    Ok(ForumPost {
      post_id:    self.post_id,
      creator_id: self.creator_id,
      content:    self.content,
      title:      self.title,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
