//! Record types — one struct per persisted table, plus the insert inputs.
//!
//! Field names match column names one-to-one. Timestamps map to the
//! `createdAt` / `updatedAt` columns every table carries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{self, TableDef};

/// `People.user_id` — an auto-incremented `INTEGER`.
pub type UserId = i32;

/// `ForumPosts.post_id` — an auto-incremented `INTEGER`.
pub type PostId = i32;

/// Ties a record type to the static descriptor of its table.
pub trait Record {
  const TABLE: &'static TableDef;
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub user_id:              UserId,
  pub username:             String,
  /// Stored exactly as supplied.
  pub password:             String,
  pub score:                i32,
  pub email:                String,
  pub is_forum_contributor: bool,
  pub created_at:           DateTime<Utc>,
  pub updated_at:           DateTime<Utc>,
}

impl Record for Person {
  const TABLE: &'static TableDef = &schema::PERSON;
}

/// Input for [`Store::create_person`](crate::Store::create_person).
///
/// `score` and `is_forum_contributor` are left to the column defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
  pub username: String,
  pub password: String,
  pub email:    String,
}

impl NewPerson {
  pub fn new(
    username: impl Into<String>,
    password: impl Into<String>,
    email: impl Into<String>,
  ) -> Self {
    Self {
      username: username.into(),
      password: password.into(),
      email:    email.into(),
    }
  }
}

// ─── LoginInstance ───────────────────────────────────────────────────────────

/// One live login session. Removed automatically when its person is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginInstance {
  pub login_id:   String,
  pub user_id:    UserId,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Record for LoginInstance {
  const TABLE: &'static TableDef = &schema::LOGIN_INSTANCE;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLoginInstance {
  pub login_id: String,
  pub user_id:  UserId,
}

impl NewLoginInstance {
  pub fn new(login_id: impl Into<String>, user_id: UserId) -> Self {
    Self { login_id: login_id.into(), user_id }
  }

  /// A login for `user_id` with a freshly minted random token as its id.
  pub fn generate(user_id: UserId) -> Self {
    Self::new(Uuid::new_v4().hyphenated().to_string(), user_id)
  }
}

// ─── Relationship ────────────────────────────────────────────────────────────

/// A directed edge between two users. `(a, b)` and `(b, a)` are distinct rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
  pub relationship_id: i32,
  pub first_user_id:   UserId,
  pub second_user_id:  UserId,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
}

impl Record for Relationship {
  const TABLE: &'static TableDef = &schema::RELATIONSHIP;
}

impl Relationship {
  /// The user on the other side of this edge from `user_id`, if `user_id` is
  /// part of it at all.
  pub fn other(&self, user_id: UserId) -> Option<UserId> {
    if self.first_user_id == user_id {
      Some(self.second_user_id)
    } else if self.second_user_id == user_id {
      Some(self.first_user_id)
    } else {
      None
    }
  }
}

// ─── ForumPost ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumPost {
  pub post_id:    PostId,
  pub creator_id: UserId,
  pub content:    String,
  pub title:      Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Record for ForumPost {
  const TABLE: &'static TableDef = &schema::FORUM_POST;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewForumPost {
  pub creator_id: UserId,
  pub content:    String,
  pub title:      Option<String>,
}

impl NewForumPost {
  pub fn new(creator_id: UserId, content: impl Into<String>) -> Self {
    Self { creator_id, content: content.into(), title: None }
  }

  pub fn with_title(mut self, title: impl Into<String>) -> Self {
    self.title = Some(title.into());
    self
  }
}
