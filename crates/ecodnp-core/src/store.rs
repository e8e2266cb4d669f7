//! The `Store` trait and constraint classification.
//!
//! The trait is implemented by storage backends (`ecodnp-store-sqlite`,
//! `ecodnp-store-postgres`) and by the bootstrap bundle in `ecodnp-db`.
//! Constraint enforcement is left to the database engine; a violated
//! constraint surfaces as the backend's error, classifiable through
//! [`ConstraintViolation`].

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::record::{
  ForumPost, LoginInstance, NewForumPost, NewLoginInstance, NewPerson, Person,
  PostId, Relationship, UserId,
};

// ─── Constraint classification ───────────────────────────────────────────────

/// Which kind of integrity constraint the database rejected a write with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintViolation {
  /// Duplicate primary key or unique column/index.
  Unique,
  ForeignKey,
  NotNull,
  Check,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Gateway to persisted users, logins, relationships and forum posts.
///
/// Reads of missing rows yield `Ok(None)`; updates of missing rows yield
/// `Ok(None)`; deletes report whether a row was removed. Column defaults are
/// applied by the database.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes.
pub trait Store: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── People ────────────────────────────────────────────────────────────

  /// Insert a person. Fails with a unique violation if the username or email
  /// is taken.
  fn create_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  fn get_person(
    &self,
    user_id: UserId,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  fn find_person_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + 'a;

  fn find_person_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + 'a;

  /// All people, ascending by `user_id`.
  fn list_people(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Top `limit` people by descending score; ties broken by `user_id`.
  fn leaderboard(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Add `delta` (possibly negative) to a person's score.
  fn add_score(
    &self,
    user_id: UserId,
    delta: i32,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  fn set_forum_contributor(
    &self,
    user_id: UserId,
    contributor: bool,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Delete a person. Their logins go with them; existing forum posts make
  /// the delete fail with a foreign-key violation.
  fn delete_person(
    &self,
    user_id: UserId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Logins ────────────────────────────────────────────────────────────

  /// Fails with a foreign-key violation if `input.user_id` is unknown.
  fn create_login(
    &self,
    input: NewLoginInstance,
  ) -> impl Future<Output = Result<LoginInstance, Self::Error>> + Send + '_;

  fn get_login<'a>(
    &'a self,
    login_id: &'a str,
  ) -> impl Future<Output = Result<Option<LoginInstance>, Self::Error>> + Send + 'a;

  fn list_logins(
    &self,
    user_id: UserId,
  ) -> impl Future<Output = Result<Vec<LoginInstance>, Self::Error>> + Send + '_;

  fn delete_login<'a>(
    &'a self,
    login_id: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Relationships ─────────────────────────────────────────────────────

  /// Insert the directed pair `(first, second)`. A duplicate pair fails with
  /// a unique violation; the reverse pair is a separate row.
  ///
  /// `relationship_id` is unique among live rows and larger than every
  /// existing id. Whether the id of a deleted row can be handed out again is
  /// backend-specific: PostgreSQL never reuses one, SQLite reuses the highest
  /// id once that row is gone.
  fn create_relationship(
    &self,
    first_user_id: UserId,
    second_user_id: UserId,
  ) -> impl Future<Output = Result<Relationship, Self::Error>> + Send + '_;

  fn get_relationship(
    &self,
    first_user_id: UserId,
    second_user_id: UserId,
  ) -> impl Future<Output = Result<Option<Relationship>, Self::Error>> + Send + '_;

  /// Every relationship with `user_id` on either side, by `relationship_id`.
  fn list_relationships(
    &self,
    user_id: UserId,
  ) -> impl Future<Output = Result<Vec<Relationship>, Self::Error>> + Send + '_;

  fn delete_relationship(
    &self,
    first_user_id: UserId,
    second_user_id: UserId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Forum posts ───────────────────────────────────────────────────────

  /// Fails with a foreign-key violation if the creator is unknown.
  fn create_post(
    &self,
    input: NewForumPost,
  ) -> impl Future<Output = Result<ForumPost, Self::Error>> + Send + '_;

  fn get_post(
    &self,
    post_id: PostId,
  ) -> impl Future<Output = Result<Option<ForumPost>, Self::Error>> + Send + '_;

  /// Posts ascending by `post_id`, optionally restricted to one creator.
  fn list_posts(
    &self,
    creator_id: Option<UserId>,
  ) -> impl Future<Output = Result<Vec<ForumPost>, Self::Error>> + Send + '_;

  fn delete_post(
    &self,
    post_id: PostId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
