//! Schema & connection bootstrap for ecodnp.
//!
//! [`connect`] picks a backend from [`DatabaseConfig`], opens it, creates any
//! missing tables and returns a [`Database`]: the live store handle together
//! with the four table descriptors. The application owns the returned value
//! and passes it to whatever needs persisted state; there is no global.

pub mod config;
pub mod error;

pub use crate::config::{Backend, DatabaseConfig, STORAGE_FILE_NAME};
pub use ecodnp_core::{ConstraintViolation, Store};
pub use ecodnp_store_postgres::{PgStore, connect_options};
pub use ecodnp_store_sqlite::SqliteStore;
pub use error::{Error, Result};

use ecodnp_core::{
  ForumPost, LoginInstance, NewForumPost, NewLoginInstance, NewPerson, Person,
  PostId, Relationship, UserId,
  schema::{self, TableDef},
};
use serde::Serialize;

// ─── Schema bundle ───────────────────────────────────────────────────────────

/// The four record-type descriptors, as exported alongside the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Schema {
  pub person:         &'static TableDef,
  pub login_instance: &'static TableDef,
  pub relationship:   &'static TableDef,
  pub forum_post:     &'static TableDef,
}

impl Schema {
  pub const fn new() -> Self {
    Self {
      person:         &schema::PERSON,
      login_instance: &schema::LOGIN_INSTANCE,
      relationship:   &schema::RELATIONSHIP,
      forum_post:     &schema::FORUM_POST,
    }
  }

  /// All four descriptors in creation order.
  pub fn tables(&self) -> [&'static TableDef; 4] {
    [self.person, self.login_instance, self.relationship, self.forum_post]
  }
}

impl Default for Schema {
  fn default() -> Self { Self::new() }
}

// ─── Database ────────────────────────────────────────────────────────────────

/// The live store chosen at startup.
#[derive(Debug, Clone)]
pub enum StoreHandle {
  Postgres(PgStore),
  Sqlite(SqliteStore),
}

impl StoreHandle {
  pub fn backend_name(&self) -> &'static str {
    match self {
      StoreHandle::Postgres(_) => "postgres",
      StoreHandle::Sqlite(_) => "sqlite",
    }
  }
}

/// Live store handle plus schema descriptors.
///
/// Cloning is cheap — both backends are reference-counted.
#[derive(Debug, Clone)]
pub struct Database {
  store:  StoreHandle,
  schema: Schema,
}

impl Database {
  pub fn new(store: StoreHandle) -> Self { Self { store, schema: Schema::new() } }

  pub fn store(&self) -> &StoreHandle { &self.store }

  pub fn schema(&self) -> &Schema { &self.schema }

  pub fn backend_name(&self) -> &'static str { self.store.backend_name() }
}

/// Open the backend `config` selects and make sure all tables exist.
///
/// The choice is made once; a failing remote connection is reported, never
/// replaced by the local store.
pub async fn connect(config: &DatabaseConfig) -> Result<Database> {
  let store = match config.backend() {
    Backend::Postgres { url } => {
      tracing::info!("DATABASE_URL set, connecting to remote postgres");
      StoreHandle::Postgres(PgStore::connect(&url).await?)
    }
    Backend::Sqlite { path } => {
      tracing::info!(path = %path.display(), "DATABASE_URL not set, using local sqlite store");
      StoreHandle::Sqlite(SqliteStore::open(&path).await?)
    }
  };

  tracing::debug!(backend = store.backend_name(), "database ready");
  Ok(Database::new(store))
}

// ─── Store impl ──────────────────────────────────────────────────────────────

/// Forward one call to whichever backend is live.
macro_rules! dispatch {
  ($self:ident, $store:ident => $call:expr) => {
    match &$self.store {
      StoreHandle::Postgres($store) => Ok($call.await?),
      StoreHandle::Sqlite($store) => Ok($call.await?),
    }
  };
}

impl Store for Database {
  type Error = Error;

  async fn create_person(&self, input: NewPerson) -> Result<Person> {
    dispatch!(self, s => s.create_person(input))
  }

  async fn get_person(&self, user_id: UserId) -> Result<Option<Person>> {
    dispatch!(self, s => s.get_person(user_id))
  }

  async fn find_person_by_username(&self, username: &str) -> Result<Option<Person>> {
    dispatch!(self, s => s.find_person_by_username(username))
  }

  async fn find_person_by_email(&self, email: &str) -> Result<Option<Person>> {
    dispatch!(self, s => s.find_person_by_email(email))
  }

  async fn list_people(&self) -> Result<Vec<Person>> {
    dispatch!(self, s => s.list_people())
  }

  async fn leaderboard(&self, limit: usize) -> Result<Vec<Person>> {
    dispatch!(self, s => s.leaderboard(limit))
  }

  async fn add_score(&self, user_id: UserId, delta: i32) -> Result<Option<Person>> {
    dispatch!(self, s => s.add_score(user_id, delta))
  }

  async fn set_forum_contributor(
    &self,
    user_id:     UserId,
    contributor: bool,
  ) -> Result<Option<Person>> {
    dispatch!(self, s => s.set_forum_contributor(user_id, contributor))
  }

  async fn delete_person(&self, user_id: UserId) -> Result<bool> {
    dispatch!(self, s => s.delete_person(user_id))
  }

  async fn create_login(&self, input: NewLoginInstance) -> Result<LoginInstance> {
    dispatch!(self, s => s.create_login(input))
  }

  async fn get_login(&self, login_id: &str) -> Result<Option<LoginInstance>> {
    dispatch!(self, s => s.get_login(login_id))
  }

  async fn list_logins(&self, user_id: UserId) -> Result<Vec<LoginInstance>> {
    dispatch!(self, s => s.list_logins(user_id))
  }

  async fn delete_login(&self, login_id: &str) -> Result<bool> {
    dispatch!(self, s => s.delete_login(login_id))
  }

  async fn create_relationship(
    &self,
    first_user_id:  UserId,
    second_user_id: UserId,
  ) -> Result<Relationship> {
    dispatch!(self, s => s.create_relationship(first_user_id, second_user_id))
  }

  async fn get_relationship(
    &self,
    first_user_id:  UserId,
    second_user_id: UserId,
  ) -> Result<Option<Relationship>> {
    dispatch!(self, s => s.get_relationship(first_user_id, second_user_id))
  }

  async fn list_relationships(&self, user_id: UserId) -> Result<Vec<Relationship>> {
    dispatch!(self, s => s.list_relationships(user_id))
  }

  async fn delete_relationship(
    &self,
    first_user_id:  UserId,
    second_user_id: UserId,
  ) -> Result<bool> {
    dispatch!(self, s => s.delete_relationship(first_user_id, second_user_id))
  }

  async fn create_post(&self, input: NewForumPost) -> Result<ForumPost> {
    dispatch!(self, s => s.create_post(input))
  }

  async fn get_post(&self, post_id: PostId) -> Result<Option<ForumPost>> {
    dispatch!(self, s => s.get_post(post_id))
  }

  async fn list_posts(&self, creator_id: Option<UserId>) -> Result<Vec<ForumPost>> {
    dispatch!(self, s => s.list_posts(creator_id))
  }

  async fn delete_post(&self, post_id: PostId) -> Result<bool> {
    dispatch!(self, s => s.delete_post(post_id))
  }
}
