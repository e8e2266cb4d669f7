//! [`PgStore`] — the PostgreSQL implementation of [`Store`].

use std::str::FromStr as _;

use chrono::Utc;
use sqlx::postgres::{PgConnectOptions, PgPool, PgSslMode};

use ecodnp_core::{
  ForumPost, LoginInstance, NewForumPost, NewLoginInstance, NewPerson, Person,
  PostId, Relationship, Store, UserId,
};

use crate::{
  Result,
  decode::{self, LOGIN_COLUMNS, PERSON_COLUMNS, POST_COLUMNS, RELATIONSHIP_COLUMNS},
  schema::SCHEMA,
};

/// Parse a connection URL and force TLS without certificate verification.
///
/// Any `sslmode` in the URL is overridden: the managed hosts we target
/// present certificates that do not chain to a public root.
pub fn connect_options(url: &str) -> Result<PgConnectOptions> {
  Ok(PgConnectOptions::from_str(url)?.ssl_mode(PgSslMode::Require))
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An ecodnp store backed by a PostgreSQL connection pool.
///
/// Cloning is cheap — the pool is reference-counted.
#[derive(Debug, Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  /// Connect to `url` and run schema initialisation.
  pub async fn connect(url: &str) -> Result<Self> {
    let pool = PgPool::connect_with(connect_options(url)?).await?;
    Self::from_pool(pool).await
  }

  /// Wrap an existing pool and run schema initialisation.
  pub async fn from_pool(pool: PgPool) -> Result<Self> {
    let store = Self { pool };
    store.init_schema().await?;
    Ok(store)
  }

  pub fn pool(&self) -> &PgPool { &self.pool }

  async fn init_schema(&self) -> Result<()> {
    // A bare `&str` runs over the simple protocol, which accepts a batch.
    sqlx::Executor::execute(&self.pool, SCHEMA).await?;
    Ok(())
  }

  async fn fetch_person_by(&self, column: &'static str, value: &str) -> Result<Option<Person>> {
    let sql = format!(r#"SELECT {PERSON_COLUMNS} FROM "People" WHERE "{column}" = $1"#);
    sqlx::query(&sql)
      .bind(value)
      .fetch_optional(&self.pool)
      .await?
      .as_ref()
      .map(decode::person)
      .transpose()
  }
}

// ─── Store impl ──────────────────────────────────────────────────────────────

impl Store for PgStore {
  type Error = crate::Error;

  // ── People ────────────────────────────────────────────────────────────────

  async fn create_person(&self, input: NewPerson) -> Result<Person> {
    let sql = format!(
      r#"INSERT INTO "People" ("username", "password", "email", "createdAt", "updatedAt")
         VALUES ($1, $2, $3, $4, $4)
         RETURNING {PERSON_COLUMNS}"#
    );

    let row = sqlx::query(&sql)
      .bind(input.username)
      .bind(input.password)
      .bind(input.email)
      .bind(Utc::now())
      .fetch_one(&self.pool)
      .await?;

    decode::person(&row)
  }

  async fn get_person(&self, user_id: UserId) -> Result<Option<Person>> {
    let sql = format!(r#"SELECT {PERSON_COLUMNS} FROM "People" WHERE "user_id" = $1"#);
    sqlx::query(&sql)
      .bind(user_id)
      .fetch_optional(&self.pool)
      .await?
      .as_ref()
      .map(decode::person)
      .transpose()
  }

  async fn find_person_by_username(&self, username: &str) -> Result<Option<Person>> {
    self.fetch_person_by("username", username).await
  }

  async fn find_person_by_email(&self, email: &str) -> Result<Option<Person>> {
    self.fetch_person_by("email", email).await
  }

  async fn list_people(&self) -> Result<Vec<Person>> {
    let sql = format!(r#"SELECT {PERSON_COLUMNS} FROM "People" ORDER BY "user_id""#);
    sqlx::query(&sql)
      .fetch_all(&self.pool)
      .await?
      .iter()
      .map(decode::person)
      .collect()
  }

  async fn leaderboard(&self, limit: usize) -> Result<Vec<Person>> {
    let sql = format!(
      r#"SELECT {PERSON_COLUMNS} FROM "People"
         ORDER BY "score" DESC, "user_id"
         LIMIT $1"#
    );
    sqlx::query(&sql)
      .bind(i64::try_from(limit).unwrap_or(i64::MAX))
      .fetch_all(&self.pool)
      .await?
      .iter()
      .map(decode::person)
      .collect()
  }

  async fn add_score(&self, user_id: UserId, delta: i32) -> Result<Option<Person>> {
    let sql = format!(
      r#"UPDATE "People" SET "score" = "score" + $1, "updatedAt" = $2
         WHERE "user_id" = $3
         RETURNING {PERSON_COLUMNS}"#
    );
    sqlx::query(&sql)
      .bind(delta)
      .bind(Utc::now())
      .bind(user_id)
      .fetch_optional(&self.pool)
      .await?
      .as_ref()
      .map(decode::person)
      .transpose()
  }

  async fn set_forum_contributor(
    &self,
    user_id:     UserId,
    contributor: bool,
  ) -> Result<Option<Person>> {
    let sql = format!(
      r#"UPDATE "People" SET "is_forum_contributor" = $1, "updatedAt" = $2
         WHERE "user_id" = $3
         RETURNING {PERSON_COLUMNS}"#
    );
    sqlx::query(&sql)
      .bind(contributor)
      .bind(Utc::now())
      .bind(user_id)
      .fetch_optional(&self.pool)
      .await?
      .as_ref()
      .map(decode::person)
      .transpose()
  }

  async fn delete_person(&self, user_id: UserId) -> Result<bool> {
    let result = sqlx::query(r#"DELETE FROM "People" WHERE "user_id" = $1"#)
      .bind(user_id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }

  // ── Logins ────────────────────────────────────────────────────────────────

  async fn create_login(&self, input: NewLoginInstance) -> Result<LoginInstance> {
    let sql = format!(
      r#"INSERT INTO "LoginInstances" ("login_id", "user_id", "createdAt", "updatedAt")
         VALUES ($1, $2, $3, $3)
         RETURNING {LOGIN_COLUMNS}"#
    );

    let row = sqlx::query(&sql)
      .bind(input.login_id)
      .bind(input.user_id)
      .bind(Utc::now())
      .fetch_one(&self.pool)
      .await?;

    decode::login(&row)
  }

  async fn get_login(&self, login_id: &str) -> Result<Option<LoginInstance>> {
    let sql =
      format!(r#"SELECT {LOGIN_COLUMNS} FROM "LoginInstances" WHERE "login_id" = $1"#);
    sqlx::query(&sql)
      .bind(login_id)
      .fetch_optional(&self.pool)
      .await?
      .as_ref()
      .map(decode::login)
      .transpose()
  }

  async fn list_logins(&self, user_id: UserId) -> Result<Vec<LoginInstance>> {
    let sql = format!(
      r#"SELECT {LOGIN_COLUMNS} FROM "LoginInstances"
         WHERE "user_id" = $1
         ORDER BY "createdAt", "login_id""#
    );
    sqlx::query(&sql)
      .bind(user_id)
      .fetch_all(&self.pool)
      .await?
      .iter()
      .map(decode::login)
      .collect()
  }

  async fn delete_login(&self, login_id: &str) -> Result<bool> {
    let result = sqlx::query(r#"DELETE FROM "LoginInstances" WHERE "login_id" = $1"#)
      .bind(login_id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }

  // ── Relationships ─────────────────────────────────────────────────────────

  async fn create_relationship(
    &self,
    first_user_id:  UserId,
    second_user_id: UserId,
  ) -> Result<Relationship> {
    let sql = format!(
      r#"INSERT INTO "Relationships"
           ("first_user_id", "second_user_id", "createdAt", "updatedAt")
         VALUES ($1, $2, $3, $3)
         RETURNING {RELATIONSHIP_COLUMNS}"#
    );

    let row = sqlx::query(&sql)
      .bind(first_user_id)
      .bind(second_user_id)
      .bind(Utc::now())
      .fetch_one(&self.pool)
      .await?;

    decode::relationship(&row)
  }

  async fn get_relationship(
    &self,
    first_user_id:  UserId,
    second_user_id: UserId,
  ) -> Result<Option<Relationship>> {
    let sql = format!(
      r#"SELECT {RELATIONSHIP_COLUMNS} FROM "Relationships"
         WHERE "first_user_id" = $1 AND "second_user_id" = $2"#
    );
    sqlx::query(&sql)
      .bind(first_user_id)
      .bind(second_user_id)
      .fetch_optional(&self.pool)
      .await?
      .as_ref()
      .map(decode::relationship)
      .transpose()
  }

  async fn list_relationships(&self, user_id: UserId) -> Result<Vec<Relationship>> {
    let sql = format!(
      r#"SELECT {RELATIONSHIP_COLUMNS} FROM "Relationships"
         WHERE "first_user_id" = $1 OR "second_user_id" = $1
         ORDER BY "relationship_id""#
    );
    sqlx::query(&sql)
      .bind(user_id)
      .fetch_all(&self.pool)
      .await?
      .iter()
      .map(decode::relationship)
      .collect()
  }

  async fn delete_relationship(
    &self,
    first_user_id:  UserId,
    second_user_id: UserId,
  ) -> Result<bool> {
    let result = sqlx::query(
      r#"DELETE FROM "Relationships"
         WHERE "first_user_id" = $1 AND "second_user_id" = $2"#,
    )
    .bind(first_user_id)
    .bind(second_user_id)
    .execute(&self.pool)
    .await?;
    Ok(result.rows_affected() > 0)
  }

  // ── Forum posts ───────────────────────────────────────────────────────────

  async fn create_post(&self, input: NewForumPost) -> Result<ForumPost> {
    let sql = format!(
      r#"INSERT INTO "ForumPosts" ("creator_id", "content", "title", "createdAt", "updatedAt")
         VALUES ($1, $2, $3, $4, $4)
         RETURNING {POST_COLUMNS}"#
    );

    let row = sqlx::query(&sql)
      .bind(input.creator_id)
      .bind(input.content)
      .bind(input.title)
      .bind(Utc::now())
      .fetch_one(&self.pool)
      .await?;

    decode::post(&row)
  }

  async fn get_post(&self, post_id: PostId) -> Result<Option<ForumPost>> {
    let sql = format!(r#"SELECT {POST_COLUMNS} FROM "ForumPosts" WHERE "post_id" = $1"#);
    sqlx::query(&sql)
      .bind(post_id)
      .fetch_optional(&self.pool)
      .await?
      .as_ref()
      .map(decode::post)
      .transpose()
  }

  async fn list_posts(&self, creator_id: Option<UserId>) -> Result<Vec<ForumPost>> {
    let sql = format!(
      r#"SELECT {POST_COLUMNS} FROM "ForumPosts"
         WHERE $1::INTEGER IS NULL OR "creator_id" = $1
         ORDER BY "post_id""#
    );
    sqlx::query(&sql)
      .bind(creator_id)
      .fetch_all(&self.pool)
      .await?
      .iter()
      .map(decode::post)
      .collect()
  }

  async fn delete_post(&self, post_id: PostId) -> Result<bool> {
    let result = sqlx::query(r#"DELETE FROM "ForumPosts" WHERE "post_id" = $1"#)
      .bind(post_id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }
}
