//! [`SqliteStore`] — the SQLite implementation of [`Store`].

use std::{fmt, path::Path};

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use ecodnp_core::{
  ForumPost, LoginInstance, NewForumPost, NewLoginInstance, NewPerson, Person,
  PostId, Relationship, Store, UserId,
};

use crate::{
  Error, Result,
  encode::{
    LOGIN_COLUMNS, PERSON_COLUMNS, POST_COLUMNS, RELATIONSHIP_COLUMNS, RawLogin,
    RawPerson, RawPost, RawRelationship, encode_dt,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An ecodnp store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl fmt::Debug for SqliteStore {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SqliteStore").finish_non_exhaustive()
  }
}

/// Outcome of the read-check-write inside [`Store::add_score`].
enum ScoreUpdate {
  Missing,
  OutOfRange(i64),
  Updated(RawPerson),
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run an `UPDATE ... RETURNING` against one person; `None` if no row matched.
  async fn update_person(
    &self,
    set_clause: &'static str,
    user_id: UserId,
    value: i32,
  ) -> Result<Option<Person>> {
    let now_str = encode_dt(Utc::now());
    let sql = format!(
      r#"UPDATE "People" SET {set_clause}, "updatedAt" = ?2
         WHERE "user_id" = ?3
         RETURNING {PERSON_COLUMNS}"#
    );

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &sql,
            rusqlite::params![value, now_str, user_id],
            RawPerson::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  /// Fetch at most one person by a single-parameter `SELECT`.
  async fn query_people(
    &self,
    sql:   String,
    param: String,
  ) -> Result<Option<Person>> {
    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(&sql, rusqlite::params![param], RawPerson::from_row)
          .optional()?)
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }
}

// ─── Store impl ──────────────────────────────────────────────────────────────

impl Store for SqliteStore {
  type Error = crate::Error;

  // ── People ────────────────────────────────────────────────────────────────

  async fn create_person(&self, input: NewPerson) -> Result<Person> {
    let now_str = encode_dt(Utc::now());
    let sql = format!(
      r#"INSERT INTO "People" ("username", "password", "email", "createdAt", "updatedAt")
         VALUES (?1, ?2, ?3, ?4, ?4)
         RETURNING {PERSON_COLUMNS}"#
    );

    let raw: RawPerson = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &sql,
          rusqlite::params![input.username, input.password, input.email, now_str],
          RawPerson::from_row,
        )?)
      })
      .await?;

    raw.into_person()
  }

  async fn get_person(&self, user_id: UserId) -> Result<Option<Person>> {
    let sql = format!(r#"SELECT {PERSON_COLUMNS} FROM "People" WHERE "user_id" = ?1"#);

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(&sql, rusqlite::params![user_id], RawPerson::from_row)
          .optional()?)
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn find_person_by_username(&self, username: &str) -> Result<Option<Person>> {
    let sql = format!(r#"SELECT {PERSON_COLUMNS} FROM "People" WHERE "username" = ?1"#);
    self.query_people(sql, username.to_owned()).await
  }

  async fn find_person_by_email(&self, email: &str) -> Result<Option<Person>> {
    let sql = format!(r#"SELECT {PERSON_COLUMNS} FROM "People" WHERE "email" = ?1"#);
    self.query_people(sql, email.to_owned()).await
  }

  async fn list_people(&self) -> Result<Vec<Person>> {
    let sql = format!(r#"SELECT {PERSON_COLUMNS} FROM "People" ORDER BY "user_id""#);

    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn leaderboard(&self, limit: usize) -> Result<Vec<Person>> {
    let limit_val = i64::try_from(limit).unwrap_or(i64::MAX);
    let sql = format!(
      r#"SELECT {PERSON_COLUMNS} FROM "People"
         ORDER BY "score" DESC, "user_id"
         LIMIT ?1"#
    );

    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val], RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn add_score(&self, user_id: UserId, delta: i32) -> Result<Option<Person>> {
    let now_str = encode_dt(Utc::now());
    let sql = format!(
      r#"UPDATE "People" SET "score" = ?1, "updatedAt" = ?2
         WHERE "user_id" = ?3
         RETURNING {PERSON_COLUMNS}"#
    );

    // SQLite widens the sum to 64 bits; check it here so an unreadable
    // score is never committed.
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let current: Option<i32> = tx
          .query_row(
            r#"SELECT "score" FROM "People" WHERE "user_id" = ?1"#,
            rusqlite::params![user_id],
            |row| row.get(0),
          )
          .optional()?;

        let Some(current) = current else {
          return Ok(ScoreUpdate::Missing);
        };
        let Some(score) = current.checked_add(delta) else {
          return Ok(ScoreUpdate::OutOfRange(i64::from(current) + i64::from(delta)));
        };

        let raw = tx.query_row(
          &sql,
          rusqlite::params![score, now_str, user_id],
          RawPerson::from_row,
        )?;
        tx.commit()?;
        Ok(ScoreUpdate::Updated(raw))
      })
      .await?;

    match outcome {
      ScoreUpdate::Missing => Ok(None),
      ScoreUpdate::OutOfRange(score) => Err(Error::ScoreOutOfRange { user_id, score }),
      ScoreUpdate::Updated(raw) => raw.into_person().map(Some),
    }
  }

  async fn set_forum_contributor(
    &self,
    user_id:     UserId,
    contributor: bool,
  ) -> Result<Option<Person>> {
    self
      .update_person(r#""is_forum_contributor" = ?1"#, user_id, i32::from(contributor))
      .await
  }

  async fn delete_person(&self, user_id: UserId) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          r#"DELETE FROM "People" WHERE "user_id" = ?1"#,
          rusqlite::params![user_id],
        )?)
      })
      .await?;
    Ok(deleted > 0)
  }

  // ── Logins ────────────────────────────────────────────────────────────────

  async fn create_login(&self, input: NewLoginInstance) -> Result<LoginInstance> {
    let now_str = encode_dt(Utc::now());
    let sql = format!(
      r#"INSERT INTO "LoginInstances" ("login_id", "user_id", "createdAt", "updatedAt")
         VALUES (?1, ?2, ?3, ?3)
         RETURNING {LOGIN_COLUMNS}"#
    );

    let raw: RawLogin = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &sql,
          rusqlite::params![input.login_id, input.user_id, now_str],
          RawLogin::from_row,
        )?)
      })
      .await?;

    raw.into_login()
  }

  async fn get_login(&self, login_id: &str) -> Result<Option<LoginInstance>> {
    let id = login_id.to_owned();
    let sql =
      format!(r#"SELECT {LOGIN_COLUMNS} FROM "LoginInstances" WHERE "login_id" = ?1"#);

    let raw: Option<RawLogin> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(&sql, rusqlite::params![id], RawLogin::from_row)
          .optional()?)
      })
      .await?;

    raw.map(RawLogin::into_login).transpose()
  }

  async fn list_logins(&self, user_id: UserId) -> Result<Vec<LoginInstance>> {
    let sql = format!(
      r#"SELECT {LOGIN_COLUMNS} FROM "LoginInstances"
         WHERE "user_id" = ?1
         ORDER BY "createdAt", "login_id""#
    );

    let raws: Vec<RawLogin> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![user_id], RawLogin::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLogin::into_login).collect()
  }

  async fn delete_login(&self, login_id: &str) -> Result<bool> {
    let id = login_id.to_owned();
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          r#"DELETE FROM "LoginInstances" WHERE "login_id" = ?1"#,
          rusqlite::params![id],
        )?)
      })
      .await?;
    Ok(deleted > 0)
  }

  // ── Relationships ─────────────────────────────────────────────────────────

  async fn create_relationship(
    &self,
    first_user_id:  UserId,
    second_user_id: UserId,
  ) -> Result<Relationship> {
    let now_str = encode_dt(Utc::now());
    let sql = format!(
      r#"INSERT INTO "Relationships"
           ("relationship_id", "first_user_id", "second_user_id", "createdAt", "updatedAt")
         VALUES (
           (SELECT COALESCE(MAX("relationship_id"), 0) + 1 FROM "Relationships"),
           ?1, ?2, ?3, ?3
         )
         RETURNING {RELATIONSHIP_COLUMNS}"#
    );

    let raw: RawRelationship = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &sql,
          rusqlite::params![first_user_id, second_user_id, now_str],
          RawRelationship::from_row,
        )?)
      })
      .await?;

    raw.into_relationship()
  }

  async fn get_relationship(
    &self,
    first_user_id:  UserId,
    second_user_id: UserId,
  ) -> Result<Option<Relationship>> {
    let sql = format!(
      r#"SELECT {RELATIONSHIP_COLUMNS} FROM "Relationships"
         WHERE "first_user_id" = ?1 AND "second_user_id" = ?2"#
    );

    let raw: Option<RawRelationship> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &sql,
            rusqlite::params![first_user_id, second_user_id],
            RawRelationship::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawRelationship::into_relationship).transpose()
  }

  async fn list_relationships(&self, user_id: UserId) -> Result<Vec<Relationship>> {
    let sql = format!(
      r#"SELECT {RELATIONSHIP_COLUMNS} FROM "Relationships"
         WHERE "first_user_id" = ?1 OR "second_user_id" = ?1
         ORDER BY "relationship_id""#
    );

    let raws: Vec<RawRelationship> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![user_id], RawRelationship::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawRelationship::into_relationship)
      .collect()
  }

  async fn delete_relationship(
    &self,
    first_user_id:  UserId,
    second_user_id: UserId,
  ) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          r#"DELETE FROM "Relationships"
             WHERE "first_user_id" = ?1 AND "second_user_id" = ?2"#,
          rusqlite::params![first_user_id, second_user_id],
        )?)
      })
      .await?;
    Ok(deleted > 0)
  }

  // ── Forum posts ───────────────────────────────────────────────────────────

  async fn create_post(&self, input: NewForumPost) -> Result<ForumPost> {
    let now_str = encode_dt(Utc::now());
    let sql = format!(
      r#"INSERT INTO "ForumPosts" ("creator_id", "content", "title", "createdAt", "updatedAt")
         VALUES (?1, ?2, ?3, ?4, ?4)
         RETURNING {POST_COLUMNS}"#
    );

    let raw: RawPost = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &sql,
          rusqlite::params![input.creator_id, input.content, input.title, now_str],
          RawPost::from_row,
        )?)
      })
      .await?;

    raw.into_post()
  }

  async fn get_post(&self, post_id: PostId) -> Result<Option<ForumPost>> {
    let sql = format!(r#"SELECT {POST_COLUMNS} FROM "ForumPosts" WHERE "post_id" = ?1"#);

    let raw: Option<RawPost> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(&sql, rusqlite::params![post_id], RawPost::from_row)
          .optional()?)
      })
      .await?;

    raw.map(RawPost::into_post).transpose()
  }

  async fn list_posts(&self, creator_id: Option<UserId>) -> Result<Vec<ForumPost>> {
    let sql = format!(
      r#"SELECT {POST_COLUMNS} FROM "ForumPosts"
         WHERE ?1 IS NULL OR "creator_id" = ?1
         ORDER BY "post_id""#
    );

    let raws: Vec<RawPost> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![creator_id], RawPost::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPost::into_post).collect()
  }

  async fn delete_post(&self, post_id: PostId) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          r#"DELETE FROM "ForumPosts" WHERE "post_id" = ?1"#,
          rusqlite::params![post_id],
        )?)
      })
      .await?;
    Ok(deleted > 0)
  }
}
