//! Integration tests for `SqliteStore` against an in-memory database.

use ecodnp_core::{
  ConstraintViolation, NewForumPost, NewLoginInstance, NewPerson, Store,
  schema::{self, TableDef},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn alice() -> NewPerson { NewPerson::new("alice", "hunter2", "alice@example.com") }

fn bob() -> NewPerson { NewPerson::new("bob", "correct horse", "bob@example.com") }

fn violation(err: &Error) -> Option<ConstraintViolation> { err.constraint_violation() }

// ─── Schema parity ───────────────────────────────────────────────────────────

/// `(name, notnull, pk)` triples as reported by `PRAGMA table_info`.
async fn table_info(s: &SqliteStore, table: &'static str) -> Vec<(String, bool, i64)> {
  s.conn
    .call(move |conn| {
      let mut stmt = conn.prepare(&format!(r#"PRAGMA table_info("{table}")"#))?;
      let rows = stmt
        .query_map([], |row| Ok((row.get(1)?, row.get(3)?, row.get(5)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
      Ok(rows)
    })
    .await
    .unwrap()
}

fn expected_info(table: &TableDef) -> Vec<(String, bool, i64)> {
  let pk = table.primary_key();
  table
    .columns
    .iter()
    .map(|c| {
      let pk_pos = pk
        .iter()
        .position(|name| *name == c.name)
        .map_or(0, |i| i as i64 + 1);
      (c.name.to_owned(), !c.nullable, pk_pos)
    })
    .collect()
}

#[tokio::test]
async fn tables_match_descriptors() {
  let s = store().await;
  for table in schema::TABLES {
    assert_eq!(
      table_info(&s, table.name).await,
      expected_info(table),
      "{} drifted from its descriptor",
      table.name
    );
  }
}

#[tokio::test]
async fn foreign_key_actions_match_descriptors() {
  let s = store().await;
  let fks: Vec<(String, String, String, String, String)> = s
    .conn
    .call(|conn| {
      let mut out = Vec::new();
      for table in ["LoginInstances", "ForumPosts"] {
        let mut stmt =
          conn.prepare(&format!(r#"PRAGMA foreign_key_list("{table}")"#))?;
        let rows = stmt
          .query_map([], |row| {
            Ok((row.get(3)?, row.get(2)?, row.get(4)?, row.get(5)?, row.get(6)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        out.extend(rows);
      }
      Ok(out)
    })
    .await
    .unwrap();

  for table in [&schema::LOGIN_INSTANCE, &schema::FORUM_POST] {
    let (column, fk) = table
      .columns
      .iter()
      .find_map(|c| c.references.map(|fk| (c.name, fk)))
      .unwrap();
    let found = fks
      .iter()
      .find(|(from, ..)| from == column)
      .expect("foreign key present");
    assert_eq!(found.1, fk.table);
    assert_eq!(found.2, fk.column);
    assert_eq!(found.3, fk.on_update.as_sql());
    assert_eq!(found.4, fk.on_delete.as_sql());
  }
}

#[tokio::test]
async fn foreign_keys_are_enforced() {
  let s = store().await;
  let on: i64 = s
    .conn
    .call(|conn| Ok(conn.query_row("PRAGMA foreign_keys", [], |r| r.get(0))?))
    .await
    .unwrap();
  assert_eq!(on, 1);
}

#[tokio::test]
async fn reopening_a_file_keeps_rows() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("ecodnp");

  let first = SqliteStore::open(&path).await.unwrap();
  let person = first.create_person(alice()).await.unwrap();
  drop(first);

  let second = SqliteStore::open(&path).await.unwrap();
  let fetched = second.get_person(person.user_id).await.unwrap();
  assert_eq!(fetched, Some(person));
}

#[tokio::test]
async fn reads_rows_written_with_stored_timestamp_format() {
  let s = store().await;
  s.conn
    .call(|conn| {
      conn.execute(
        r#"INSERT INTO "People"
             ("username", "password", "email", "createdAt", "updatedAt")
           VALUES ('legacy', 'pw', 'legacy@example.com',
                   '2023-11-02 08:30:00.250 +00:00', '2023-11-02 08:30:00.250 +00:00')"#,
        [],
      )?;
      Ok(())
    })
    .await
    .unwrap();

  let person = s.find_person_by_username("legacy").await.unwrap().unwrap();
  assert_eq!(person.score, 0);
  assert!(!person.is_forum_contributor);
  assert_eq!(
    person.created_at.to_rfc3339(),
    "2023-11-02T08:30:00.250+00:00"
  );
}

// ─── People ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_person_applies_defaults() {
  let s = store().await;
  let person = s.create_person(alice()).await.unwrap();

  assert_eq!(person.username, "alice");
  assert_eq!(person.password, "hunter2");
  assert_eq!(person.email, "alice@example.com");
  assert_eq!(person.score, 0);
  assert!(!person.is_forum_contributor);
  assert_eq!(person.created_at, person.updated_at);

  let fetched = s.get_person(person.user_id).await.unwrap();
  assert_eq!(fetched, Some(person));
}

#[tokio::test]
async fn user_ids_autoincrement() {
  let s = store().await;
  let a = s.create_person(alice()).await.unwrap();
  let b = s.create_person(bob()).await.unwrap();
  assert!(b.user_id > a.user_id);
}

#[tokio::test]
async fn duplicate_username_is_a_unique_violation() {
  let s = store().await;
  s.create_person(alice()).await.unwrap();

  let err = s
    .create_person(NewPerson::new("alice", "x", "other@example.com"))
    .await
    .unwrap_err();
  assert_eq!(violation(&err), Some(ConstraintViolation::Unique));
}

#[tokio::test]
async fn duplicate_email_is_a_unique_violation() {
  let s = store().await;
  s.create_person(alice()).await.unwrap();

  let err = s
    .create_person(NewPerson::new("alicia", "x", "alice@example.com"))
    .await
    .unwrap_err();
  assert_eq!(violation(&err), Some(ConstraintViolation::Unique));
  assert_eq!(s.list_people().await.unwrap().len(), 1);
}

#[tokio::test]
async fn find_by_username_and_email() {
  let s = store().await;
  let a = s.create_person(alice()).await.unwrap();
  s.create_person(bob()).await.unwrap();

  let by_name = s.find_person_by_username("alice").await.unwrap();
  assert_eq!(by_name.map(|p| p.user_id), Some(a.user_id));

  let by_email = s.find_person_by_email("alice@example.com").await.unwrap();
  assert_eq!(by_email.map(|p| p.user_id), Some(a.user_id));

  assert!(s.find_person_by_username("carol").await.unwrap().is_none());
}

#[tokio::test]
async fn get_missing_person_returns_none() {
  let s = store().await;
  assert!(s.get_person(42).await.unwrap().is_none());
}

#[tokio::test]
async fn add_score_accumulates() {
  let s = store().await;
  let a = s.create_person(alice()).await.unwrap();

  s.add_score(a.user_id, 10).await.unwrap();
  let updated = s.add_score(a.user_id, -3).await.unwrap().unwrap();
  assert_eq!(updated.score, 7);
  assert!(updated.updated_at >= a.updated_at);
  assert_eq!(updated.created_at, a.created_at);

  assert!(s.add_score(999, 1).await.unwrap().is_none());
}

#[tokio::test]
async fn add_score_overflow_leaves_row_readable() {
  let s = store().await;
  let a = s.create_person(alice()).await.unwrap();

  let maxed = s.add_score(a.user_id, i32::MAX).await.unwrap().unwrap();
  assert_eq!(maxed.score, i32::MAX);

  let err = s.add_score(a.user_id, 1).await.unwrap_err();
  assert!(
    matches!(err, Error::ScoreOutOfRange { user_id, score }
      if user_id == a.user_id && score == i64::from(i32::MAX) + 1),
    "{err}"
  );
  assert_eq!(violation(&err), None);

  let person = s.get_person(a.user_id).await.unwrap().unwrap();
  assert_eq!(person.score, i32::MAX);
  assert_eq!(person.updated_at, maxed.updated_at);
  assert_eq!(s.list_people().await.unwrap().len(), 1);
  assert_eq!(s.leaderboard(1).await.unwrap()[0].score, i32::MAX);

  let back = s.add_score(a.user_id, i32::MIN).await.unwrap().unwrap();
  assert_eq!(back.score, -1);
  let err = s.add_score(a.user_id, i32::MIN).await.unwrap_err();
  assert!(matches!(err, Error::ScoreOutOfRange { .. }));
  assert_eq!(s.get_person(a.user_id).await.unwrap().unwrap().score, -1);
}

#[tokio::test]
async fn set_forum_contributor_toggles() {
  let s = store().await;
  let a = s.create_person(alice()).await.unwrap();

  let on = s.set_forum_contributor(a.user_id, true).await.unwrap().unwrap();
  assert!(on.is_forum_contributor);

  let off = s.set_forum_contributor(a.user_id, false).await.unwrap().unwrap();
  assert!(!off.is_forum_contributor);

  assert!(s.set_forum_contributor(999, true).await.unwrap().is_none());
}

#[tokio::test]
async fn leaderboard_orders_by_score_then_id() {
  let s = store().await;
  let a = s.create_person(alice()).await.unwrap();
  let b = s.create_person(bob()).await.unwrap();
  let c = s
    .create_person(NewPerson::new("carol", "pw", "carol@example.com"))
    .await
    .unwrap();

  s.add_score(b.user_id, 5).await.unwrap();
  s.add_score(c.user_id, 5).await.unwrap();
  s.add_score(a.user_id, 1).await.unwrap();

  let top: Vec<_> = s
    .leaderboard(2)
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.user_id)
    .collect();
  assert_eq!(top, [b.user_id, c.user_id]);

  let all = s.leaderboard(10).await.unwrap();
  assert_eq!(all.len(), 3);
  assert_eq!(all[2].user_id, a.user_id);
}

// ─── Logins ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_roundtrip() {
  let s = store().await;
  let a = s.create_person(alice()).await.unwrap();

  let login = s
    .create_login(NewLoginInstance::generate(a.user_id))
    .await
    .unwrap();
  assert_eq!(login.user_id, a.user_id);

  let fetched = s.get_login(&login.login_id).await.unwrap();
  assert_eq!(fetched, Some(login.clone()));

  assert!(s.delete_login(&login.login_id).await.unwrap());
  assert!(!s.delete_login(&login.login_id).await.unwrap());
  assert!(s.get_login(&login.login_id).await.unwrap().is_none());
}

#[tokio::test]
async fn login_for_unknown_user_is_a_foreign_key_violation() {
  let s = store().await;
  let err = s
    .create_login(NewLoginInstance::new("token", 404))
    .await
    .unwrap_err();
  assert_eq!(violation(&err), Some(ConstraintViolation::ForeignKey));
}

#[tokio::test]
async fn duplicate_login_id_is_a_unique_violation() {
  let s = store().await;
  let a = s.create_person(alice()).await.unwrap();
  s.create_login(NewLoginInstance::new("token", a.user_id))
    .await
    .unwrap();

  let err = s
    .create_login(NewLoginInstance::new("token", a.user_id))
    .await
    .unwrap_err();
  assert_eq!(violation(&err), Some(ConstraintViolation::Unique));
}

#[tokio::test]
async fn deleting_person_cascades_to_logins() {
  let s = store().await;
  let a = s.create_person(alice()).await.unwrap();
  let b = s.create_person(bob()).await.unwrap();

  s.create_login(NewLoginInstance::new("a-1", a.user_id)).await.unwrap();
  s.create_login(NewLoginInstance::new("a-2", a.user_id)).await.unwrap();
  s.create_login(NewLoginInstance::new("b-1", b.user_id)).await.unwrap();
  assert_eq!(s.list_logins(a.user_id).await.unwrap().len(), 2);

  assert!(s.delete_person(a.user_id).await.unwrap());

  assert!(s.list_logins(a.user_id).await.unwrap().is_empty());
  assert!(s.get_login("a-1").await.unwrap().is_none());
  assert!(s.get_login("b-1").await.unwrap().is_some());
}

#[tokio::test]
async fn changing_user_id_cascades_to_logins() {
  let s = store().await;
  let a = s.create_person(alice()).await.unwrap();
  s.create_login(NewLoginInstance::new("a-1", a.user_id)).await.unwrap();

  let old_id = a.user_id;
  s.conn
    .call(move |conn| {
      conn.execute(
        r#"UPDATE "People" SET "user_id" = 500 WHERE "user_id" = ?1"#,
        [old_id],
      )?;
      Ok(())
    })
    .await
    .unwrap();

  let login = s.get_login("a-1").await.unwrap().unwrap();
  assert_eq!(login.user_id, 500);
}

// ─── Relationships ───────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_relationship_is_a_unique_violation() {
  let s = store().await;
  s.create_relationship(1, 2).await.unwrap();

  let err = s.create_relationship(1, 2).await.unwrap_err();
  assert_eq!(violation(&err), Some(ConstraintViolation::Unique));
}

#[tokio::test]
async fn reverse_relationship_is_a_separate_row() {
  let s = store().await;
  let forward = s.create_relationship(1, 2).await.unwrap();
  let reverse = s.create_relationship(2, 1).await.unwrap();

  assert_ne!(forward.relationship_id, reverse.relationship_id);
  assert_eq!(s.list_relationships(1).await.unwrap().len(), 2);
}

#[tokio::test]
async fn relationship_ids_increase() {
  let s = store().await;
  let r1 = s.create_relationship(1, 2).await.unwrap();
  let r2 = s.create_relationship(1, 3).await.unwrap();
  let r3 = s.create_relationship(3, 3).await.unwrap();
  assert_eq!(r1.relationship_id, 1);
  assert_eq!(r2.relationship_id, 2);
  assert_eq!(r3.relationship_id, 3);
}

#[tokio::test]
async fn relationship_ids_follow_the_highest_live_row() {
  let s = store().await;
  s.create_relationship(1, 2).await.unwrap();
  let r2 = s.create_relationship(1, 3).await.unwrap();
  s.create_relationship(1, 4).await.unwrap();

  // A gap below the maximum stays a gap.
  assert!(s.delete_relationship(1, 3).await.unwrap());
  assert_eq!(s.create_relationship(2, 3).await.unwrap().relationship_id, 4);

  // Removing the maximum frees its id.
  assert!(s.delete_relationship(2, 3).await.unwrap());
  let again = s.create_relationship(3, 4).await.unwrap();
  assert_eq!(again.relationship_id, 4);
  assert_ne!(again.relationship_id, r2.relationship_id);
}

#[tokio::test]
async fn relationship_lookup_and_delete() {
  let s = store().await;
  s.create_relationship(1, 2).await.unwrap();
  s.create_relationship(3, 1).await.unwrap();
  s.create_relationship(4, 5).await.unwrap();

  let rel = s.get_relationship(1, 2).await.unwrap().unwrap();
  assert_eq!(rel.other(1), Some(2));
  assert!(s.get_relationship(2, 1).await.unwrap().is_none());

  let others: Vec<_> = s
    .list_relationships(1)
    .await
    .unwrap()
    .iter()
    .filter_map(|r| r.other(1))
    .collect();
  assert_eq!(others, [2, 3]);

  assert!(s.delete_relationship(1, 2).await.unwrap());
  assert!(!s.delete_relationship(1, 2).await.unwrap());
  assert_eq!(s.list_relationships(1).await.unwrap().len(), 1);
}

// ─── Forum posts ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn post_roundtrip() {
  let s = store().await;
  let a = s.create_person(alice()).await.unwrap();

  let untitled = s
    .create_post(NewForumPost::new(a.user_id, "first!"))
    .await
    .unwrap();
  assert_eq!(untitled.title, None);

  let titled = s
    .create_post(NewForumPost::new(a.user_id, "body").with_title("Hello"))
    .await
    .unwrap();
  assert_eq!(titled.title.as_deref(), Some("Hello"));
  assert!(titled.post_id > untitled.post_id);

  assert_eq!(s.get_post(titled.post_id).await.unwrap(), Some(titled));
}

#[tokio::test]
async fn post_for_unknown_creator_is_a_foreign_key_violation() {
  let s = store().await;
  let err = s
    .create_post(NewForumPost::new(77, "orphan"))
    .await
    .unwrap_err();
  assert_eq!(violation(&err), Some(ConstraintViolation::ForeignKey));
}

#[tokio::test]
async fn list_posts_filters_by_creator() {
  let s = store().await;
  let a = s.create_person(alice()).await.unwrap();
  let b = s.create_person(bob()).await.unwrap();

  s.create_post(NewForumPost::new(a.user_id, "a1")).await.unwrap();
  s.create_post(NewForumPost::new(b.user_id, "b1")).await.unwrap();
  s.create_post(NewForumPost::new(a.user_id, "a2")).await.unwrap();

  assert_eq!(s.list_posts(None).await.unwrap().len(), 3);

  let mine: Vec<_> = s
    .list_posts(Some(a.user_id))
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.content)
    .collect();
  assert_eq!(mine, ["a1", "a2"]);
}

#[tokio::test]
async fn person_with_posts_cannot_be_deleted() {
  let s = store().await;
  let a = s.create_person(alice()).await.unwrap();
  let post = s
    .create_post(NewForumPost::new(a.user_id, "keep me"))
    .await
    .unwrap();

  let err = s.delete_person(a.user_id).await.unwrap_err();
  assert_eq!(violation(&err), Some(ConstraintViolation::ForeignKey));

  assert!(s.delete_post(post.post_id).await.unwrap());
  assert!(s.delete_person(a.user_id).await.unwrap());
}

#[tokio::test]
async fn store_debug_hides_connection() {
  let s = store().await;
  assert_eq!(format!("{s:?}"), "SqliteStore { .. }");
}

#[test]
fn non_constraint_errors_are_unclassified() {
  let err = Error::DateParse("nope".into());
  assert_eq!(violation(&err), None);
}
