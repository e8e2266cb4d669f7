//! SQL schema for the ecodnp SQLite store.
//!
//! Executed once at connection startup. Table and column names, types and
//! constraints are shared with databases written by earlier deployments, so
//! they must not drift from `ecodnp_core::schema`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS "People" (
    "user_id"              INTEGER      NOT NULL UNIQUE PRIMARY KEY AUTOINCREMENT,
    "username"             VARCHAR(255) NOT NULL UNIQUE,
    "password"             VARCHAR(255) NOT NULL,
    "score"                INTEGER      NOT NULL DEFAULT 0,
    "email"                VARCHAR(255) NOT NULL UNIQUE,
    "is_forum_contributor" TINYINT(1)   NOT NULL DEFAULT 0,
    "createdAt"            DATETIME     NOT NULL,
    "updatedAt"            DATETIME     NOT NULL
);

CREATE TABLE IF NOT EXISTS "LoginInstances" (
    "login_id"  VARCHAR(255) NOT NULL UNIQUE PRIMARY KEY,
    "user_id"   INTEGER      NOT NULL
                REFERENCES "People" ("user_id") ON DELETE CASCADE ON UPDATE CASCADE,
    "createdAt" DATETIME     NOT NULL,
    "updatedAt" DATETIME     NOT NULL
);

-- relationship_id is not the key, so SQLite cannot autoincrement it;
-- inserts assign MAX + 1.
CREATE TABLE IF NOT EXISTS "Relationships" (
    "relationship_id" INTEGER  NOT NULL UNIQUE,
    "first_user_id"   INTEGER  NOT NULL,
    "second_user_id"  INTEGER  NOT NULL,
    "createdAt"       DATETIME NOT NULL,
    "updatedAt"       DATETIME NOT NULL,
    PRIMARY KEY ("first_user_id", "second_user_id")
);

CREATE UNIQUE INDEX IF NOT EXISTS "relationships_first_user_id_second_user_id"
    ON "Relationships" ("first_user_id", "second_user_id");

CREATE TABLE IF NOT EXISTS "ForumPosts" (
    "post_id"    INTEGER      NOT NULL UNIQUE PRIMARY KEY AUTOINCREMENT,
    "creator_id" INTEGER      NOT NULL REFERENCES "People" ("user_id"),
    "content"    VARCHAR(255) NOT NULL,
    "title"      VARCHAR(255),
    "createdAt"  DATETIME     NOT NULL,
    "updatedAt"  DATETIME     NOT NULL
);
"#;
