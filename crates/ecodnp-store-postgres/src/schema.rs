//! SQL schema for the ecodnp PostgreSQL store.
//!
//! Sent as one simple-protocol batch on connect. Names, types and constraints
//! are shared with databases written by earlier deployments and must stay in
//! step with `ecodnp_core::schema`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS "People" (
    "user_id"              SERIAL                   UNIQUE,
    "username"             VARCHAR(255)             NOT NULL UNIQUE,
    "password"             VARCHAR(255)             NOT NULL,
    "score"                INTEGER                  NOT NULL DEFAULT 0,
    "email"                VARCHAR(255)             NOT NULL UNIQUE,
    "is_forum_contributor" BOOLEAN                  NOT NULL DEFAULT false,
    "createdAt"            TIMESTAMP WITH TIME ZONE NOT NULL,
    "updatedAt"            TIMESTAMP WITH TIME ZONE NOT NULL,
    PRIMARY KEY ("user_id")
);

CREATE TABLE IF NOT EXISTS "LoginInstances" (
    "login_id"  VARCHAR(255)             NOT NULL UNIQUE,
    "user_id"   INTEGER                  NOT NULL
                REFERENCES "People" ("user_id") ON DELETE CASCADE ON UPDATE CASCADE,
    "createdAt" TIMESTAMP WITH TIME ZONE NOT NULL,
    "updatedAt" TIMESTAMP WITH TIME ZONE NOT NULL,
    PRIMARY KEY ("login_id")
);

CREATE TABLE IF NOT EXISTS "Relationships" (
    "relationship_id" SERIAL                   UNIQUE,
    "first_user_id"   INTEGER                  NOT NULL,
    "second_user_id"  INTEGER                  NOT NULL,
    "createdAt"       TIMESTAMP WITH TIME ZONE NOT NULL,
    "updatedAt"       TIMESTAMP WITH TIME ZONE NOT NULL,
    PRIMARY KEY ("first_user_id", "second_user_id")
);

CREATE UNIQUE INDEX IF NOT EXISTS "relationships_first_user_id_second_user_id"
    ON "Relationships" ("first_user_id", "second_user_id");

CREATE TABLE IF NOT EXISTS "ForumPosts" (
    "post_id"    SERIAL                   UNIQUE,
    "creator_id" INTEGER                  NOT NULL REFERENCES "People" ("user_id"),
    "content"    VARCHAR(255)             NOT NULL,
    "title"      VARCHAR(255),
    "createdAt"  TIMESTAMP WITH TIME ZONE NOT NULL,
    "updatedAt"  TIMESTAMP WITH TIME ZONE NOT NULL,
    PRIMARY KEY ("post_id")
);
"#;
