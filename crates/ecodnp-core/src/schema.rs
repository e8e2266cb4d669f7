//! Static descriptors for the four persisted tables.
//!
//! Schema is plain data here: names, column types, nullability, uniqueness,
//! defaults and foreign-key actions. Backends carry their own hand-written DDL
//! and test it against these descriptors.

use serde::Serialize;

// ─── Descriptor types ────────────────────────────────────────────────────────

/// Logical column type, independent of SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
  Integer,
  /// `VARCHAR(255)`.
  String,
  Boolean,
  /// Timestamp with time zone.
  Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DefaultValue {
  Integer(i64),
  Boolean(bool),
}

/// What happens to a referencing row when the referenced key changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferentialAction {
  NoAction,
  Cascade,
}

impl ReferentialAction {
  pub fn as_sql(self) -> &'static str {
    match self {
      ReferentialAction::NoAction => "NO ACTION",
      ReferentialAction::Cascade => "CASCADE",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ForeignKey {
  pub table:     &'static str,
  pub column:    &'static str,
  pub on_update: ReferentialAction,
  pub on_delete: ReferentialAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
  pub name:           &'static str,
  pub ty:             ColumnType,
  pub nullable:       bool,
  pub unique:         bool,
  pub primary_key:    bool,
  pub auto_increment: bool,
  pub default:        Option<DefaultValue>,
  pub references:     Option<ForeignKey>,
}

impl ColumnDef {
  const fn new(name: &'static str, ty: ColumnType) -> Self {
    Self {
      name,
      ty,
      nullable: true,
      unique: false,
      primary_key: false,
      auto_increment: false,
      default: None,
      references: None,
    }
  }

  const fn required(mut self) -> Self {
    self.nullable = false;
    self
  }

  const fn unique(mut self) -> Self {
    self.unique = true;
    self
  }

  const fn primary_key(mut self) -> Self {
    self.primary_key = true;
    self.nullable = false;
    self
  }

  const fn auto_increment(mut self) -> Self {
    self.auto_increment = true;
    self
  }

  const fn default(mut self, value: DefaultValue) -> Self {
    self.default = Some(value);
    self
  }

  const fn references(mut self, fk: ForeignKey) -> Self {
    self.references = Some(fk);
    self
  }
}

/// A multi-column unique index declared alongside the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UniqueIndex {
  pub name:    &'static str,
  pub columns: &'static [&'static str],
}

/// One persisted table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableDef {
  /// Table name as stored in the database.
  pub name:    &'static str,
  /// Singular record name.
  pub model:   &'static str,
  pub columns: &'static [ColumnDef],
  pub indexes: &'static [UniqueIndex],
}

impl TableDef {
  pub fn column(&self, name: &str) -> Option<&ColumnDef> {
    self.columns.iter().find(|c| c.name == name)
  }

  /// Primary-key column names in declaration order.
  pub fn primary_key(&self) -> Vec<&'static str> {
    self
      .columns
      .iter()
      .filter(|c| c.primary_key)
      .map(|c| c.name)
      .collect()
  }

  pub fn column_names(&self) -> Vec<&'static str> {
    self.columns.iter().map(|c| c.name).collect()
  }
}

// ─── Tables ──────────────────────────────────────────────────────────────────

pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";

const CREATED_AT_COLUMN: ColumnDef =
  ColumnDef::new(CREATED_AT, ColumnType::Timestamp).required();
const UPDATED_AT_COLUMN: ColumnDef =
  ColumnDef::new(UPDATED_AT, ColumnType::Timestamp).required();

const PERSON_KEY: ForeignKey = ForeignKey {
  table:     "People",
  column:    "user_id",
  on_update: ReferentialAction::Cascade,
  on_delete: ReferentialAction::Cascade,
};

pub const PERSON: TableDef = TableDef {
  name:    "People",
  model:   "Person",
  columns: &[
    ColumnDef::new("user_id", ColumnType::Integer)
      .primary_key()
      .unique()
      .auto_increment(),
    ColumnDef::new("username", ColumnType::String).required().unique(),
    ColumnDef::new("password", ColumnType::String).required(),
    ColumnDef::new("score", ColumnType::Integer)
      .required()
      .default(DefaultValue::Integer(0)),
    ColumnDef::new("email", ColumnType::String).required().unique(),
    ColumnDef::new("is_forum_contributor", ColumnType::Boolean)
      .required()
      .default(DefaultValue::Boolean(false)),
    CREATED_AT_COLUMN,
    UPDATED_AT_COLUMN,
  ],
  indexes: &[],
};

pub const LOGIN_INSTANCE: TableDef = TableDef {
  name:    "LoginInstances",
  model:   "LoginInstance",
  columns: &[
    ColumnDef::new("login_id", ColumnType::String).primary_key().unique(),
    ColumnDef::new("user_id", ColumnType::Integer)
      .required()
      .references(PERSON_KEY),
    CREATED_AT_COLUMN,
    UPDATED_AT_COLUMN,
  ],
  indexes: &[],
};

pub const RELATIONSHIP: TableDef = TableDef {
  name:    "Relationships",
  model:   "Relationship",
  columns: &[
    ColumnDef::new("relationship_id", ColumnType::Integer)
      .required()
      .unique()
      .auto_increment(),
    ColumnDef::new("first_user_id", ColumnType::Integer).primary_key(),
    ColumnDef::new("second_user_id", ColumnType::Integer).primary_key(),
    CREATED_AT_COLUMN,
    UPDATED_AT_COLUMN,
  ],
  indexes: &[UniqueIndex {
    name:    "relationships_first_user_id_second_user_id",
    columns: &["first_user_id", "second_user_id"],
  }],
};

pub const FORUM_POST: TableDef = TableDef {
  name:    "ForumPosts",
  model:   "ForumPost",
  columns: &[
    ColumnDef::new("post_id", ColumnType::Integer)
      .primary_key()
      .unique()
      .auto_increment(),
    // No cascade: a person with posts cannot be deleted.
    ColumnDef::new("creator_id", ColumnType::Integer)
      .required()
      .references(ForeignKey {
        on_update: ReferentialAction::NoAction,
        on_delete: ReferentialAction::NoAction,
        ..PERSON_KEY
      }),
    ColumnDef::new("content", ColumnType::String).required(),
    ColumnDef::new("title", ColumnType::String),
    CREATED_AT_COLUMN,
    UPDATED_AT_COLUMN,
  ],
  indexes: &[],
};

/// All tables, in creation order (referenced tables first).
pub const TABLES: [&TableDef; 4] =
  [&PERSON, &LOGIN_INSTANCE, &RELATIONSHIP, &FORUM_POST];

/// Look a table up by its table name (`"People"`) or model name (`"Person"`).
pub fn table(name: &str) -> Option<&'static TableDef> {
  TABLES
    .into_iter()
    .find(|t| t.name.eq_ignore_ascii_case(name) || t.model.eq_ignore_ascii_case(name))
}
