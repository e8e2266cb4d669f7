//! Database configuration, read from the process environment.
//!
//! Two unprefixed variables are consulted: `DATABASE_URL` selects the remote
//! PostgreSQL store, and `SQLITE_DBS_LOCATION` names the directory of the
//! local fallback file. Empty values count as unset.

use std::path::PathBuf;

use serde::Deserialize;

use crate::Result;

/// File name of the local fallback database inside `SQLITE_DBS_LOCATION`.
pub const STORAGE_FILE_NAME: &str = "ecodnp";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
  /// `DATABASE_URL`.
  #[serde(default)]
  pub database_url:        Option<String>,
  /// `SQLITE_DBS_LOCATION`.
  #[serde(default)]
  pub sqlite_dbs_location: Option<PathBuf>,
}

/// Which store [`connect`](crate::connect) will open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
  Postgres { url: String },
  Sqlite { path: PathBuf },
}

impl DatabaseConfig {
  /// Read the configuration from the process environment.
  pub fn from_env() -> Result<Self> { Self::load(None) }

  /// Read the configuration from an explicit set of variables instead of the
  /// process environment.
  pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    let map = vars
      .into_iter()
      .map(|(k, v)| (k.into(), v.into()))
      .collect::<::config::Map<String, String>>();
    Self::load(Some(map))
  }

  fn load(source: Option<::config::Map<String, String>>) -> Result<Self> {
    let settings = ::config::Config::builder()
      .add_source(::config::Environment::default().source(source))
      .build()?;
    Ok(settings.try_deserialize()?)
  }

  /// Remote when a connection URL is configured, otherwise the local file.
  pub fn backend(&self) -> Backend {
    match self.database_url.as_deref().map(str::trim) {
      Some(url) if !url.is_empty() => Backend::Postgres { url: url.to_owned() },
      _ => Backend::Sqlite { path: self.sqlite_path() },
    }
  }

  /// `{SQLITE_DBS_LOCATION or "."}/ecodnp`.
  pub fn sqlite_path(&self) -> PathBuf {
    let dir = self
      .sqlite_dbs_location
      .as_ref()
      .filter(|d| !d.as_os_str().is_empty())
      .cloned()
      .unwrap_or_else(|| PathBuf::from("."));
    dir.join(STORAGE_FILE_NAME)
  }
}
