//! PostgreSQL backend for the ecodnp data layer.
//!
//! A [`sqlx`] connection pool with library-default sizing. Connections are
//! always encrypted but the server certificate is not verified, matching the
//! managed hosts this store is deployed against.

mod decode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{PgStore, connect_options};
