//! Core types and trait definitions for the ecodnp data layer.
//!
//! This crate is deliberately free of database dependencies. Backends
//! (`ecodnp-store-sqlite`, `ecodnp-store-postgres`) implement [`Store`]; the
//! bootstrap crate (`ecodnp-db`) picks one at startup.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod record;
pub mod schema;
pub mod store;

pub use record::{
  ForumPost, LoginInstance, NewForumPost, NewLoginInstance, NewPerson, Person,
  PostId, Record, Relationship, UserId,
};
pub use store::{ConstraintViolation, Store};
