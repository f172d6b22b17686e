//! Database module: SQLite-backed plugin store.
//!
//! Layout:
//! - `actor.rs`: ractor actor owning the pool; its handle implements `PluginStore`
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)

pub mod actor;
pub mod schema;

pub use actor::{DbActorHandle, spawn};
