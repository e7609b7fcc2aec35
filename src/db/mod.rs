//! Database module: connection lifecycle, models, and schema.
//!
//! Layout:
//! - `connection.rs`: process-wide lazy connect / handle / close lifecycle
//! - `models.rs`: Rust structs mirroring DB rows and conversions
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: post CRUD over the pooled handle

pub mod connection;
pub mod models;
pub mod schema;
pub mod sqlite;

pub use connection::ConnectionManager;
pub use models::{NewPost, Post, PostStatus};
pub use schema::SQLITE_INIT;
pub use sqlite::{PostStorage, SqlitePool};
