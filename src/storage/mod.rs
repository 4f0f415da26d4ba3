//! Storage layer for the speed-ranking engine.
//!
//! A clean abstraction over the SQLite record store, organized into
//! logical components:
//! - `models`: Data structures
//! - `schema`: Database connection and schema management
//! - `queries`: Record inserts, loaders and the opponent directory
//! - `estimates`: Cached speed-estimate upsert and lookup

pub mod estimates;
pub mod models;
pub mod queries;
pub mod schema;


// Re-export the main types and database struct for easy access
pub use models::*;
pub use schema::{RegattaDatabase, DB_PATH_ENV_VAR};
