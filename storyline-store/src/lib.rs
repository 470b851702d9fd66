//! SQLite persistence for articles and story threads

pub mod sqlite;

pub use sqlite::SqliteStore;
