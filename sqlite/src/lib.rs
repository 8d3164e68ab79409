//! Categorical SQLite - A mathematical SQLite implementation
//! 
//! This crate implements a SQLite-compatible database engine using category theory
//! and algebraic patterns for maximum correctness and compositionality.

pub mod types;
pub mod error;
pub mod parser;
pub mod btree;
pub mod page_cache;
pub mod query;
pub mod transaction;
pub mod schema;
pub mod engine;

pub use engine::CategoricalSQLite;
pub use error::{SqlError, SqlResult};
pub use types::{Value, Row, DataType};
