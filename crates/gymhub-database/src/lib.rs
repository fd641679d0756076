//! # gymhub-database
//!
//! Document store implementations (PostgreSQL JSONB and in-memory), the
//! storage document shapes persisted for each entity, and the repositories
//! services use to read and write them.

pub mod connection;
pub mod documents;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{MemoryDocumentStore, PgDocumentStore, build_store};
