//! Repositories module - database operations per entity
//!
//! Repositories talk to the persistence adapter (`core::database`) with plain
//! SQL and `?` placeholders; rows are decoded through `sqlx::FromRow`.
//! A create or update writes and re-reads inside one transaction so the
//! returned entity always reflects the committed row.

pub mod resource;
pub mod traits;

// Re-export traits for easier imports
pub use traits::{Create, Delete, Read, Update};

pub use resource::ResourceRepository;
