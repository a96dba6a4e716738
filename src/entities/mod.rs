//! Entities module - domain entities
//!
//! Every entity maps to one table in the database.

pub mod resource;

// Re-exports for easier imports
pub use resource::Resource;
