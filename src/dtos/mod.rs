//! DTOs module - Data Transfer Objects
//!
//! DTOs keep the external (API) representation apart from the entities.

pub mod query;
pub mod resource;

// Re-exports for easier imports
pub use query::ResourceFilters;
pub use resource::{
    CreateResourceDTO, CreateResourceRequest, MessageDTO, NewResourceDTO, ResourceIdParams,
    ResourceIdRequest, UpdateResourceDTO, UpdateResourceRequest,
};
