//! Common repository traits
//!
//! This module defines generic interfaces for database operations.

use crate::core::StorageError;

/// Trait for creating new entities in the database
///
/// # Type Parameters
/// * `Entity` - Type of the returned entity (with ID assigned by the database)
/// * `CreateDTO` - DTO for creation (without ID, will be automatically generated)
pub trait Create<Entity, CreateDTO> {
    /// Creates a new entity in the database
    ///
    /// # Returns
    /// * `Ok(Entity)` - Created entity with every server-assigned field populated
    /// * `Err(StorageError)` - Error during insertion, or the row could not be read back
    async fn create(&self, data: &CreateDTO) -> Result<Entity, StorageError>;
}

/// Trait for reading a single entity by primary key
pub trait Read<Entity, Id> {
    /// # Returns
    /// * `Ok(Some(Entity))` - Entity found
    /// * `Ok(None)` - No entity with that ID
    /// * `Err(StorageError)` - Error during reading
    async fn read(&self, id: &Id) -> Result<Option<Entity>, StorageError>;
}

/// Trait for partial updates of existing entities
///
/// # Type Parameters
/// * `Entity` - Type of the updated entity
/// * `UpdateDTO` - DTO for updating (only `Some(_)` fields are modified)
/// * `Id` - Type of the primary key
pub trait Update<Entity, UpdateDTO, Id> {
    /// # Returns
    /// * `Ok(Some(Entity))` - Entity after the update
    /// * `Ok(None)` - Nothing to update, or no entity with that ID
    /// * `Err(StorageError)` - Error during update
    async fn update(&self, id: &Id, data: &UpdateDTO) -> Result<Option<Entity>, StorageError>;
}

/// Trait for deleting entities
pub trait Delete<Id> {
    /// # Returns
    /// * `Ok(true)` - A row was removed
    /// * `Ok(false)` - No entity with that ID
    /// * `Err(StorageError)` - Error during deletion
    async fn delete(&self, id: &Id) -> Result<bool, StorageError>;
}
