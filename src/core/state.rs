//! Application State - shared state handed to every route
//!
//! Holds the repositories built on top of an injected [`Database`]; there is
//! no process-wide connection singleton.

use super::database::Database;
use crate::repositories::ResourceRepository;

/// Global application state shared across routes and middleware
pub struct AppState {
    /// Repository for resource management
    pub resource: ResourceRepository,
}

impl AppState {
    /// Builds the state from an already connected database
    ///
    /// # Arguments
    /// * `db` - Persistence adapter shared by the repositories
    pub fn new(db: Database) -> Self {
        Self {
            resource: ResourceRepository::new(db),
        }
    }
}
