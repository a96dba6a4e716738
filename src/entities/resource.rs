//! Resource entity - the one persisted domain object

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Resource {
    /// Assigned by storage, never changes
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    /// Assigned by storage at creation
    pub created_at: DateTime<Utc>,
}
