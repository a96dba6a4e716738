//! ResourceRepository - Repository for resource management

use super::{Create, Delete, Read, Update};
use crate::core::{Database, SqlParam, StorageError};
use crate::dtos::{NewResourceDTO, ResourceFilters, UpdateResourceDTO};
use crate::entities::Resource;
use tracing::{debug, error, info, instrument};

const SELECT_RESOURCES: &str =
    "SELECT id, name, description, category, created_at FROM resources";

const SELECT_RESOURCE_BY_ID: &str =
    "SELECT id, name, description, category, created_at FROM resources WHERE id = ?";

// RESOURCE REPOSITORY
pub struct ResourceRepository {
    db: Database,
}

impl ResourceRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Lists resources matching every supplied filter.
    /// `category` is an exact match, `name` a substring match (case handling
    /// follows SQLite's `LIKE`). No filters returns everything, in storage order.
    #[instrument(skip(self, filters), fields(category = ?filters.category, name = ?filters.name))]
    pub async fn find_all(&self, filters: &ResourceFilters) -> Result<Vec<Resource>, StorageError> {
        debug!("Listing resources");
        let filters = filters.clone().normalized();

        let mut conditions: Vec<&str> = Vec::new();
        let mut params: Vec<SqlParam> = Vec::new();

        if let Some(category) = filters.category {
            conditions.push("category = ?");
            params.push(category.into());
        }

        if let Some(name) = filters.name {
            conditions.push("name LIKE ?");
            params.push(format!("%{}%", name).into());
        }

        let mut sql = SELECT_RESOURCES.to_string();
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        let resources: Vec<Resource> = self.db.query_all(&sql, &params).await?;
        info!("Found {} resources", resources.len());
        Ok(resources)
    }
}

impl Create<Resource, NewResourceDTO> for ResourceRepository {
    #[instrument(skip(self, data), fields(name = %data.name, category = %data.category))]
    async fn create(&self, data: &NewResourceDTO) -> Result<Resource, StorageError> {
        debug!("Creating new resource");
        let mut tx = self.db.begin().await?;

        let result = tx
            .execute(
                "INSERT INTO resources (name, description, category) VALUES (?, ?, ?)",
                &[
                    data.name.as_str().into(),
                    data.description.as_str().into(),
                    data.category.as_str().into(),
                ],
            )
            .await?;

        let new_id = result.last_insert_id;

        // read back so id and created_at come from storage
        let created: Resource = tx
            .query_one(SELECT_RESOURCE_BY_ID, &[new_id.into()])
            .await?
            .ok_or_else(|| {
                error!("Resource {} missing right after insert", new_id);
                StorageError::Integrity(format!(
                    "Failed to retrieve created resource with id {}",
                    new_id
                ))
            })?;

        tx.commit().await?;

        info!("Resource created with id {}", created.id);
        Ok(created)
    }
}

impl Read<Resource, i64> for ResourceRepository {
    #[instrument(skip(self), fields(resource_id = %id))]
    async fn read(&self, id: &i64) -> Result<Option<Resource>, StorageError> {
        debug!("Reading resource");
        let resource = self
            .db
            .query_one(SELECT_RESOURCE_BY_ID, &[(*id).into()])
            .await?;

        if resource.is_none() {
            debug!("Resource not found");
        }
        Ok(resource)
    }
}

impl Update<Resource, UpdateResourceDTO, i64> for ResourceRepository {
    /// Returns `None` both when no field is supplied (storage is not touched)
    /// and when no row has the given id; callers that care tell them apart
    /// with `UpdateResourceDTO::is_empty` beforehand.
    #[instrument(skip(self, data), fields(resource_id = %id))]
    async fn update(
        &self,
        id: &i64,
        data: &UpdateResourceDTO,
    ) -> Result<Option<Resource>, StorageError> {
        let mut assignments: Vec<&str> = Vec::new();
        let mut params: Vec<SqlParam> = Vec::new();

        if let Some(ref name) = data.name {
            assignments.push("name = ?");
            params.push(name.as_str().into());
        }
        if let Some(ref description) = data.description {
            assignments.push("description = ?");
            params.push(description.as_str().into());
        }
        if let Some(ref category) = data.category {
            assignments.push("category = ?");
            params.push(category.as_str().into());
        }

        if assignments.is_empty() {
            debug!("Nothing to update");
            return Ok(None);
        }

        let sql = format!("UPDATE resources SET {} WHERE id = ?", assignments.join(", "));
        params.push((*id).into());

        let mut tx = self.db.begin().await?;
        let result = tx.execute(&sql, &params).await?;

        if result.rows_affected == 0 {
            debug!("No resource to update");
            return Ok(None);
        }

        let updated: Resource = tx
            .query_one(SELECT_RESOURCE_BY_ID, &[(*id).into()])
            .await?
            .ok_or_else(|| {
                error!("Resource {} missing right after update", id);
                StorageError::Integrity(format!(
                    "Failed to retrieve updated resource with id {}",
                    id
                ))
            })?;

        tx.commit().await?;

        info!("Resource {} updated ({} fields)", id, assignments.len());
        Ok(Some(updated))
    }
}

impl Delete<i64> for ResourceRepository {
    /// Hard delete
    #[instrument(skip(self), fields(resource_id = %id))]
    async fn delete(&self, id: &i64) -> Result<bool, StorageError> {
        let result = self
            .db
            .execute("DELETE FROM resources WHERE id = ?", &[(*id).into()])
            .await?;

        let deleted = result.rows_affected > 0;
        if deleted {
            info!("Resource deleted");
        } else {
            debug!("No resource to delete");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn repository() -> ResourceRepository {
        ResourceRepository::new(Database::in_memory().await.unwrap())
    }

    fn new_resource(name: &str, category: &str) -> NewResourceDTO {
        NewResourceDTO {
            name: name.to_string(),
            description: format!("{} description text", name),
            category: category.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamp() {
        let repo = repository().await;
        let created = repo.create(&new_resource("Desk lamp", "lighting")).await.unwrap();

        assert!(created.id > 0);
        assert_eq!(created.name, "Desk lamp");
        assert_eq!(created.category, "lighting");

        let read = repo.read(&created.id).await.unwrap().unwrap();
        assert_eq!(read, created);
        assert_eq!(read.description, "Desk lamp description text");
    }

    #[tokio::test]
    async fn test_read_missing_is_none() {
        let repo = repository().await;
        assert!(repo.read(&12345).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_all_filters_are_conjunctive() {
        let repo = repository().await;
        repo.create(&new_resource("Desk lamp", "lighting")).await.unwrap();
        repo.create(&new_resource("Floor lamp", "lighting")).await.unwrap();
        repo.create(&new_resource("Desk chair", "seating")).await.unwrap();

        let all = repo.find_all(&ResourceFilters::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let lighting = repo
            .find_all(&ResourceFilters {
                category: Some("lighting".to_string()),
                name: None,
            })
            .await
            .unwrap();
        assert_eq!(lighting.len(), 2);
        assert!(lighting.iter().all(|r| r.category == "lighting"));

        let desks = repo
            .find_all(&ResourceFilters {
                category: None,
                name: Some("Desk".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(desks.len(), 2);

        let desk_lighting = repo
            .find_all(&ResourceFilters {
                category: Some("lighting".to_string()),
                name: Some("Desk".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(desk_lighting.len(), 1);
        assert_eq!(desk_lighting[0].name, "Desk lamp");
    }

    #[tokio::test]
    async fn test_category_filter_is_exact() {
        let repo = repository().await;
        repo.create(&new_resource("Desk lamp", "lighting")).await.unwrap();

        let partial = repo
            .find_all(&ResourceFilters {
                category: Some("light".to_string()),
                name: None,
            })
            .await
            .unwrap();
        assert!(partial.is_empty());
    }

    #[tokio::test]
    async fn test_update_changes_only_supplied_fields() {
        let repo = repository().await;
        let created = repo.create(&new_resource("Desk lamp", "lighting")).await.unwrap();

        let changes = UpdateResourceDTO {
            category: Some("new-category".to_string()),
            ..Default::default()
        };
        let updated = repo.update(&created.id, &changes).await.unwrap().unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.category, "new-category");
    }

    #[tokio::test]
    async fn test_update_without_fields_is_none() {
        let repo = repository().await;
        let created = repo.create(&new_resource("Desk lamp", "lighting")).await.unwrap();

        let result = repo.update(&created.id, &UpdateResourceDTO::default()).await.unwrap();
        assert!(result.is_none());

        let unchanged = repo.read(&created.id).await.unwrap().unwrap();
        assert_eq!(unchanged, created);
    }

    #[tokio::test]
    async fn test_update_missing_is_none() {
        let repo = repository().await;
        let changes = UpdateResourceDTO {
            name: Some("Ghost".to_string()),
            ..Default::default()
        };
        assert!(repo.update(&999, &changes).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let repo = repository().await;
        let created = repo.create(&new_resource("Desk lamp", "lighting")).await.unwrap();

        assert!(repo.delete(&created.id).await.unwrap());
        assert!(!repo.delete(&created.id).await.unwrap());
        assert!(repo.read(&created.id).await.unwrap().is_none());
    }
}
