use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::{items, prelude::Items};
use crate::models::{ItemCreate, ItemUpdate};

/// Repository for item persistence operations
pub struct ItemRepository {
    db: DatabaseConnection,
}

impl ItemRepository {
    /// Creates a new item repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns a page of items, newest first
    pub async fn find_all(&self, skip: u64, limit: u64) -> Result<Vec<items::Model>, DbErr> {
        Items::find()
            .order_by_desc(items::Column::CreatedAt)
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await
    }

    /// Finds an item by its identifier
    pub async fn find_by_id(&self, id: &str) -> Result<Option<items::Model>, DbErr> {
        Items::find_by_id(id.to_string()).one(&self.db).await
    }

    /// Inserts a new item, assigning id and timestamps
    pub async fn create(&self, payload: &ItemCreate) -> Result<items::Model, DbErr> {
        let now = Utc::now();
        let item = items::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(payload.name.clone()),
            description: Set(payload.description.clone()),
            price: Set(payload.price),
            is_active: Set(payload.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        item.insert(&self.db).await
    }

    /// Applies the provided fields to an existing item
    ///
    /// Returns `None` when no item with the given id exists.
    pub async fn update(
        &self,
        id: &str,
        changes: &ItemUpdate,
    ) -> Result<Option<items::Model>, DbErr> {
        let existing = match self.find_by_id(id).await? {
            Some(model) => model,
            None => return Ok(None),
        };

        let mut item: items::ActiveModel = existing.into();
        if let Some(name) = &changes.name {
            item.name = Set(name.clone());
        }
        if let Some(description) = &changes.description {
            item.description = Set(Some(description.clone()));
        }
        if let Some(price) = changes.price {
            item.price = Set(price);
        }
        if let Some(is_active) = changes.is_active {
            item.is_active = Set(is_active);
        }
        item.updated_at = Set(Utc::now());

        let updated = item.update(&self.db).await?;
        Ok(Some(updated))
    }

    /// Deletes an item, returning whether a row was removed
    pub async fn delete(&self, id: &str) -> Result<bool, DbErr> {
        let result = Items::delete_by_id(id.to_string()).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
