use sea_orm::DbErr;
use std::sync::Arc;

use crate::db::repositories::ItemRepository;
use crate::entity::items::Model as Item;
use crate::models::{ItemCreate, ItemUpdate};

/// Service for item-related operations
///
/// Delegates straight to the repository; the seam exists so policy can be
/// added without touching handlers.
pub struct ItemService {
    repository: Arc<ItemRepository>,
}

impl ItemService {
    /// Creates a new item service instance
    pub fn new(repository: Arc<ItemRepository>) -> Self {
        Self { repository }
    }

    /// Lists items with pagination
    pub async fn list_items(&self, skip: u64, limit: u64) -> Result<Vec<Item>, DbErr> {
        self.repository.find_all(skip, limit).await
    }

    /// Gets a single item by id
    pub async fn get_item(&self, id: &str) -> Result<Option<Item>, DbErr> {
        self.repository.find_by_id(id).await
    }

    /// Creates a new item
    pub async fn create_item(&self, payload: &ItemCreate) -> Result<Item, DbErr> {
        self.repository.create(payload).await
    }

    /// Updates an existing item
    pub async fn update_item(&self, id: &str, changes: &ItemUpdate) -> Result<Option<Item>, DbErr> {
        self.repository.update(id, changes).await
    }

    /// Deletes an item
    pub async fn delete_item(&self, id: &str) -> Result<bool, DbErr> {
        self.repository.delete(id).await
    }
}
