// Database repository management

mod item_repository;

pub use item_repository::ItemRepository;

use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Container for all database repositories
pub struct Repositories {
    pub items: Arc<ItemRepository>,
}

impl Repositories {
    /// Creates a new repositories container with database connection
    pub fn new(conn: DatabaseConnection) -> Self {
        Repositories {
            items: Arc::new(ItemRepository::new(conn)),
        }
    }
}
