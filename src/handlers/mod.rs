// API endpoint handlers

pub mod health;
pub mod items;
pub mod metrics;

use std::sync::Arc;

#[cfg(feature = "cache-redis")]
use crate::cache::CacheManager;
use crate::db::DbPool;
use crate::health::HealthChecker;
use crate::services::item_service::ItemService;

/// Shared state available to request handlers
pub struct AppContext {
    pub items: ItemService,
    pub db: DbPool,
    #[cfg(feature = "cache-redis")]
    pub cache: Option<CacheManager>,
    pub checker: HealthChecker,
}

pub type AppState = Arc<AppContext>;
