// Database access for the item service

pub mod pool;
pub mod repositories;

pub use pool::DbPool;
pub use repositories::Repositories;
