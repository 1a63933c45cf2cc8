//! CRUD microservice skeleton: an item resource backed by Postgres,
//! infrastructure health aggregation, and operational endpoints.

#[cfg(feature = "cache-redis")]
pub mod cache;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod health;
pub mod metrics;
pub mod models;
pub mod services;
