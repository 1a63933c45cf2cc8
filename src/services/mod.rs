// Business logic service implementations

pub mod item_service;
