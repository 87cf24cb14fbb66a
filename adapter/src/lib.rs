pub mod database;
pub mod notifier;
pub mod redis;
pub mod repository;
