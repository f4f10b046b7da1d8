//! SQLite persistence layer.

pub mod chat;
pub mod message;
pub mod pool;
pub mod user;
