//! Request handlers grouped by resource.

pub mod auth;
pub mod chat;
pub mod message;
pub mod ws;
