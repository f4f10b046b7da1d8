//! Shared domain types for Palaver.
//!
//! This crate holds the entity types, realtime events, and error enums used
//! across the workspace. It carries no business logic and no I/O.

pub mod chat;
pub mod error;
pub mod event;
pub mod identity;
