//! Infrastructure implementations for Palaver.
//!
//! SQLite repositories over sqlx, reqwest clients for the external avatar,
//! quote, and OAuth userinfo services, the JWT signer, and env-based config.

pub mod auth;
pub mod config;
pub mod remote;
pub mod sqlite;
