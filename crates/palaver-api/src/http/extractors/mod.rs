//! Request extractors for session identity.

pub mod owner;

pub use owner::{Owner, TokenUser};
