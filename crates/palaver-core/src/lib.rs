//! Business logic for Palaver.
//!
//! Services here are generic over repository and collaborator traits so the
//! crate never depends on palaver-infra. Concrete SQLite repositories and
//! reqwest clients are wired in by the API crate.

pub mod chat;
pub mod event;
pub mod identity;
pub mod message;
pub mod remote;

#[cfg(test)]
pub(crate) mod test_support;
