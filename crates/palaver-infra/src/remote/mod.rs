//! HTTP clients for the external services.
//!
//! Each client implements the matching `palaver-core` fetcher trait. Avatar
//! and quote fetches never fail the caller; they degrade to fixed fallback
//! strings so chat creation and the auto-reply keep working offline.

pub mod avatar;
pub mod quote;
pub mod userinfo;

pub use avatar::DogApiClient;
pub use quote::ZenQuotesClient;
pub use userinfo::GoogleUserInfoClient;
