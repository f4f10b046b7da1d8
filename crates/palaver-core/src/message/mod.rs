//! Message store: repository trait and service, including the delayed
//! auto-response orchestration.

pub mod repository;
pub mod service;
