//! Identity: user repository trait and OAuth login service.

pub mod repository;
pub mod service;
