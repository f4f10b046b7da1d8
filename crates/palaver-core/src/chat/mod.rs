//! Chat store: repository trait, first-login seeder, and service.

pub mod repository;
pub mod seed;
pub mod service;
