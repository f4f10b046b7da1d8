//! Session token signing and verification.

pub mod jwt;

pub use jwt::TokenSigner;
