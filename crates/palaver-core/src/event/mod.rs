//! Realtime event distribution.

pub mod bus;
