//! Route handlers module.

pub mod allowlist;
pub mod calls;
pub mod config;
pub mod health;
pub mod stats;
