//! CallTally - Call History Statistics Daemon
//!
//! Polls a call-history database, filters entries by direction,
//! duration, and allowlist, buckets them into fixed recency windows,
//! and serves the derived statistics over a loopback HTTP/WebSocket
//! API.

pub mod calls;
pub mod database;
pub mod monitor;
pub mod server;
pub mod source;
pub mod store;
