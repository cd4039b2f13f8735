//! Periodic call log refresh.

pub mod poller;

pub use poller::*;
