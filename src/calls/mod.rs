//! Call filtering and statistics core.
//!
//! Pure, synchronous transformations over an in-memory list of call
//! records: filtering by user criteria, counting into fixed recency
//! windows, and computing summary statistics.

pub mod anchors;
pub mod buckets;
pub mod filter;
pub mod summary;
pub mod types;

pub use anchors::*;
pub use buckets::*;
pub use filter::*;
pub use summary::*;
pub use types::*;
