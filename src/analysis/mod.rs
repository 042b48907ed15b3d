//! Analysis modules.
//!
//! Aggregation queries over the sales dataset and the router that picks
//! one of them for a parsed query.

pub mod aggregator;
pub mod router;

pub use aggregator::*;
pub use router::*;
