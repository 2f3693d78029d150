//! Analysis modules.
//!
//! Pure, side-effect free processing of submitted activity.

pub mod aggregator;

pub use aggregator::*;
