//! Report generation.
//!
//! Turns aggregated, classified activity into detail records and the
//! response returned to the extension.

pub mod builder;
pub mod composer;

pub use builder::build_records;
pub use composer::{compose, empty_report};
