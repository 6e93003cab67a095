//! Filter implementations for the filter pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod membership;
pub mod numeric_range;
pub mod release_window;

// Re-export for convenience
pub use membership::MembershipFilter;
pub use numeric_range::NumericRangeFilter;
pub use release_window::ReleaseWindowFilter;
