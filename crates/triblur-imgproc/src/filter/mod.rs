//! Filter operations
//!
//! Gaussian blur approximated by iterated box filtering.

/// Filter kernels
pub mod kernels;

/// Filter operations
mod ops;
pub use ops::*;

/// Sliding-window box filter sweeps
mod box_filter;
