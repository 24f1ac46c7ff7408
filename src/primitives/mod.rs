//! Core compute primitives.
//!
//! The row-major [`Matrix`] backs feature tables, class-probability
//! outputs and confusion matrices alike.

mod matrix;
mod random;

pub use matrix::Matrix;
pub(crate) use random::randn;
