//! Evaluation metrics for candidate feature subsets.
//!
//! Only classification metrics live here: every fitness evaluation is a
//! macro-F1 over a held-out test fold.

pub mod classification;

pub use classification::{accuracy, confusion_matrix, f1_per_class, macro_f1};
