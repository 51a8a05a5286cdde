//! Discretized fields
//!
//! A [`Field`] couples an `ndarray` array with its [`FieldRank`]. Operators
//! take fields by reference and always return a new field.

mod data;

pub use data::{Field, FieldRank};
