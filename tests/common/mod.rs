//! Common utilities for integration tests

pub mod grids;
pub mod test_helpers;

// Re-export commonly used items; each test binary uses a subset
#[allow(unused_imports)]
pub use grids::{line, periodic_box, solid_sphere, cylinder};
#[allow(unused_imports)]
pub use test_helpers::{
    assert_fields_close,
    compute_l2_error,
    relative_error,
    volume_weighted_sum,
};
