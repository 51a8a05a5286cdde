//! Grid metadata
//!
//! Only the quantities the stencils consume are modelled here: node count,
//! spacing, inner radius and periodicity of each [`Axis`], and the
//! [`GridKind`] selecting the [`CoordinateSystem`] strategy.
//!
//! # Supported geometries
//!
//! | Kind | Axes | Notes |
//! |------|------|-------|
//! | Cartesian | any number | each axis periodic or not |
//! | Cylindrical | `[r, z]` | axisymmetric, optional inner hole |
//! | Spherical | `[r]` | radially symmetric, optional inner hole |

mod axis;
pub mod coordinates;
mod geometry;

pub use axis::Axis;
pub use coordinates::CoordinateSystem;
pub use geometry::{Geometry, GridKind};
