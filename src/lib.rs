//! stencil-rs: Finite-Difference Operators with Virtual-Point Boundaries
//!
//! Differential operators (Laplacian, gradient, divergence and their vector
//! and tensor variants) on cell-centered Cartesian, cylindrical and spherical
//! grids. Boundary conditions are imposed through virtual points beyond the
//! domain edge, so the same centered stencils are used at every node.
//!
//! # Architecture
//!
//! stencil-rs is built on two core principles:
//!
//! 1. **Separation of Boundaries and Stencils**
//!    - Boundary conditions resolve to affine virtual-point rules
//!    - Stencils fold those rules into one linear form per node
//!
//! 2. **Geometry as a Strategy**
//!    - Each grid kind implements `CoordinateSystem`
//!    - Operators never branch on the geometry themselves
//!
//! # Quick Start
//!
//! ```rust
//! use stencil_rs::prelude::*;
//!
//! # fn main() -> Result<(), OperatorError> {
//! // 1. Describe the grid: a sphere of radius 1 without hole
//! let geometry = Geometry::spherical(Axis::radial(20, 0.05, 0.0)?)?;
//!
//! // 2. Reflecting origin, fixed value at the surface
//! let boundaries = BoundarySpec::new(vec![
//!     AxisBoundary::new(SideCondition::neumann(), SideCondition::value(1.0))?,
//! ])?;
//!
//! // 3. Apply an operator
//! let field = Field::from_fn(&geometry, FieldRank::Scalar, |_, r| r[0] * r[0]);
//! let lap = apply_operator(
//!     OperatorKind::Laplacian(LaplacianMode::Standard),
//!     &geometry,
//!     &field,
//!     &boundaries,
//! )?;
//!
//! // ∇²r² = 6
//! assert!((lap.data()[[10]] - 6.0).abs() < 1e-9);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`boundary`]: Boundary conditions and virtual-point rules
//! - [`grid`]: Axes, grid kinds and coordinate systems
//! - [`field`]: Scalar, vector and tensor fields
//! - [`operators`]: Stencils and differential operators
//! - [`error`]: Error type

// Core modules
pub mod error;

pub mod boundary;
pub mod field;
pub mod grid;
pub mod operators;

pub use error::{OperatorError, Result};

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use stencil_rs::prelude::*;
    //! ```
    pub use crate::boundary::{AxisBoundary, BoundaryCondition, BoundarySpec, Side, SideCondition};
    pub use crate::error::OperatorError;
    pub use crate::field::{Field, FieldRank};
    pub use crate::grid::{Axis, Geometry, GridKind};
    pub use crate::operators::{
        apply_operator, DifferentialOperator, LaplacianMode, OperatorKind,
    };
}
