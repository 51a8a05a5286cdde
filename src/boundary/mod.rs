//! Boundary conditions
//!
//! This module turns declarative boundary conditions into the affine
//! virtual-point rules the stencils consume.
//!
//! # Module Organization
//!
//! - **`condition`**: the condition model
//!   - `BoundaryCondition`: scalar condition (periodic, value, derivative, mixed)
//!   - `SideCondition`: per-side declaration, full or normal-component
//!   - `BoundaryValue`: uniform or per-component parameters
//! - **`spec`**: one `AxisBoundary` per axis, bundled in a `BoundarySpec`
//! - **`virtual_point`**: resolution of a condition into a `VirtualPointRule`
//!
//! # Example
//!
//! ```rust
//! use stencil_rs::boundary::{resolve_virtual_point, BoundaryCondition, Side};
//!
//! // Zero outward derivative: the virtual point mirrors the first node
//! let rule = resolve_virtual_point(&BoundaryCondition::Derivative(0.0), 0.1, 50, Side::Lower)?;
//! assert_eq!(rule.evaluate(&[1.0; 50]), 1.0);
//! # Ok::<(), stencil_rs::OperatorError>(())
//! ```

mod condition;
mod spec;
mod virtual_point;

pub use condition::{BoundaryCondition, BoundaryValue, Side, SideCondition};
pub use spec::{AxisBoundary, BoundarySpec};
pub use virtual_point::{resolve_virtual_point, AxisRules, VirtualPointRule, DEGENERACY_TOLERANCE};
