//! Operator trait
//!
//! # Stability Guarantee
//!
//! - `DifferentialOperator` trait: implemented by every operator of the crate,
//!   methods will not be removed
//! - New operators are added as new implementors, existing ones keep their ranks

use crate::boundary::{AxisRules, BoundarySpec};
use crate::error::Result;
use crate::field::{Field, FieldRank};
use crate::grid::{Axis, Geometry};
use crate::operators::stencil::AxisStencil;
use ndarray::ArrayViewMutD;

/// Finite-difference operator acting on a field
///
/// # Contract
///
/// - `apply` never modifies its inputs and returns a new field of rank
///   [`output_rank`](Self::output_rank) on the same grid
/// - the input must have rank [`input_rank`](Self::input_rank)
/// - boundary conditions are validated against the grid before any stencil
///   is built
///
/// # Example
///
/// ```rust
/// use stencil_rs::boundary::BoundarySpec;
/// use stencil_rs::field::{Field, FieldRank};
/// use stencil_rs::grid::{Axis, Geometry};
/// use stencil_rs::operators::{DifferentialOperator, Gradient};
///
/// let geometry = Geometry::cartesian(vec![Axis::periodic("x", 8, 0.25)?])?;
/// let boundaries = BoundarySpec::natural(&geometry)?;
/// let field = Field::uniform(&geometry, FieldRank::Scalar, 2.0);
///
/// let gradient = Gradient.apply(&geometry, &field, &boundaries)?;
/// assert_eq!(gradient.rank(), FieldRank::Vector);
/// assert!(gradient.data().iter().all(|g| *g == 0.0));
/// # Ok::<(), stencil_rs::OperatorError>(())
/// ```
pub trait DifferentialOperator: Send + Sync {
    /// Apply the operator
    fn apply(&self, geometry: &Geometry, field: &Field, boundaries: &BoundarySpec) -> Result<Field>;

    /// Operator name (for logs and diagnostics)
    fn name(&self) -> &str;

    /// Rank of the accepted field
    fn input_rank(&self) -> FieldRank;

    /// Rank of the returned field
    fn output_rank(&self) -> FieldRank;
}

/// Checks shared by every operator before the stencils are built
pub(crate) fn check_inputs(
    operator: &dyn DifferentialOperator,
    geometry: &Geometry,
    field: &Field,
    boundaries: &BoundarySpec,
) -> Result<()> {
    field.check_compatible(geometry, operator.input_rank())?;
    boundaries.validate(geometry)?;
    boundaries.check_value_rank(operator.input_rank().order(), geometry.dim())?;

    log::debug!(
        "applying {} to {} on {} with boundaries {}",
        operator.name(),
        field,
        geometry,
        boundaries
    );
    Ok(())
}

/// Accumulate one component of `field` along one axis into `output`
///
/// The boundary rules are those of `component`; `build` receives the axis
/// and the resolved rules and returns the stencil to apply.
pub(crate) fn accumulate_component(
    geometry: &Geometry,
    boundaries: &BoundarySpec,
    field: &Field,
    component: &[usize],
    axis_index: usize,
    output: ArrayViewMutD<f64>,
    build: impl FnOnce(&Axis, &AxisRules) -> Result<AxisStencil>,
) -> Result<()> {
    let axis = geometry.axis(axis_index)?;
    let rules = AxisRules::for_component(geometry, boundaries, axis_index, component)?;
    let stencil = build(axis, &rules)?;
    stencil.accumulate_along(field.component(component), axis_index, output)
}
