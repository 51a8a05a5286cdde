//! Operators acting on tensor fields

use crate::boundary::BoundarySpec;
use crate::error::Result;
use crate::field::{Field, FieldRank};
use crate::grid::Geometry;
use crate::operators::traits::{accumulate_component, check_inputs};
use crate::operators::DifferentialOperator;

/// Tensor divergence, `out[α] = Σ_β ∂t[α][β]/∂x_β`
///
/// Column `β` is differentiated with the divergence stencil of axis `β`, so
/// on curvilinear grids the radial column picks up the `metric · t / r`
/// term of the scalar divergence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TensorDivergence;

impl DifferentialOperator for TensorDivergence {
    fn apply(&self, geometry: &Geometry, field: &Field, boundaries: &BoundarySpec) -> Result<Field> {
        check_inputs(self, geometry, field, boundaries)?;
        let coordinates = geometry.coordinate_system();
        let dim = geometry.dim();
        let mut output = Field::zeros(geometry, FieldRank::Vector);

        for row in 0..dim {
            for column in 0..dim {
                accumulate_component(
                    geometry,
                    boundaries,
                    field,
                    &[row, column],
                    column,
                    output.component_mut(&[row]),
                    |axis, rules| Ok(coordinates.divergence_stencil(column, axis, rules)),
                )?;
            }
        }
        Ok(output)
    }

    fn name(&self) -> &str {
        "Tensor Divergence"
    }

    fn input_rank(&self) -> FieldRank {
        FieldRank::Tensor
    }

    fn output_rank(&self) -> FieldRank {
        FieldRank::Vector
    }
}
