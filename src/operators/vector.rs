//! Operators acting on vector fields
//!
//! Each operator is a set of independent scalar stencil applications, one
//! per `(component, axis)` pair, sharing the coordinate system of the grid.

use crate::boundary::BoundarySpec;
use crate::error::Result;
use crate::field::{Field, FieldRank};
use crate::grid::Geometry;
use crate::operators::traits::{accumulate_component, check_inputs};
use crate::operators::{DifferentialOperator, LaplacianMode};

/// Divergence `∇·v`
///
/// Only component `i` is differentiated along axis `i`, so the boundary
/// conditions are only queried for the normal component at each boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Divergence;

impl DifferentialOperator for Divergence {
    fn apply(&self, geometry: &Geometry, field: &Field, boundaries: &BoundarySpec) -> Result<Field> {
        check_inputs(self, geometry, field, boundaries)?;
        let coordinates = geometry.coordinate_system();
        let mut output = Field::zeros(geometry, FieldRank::Scalar);

        for axis_index in 0..geometry.dim() {
            accumulate_component(
                geometry,
                boundaries,
                field,
                &[axis_index],
                axis_index,
                output.component_mut(&[]),
                |axis, rules| Ok(coordinates.divergence_stencil(axis_index, axis, rules)),
            )?;
        }
        Ok(output)
    }

    fn name(&self) -> &str {
        "Divergence"
    }

    fn input_rank(&self) -> FieldRank {
        FieldRank::Vector
    }

    fn output_rank(&self) -> FieldRank {
        FieldRank::Scalar
    }
}

/// Component-wise vector Laplacian, `out[c] = ∇² v[c]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VectorLaplacian;

impl DifferentialOperator for VectorLaplacian {
    fn apply(&self, geometry: &Geometry, field: &Field, boundaries: &BoundarySpec) -> Result<Field> {
        check_inputs(self, geometry, field, boundaries)?;
        let coordinates = geometry.coordinate_system();
        let mut output = Field::zeros(geometry, FieldRank::Vector);

        for component in field.component_indices() {
            for axis_index in 0..geometry.dim() {
                accumulate_component(
                    geometry,
                    boundaries,
                    field,
                    &component,
                    axis_index,
                    output.component_mut(&component),
                    |axis, rules| {
                        coordinates.laplacian_stencil(axis_index, axis, rules, LaplacianMode::Standard)
                    },
                )?;
            }
        }
        Ok(output)
    }

    fn name(&self) -> &str {
        "Vector Laplacian"
    }

    fn input_rank(&self) -> FieldRank {
        FieldRank::Vector
    }

    fn output_rank(&self) -> FieldRank {
        FieldRank::Vector
    }
}

/// Vector gradient, `out[c][i] = ∂v[c]/∂x_i`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VectorGradient;

impl DifferentialOperator for VectorGradient {
    fn apply(&self, geometry: &Geometry, field: &Field, boundaries: &BoundarySpec) -> Result<Field> {
        check_inputs(self, geometry, field, boundaries)?;
        let coordinates = geometry.coordinate_system();
        let mut output = Field::zeros(geometry, FieldRank::Tensor);

        for component in field.component_indices() {
            for axis_index in 0..geometry.dim() {
                let target = [component[0], axis_index];
                accumulate_component(
                    geometry,
                    boundaries,
                    field,
                    &component,
                    axis_index,
                    output.component_mut(&target),
                    |axis, rules| Ok(coordinates.gradient_stencil(axis_index, axis, rules)),
                )?;
            }
        }
        Ok(output)
    }

    fn name(&self) -> &str {
        "Vector Gradient"
    }

    fn input_rank(&self) -> FieldRank {
        FieldRank::Vector
    }

    fn output_rank(&self) -> FieldRank {
        FieldRank::Tensor
    }
}
