//! Operators acting on scalar fields

use crate::boundary::BoundarySpec;
use crate::error::Result;
use crate::field::{Field, FieldRank};
use crate::grid::Geometry;
use crate::operators::traits::{accumulate_component, check_inputs};
use crate::operators::{DifferentialOperator, LaplacianMode};

/// Scalar Laplacian `∇²f`
///
/// Sum of the per-axis Laplacian stencils of the coordinate system, which
/// include the radial `(metric / r) ∂f/∂r` term on curvilinear grids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Laplacian {
    mode: LaplacianMode,
}

impl Laplacian {
    /// Laplacian with the given discretization
    pub fn new(mode: LaplacianMode) -> Self {
        Self { mode }
    }

    /// Flux-conservative Laplacian (spherical grids only)
    pub fn conservative() -> Self {
        Self::new(LaplacianMode::Conservative)
    }

    /// Discretization in use
    pub fn mode(&self) -> LaplacianMode {
        self.mode
    }
}

impl DifferentialOperator for Laplacian {
    fn apply(&self, geometry: &Geometry, field: &Field, boundaries: &BoundarySpec) -> Result<Field> {
        check_inputs(self, geometry, field, boundaries)?;
        let coordinates = geometry.coordinate_system();
        let mut output = Field::zeros(geometry, FieldRank::Scalar);

        for axis_index in 0..geometry.dim() {
            accumulate_component(
                geometry,
                boundaries,
                field,
                &[],
                axis_index,
                output.component_mut(&[]),
                |axis, rules| coordinates.laplacian_stencil(axis_index, axis, rules, self.mode),
            )?;
        }
        Ok(output)
    }

    fn name(&self) -> &str {
        match self.mode {
            LaplacianMode::Standard => "Laplacian",
            LaplacianMode::Conservative => "Conservative Laplacian",
        }
    }

    fn input_rank(&self) -> FieldRank {
        FieldRank::Scalar
    }

    fn output_rank(&self) -> FieldRank {
        FieldRank::Scalar
    }
}

/// Gradient `∇f`, component `i` is `∂f/∂x_i`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gradient;

impl DifferentialOperator for Gradient {
    fn apply(&self, geometry: &Geometry, field: &Field, boundaries: &BoundarySpec) -> Result<Field> {
        check_inputs(self, geometry, field, boundaries)?;
        let coordinates = geometry.coordinate_system();
        let mut output = Field::zeros(geometry, FieldRank::Vector);

        for axis_index in 0..geometry.dim() {
            accumulate_component(
                geometry,
                boundaries,
                field,
                &[],
                axis_index,
                output.component_mut(&[axis_index]),
                |axis, rules| Ok(coordinates.gradient_stencil(axis_index, axis, rules)),
            )?;
        }
        Ok(output)
    }

    fn name(&self) -> &str {
        "Gradient"
    }

    fn input_rank(&self) -> FieldRank {
        FieldRank::Scalar
    }

    fn output_rank(&self) -> FieldRank {
        FieldRank::Vector
    }
}
