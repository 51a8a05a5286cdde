//! Boundary specification of a whole grid
//!
//! # Design
//!
//! Instead of enumerating 1D, 2D and 3D cases, the specification is a list
//! with one [`AxisBoundary`] per grid axis, each holding the conditions of its
//! lower and upper side. The operators query it per `(axis, side, component)`.
//!
//! Conditions are validated against the grid before any operator runs:
//! axis count, periodicity and the reflecting condition required at the
//! origin of radial axes.

use crate::boundary::{BoundaryCondition, Side, SideCondition};
use crate::error::{OperatorError, Result};
use crate::grid::Geometry;
use std::fmt;

// =================================================================================================
// Axis Boundary
// =================================================================================================

/// Conditions on both sides of one axis
#[derive(Debug, Clone, PartialEq)]
pub struct AxisBoundary {
    /// Condition at the lower side
    pub lower: SideCondition,

    /// Condition at the upper side
    pub upper: SideCondition,
}

impl AxisBoundary {
    /// Create from two side conditions
    ///
    /// # Errors
    ///
    /// [`OperatorError::InvalidCondition`] if only one side is periodic or a
    /// parameter is not finite.
    pub fn new(lower: SideCondition, upper: SideCondition) -> Result<Self> {
        let boundary = Self { lower, upper };
        boundary.validate()?;
        Ok(boundary)
    }

    /// Periodic axis
    pub fn periodic() -> Self {
        Self {
            lower: SideCondition::Periodic,
            upper: SideCondition::Periodic,
        }
    }

    /// Same condition on both sides
    pub fn uniform(condition: SideCondition) -> Result<Self> {
        Self::new(condition.clone(), condition)
    }

    /// Condition of one side
    pub fn get(&self, side: Side) -> &SideCondition {
        match side {
            Side::Lower => &self.lower,
            Side::Upper => &self.upper,
        }
    }

    /// Whether the axis is periodic
    pub fn is_periodic(&self) -> bool {
        self.lower.is_periodic()
    }

    /// Validate both sides and their periodic consistency
    pub fn validate(&self) -> Result<()> {
        self.lower.validate()?;
        self.upper.validate()?;

        if self.lower.is_periodic() != self.upper.is_periodic() {
            return Err(OperatorError::invalid_condition(format!(
                "periodic condition declared on one side only (lower: {}, upper: {})",
                self.lower, self.upper
            )));
        }
        Ok(())
    }
}

impl fmt::Display for AxisBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_periodic() {
            write!(f, "periodic")
        } else {
            write!(f, "({}, {})", self.lower, self.upper)
        }
    }
}

// =================================================================================================
// Boundary Specification
// =================================================================================================

/// Boundary conditions for every axis of a grid
///
/// # Examples
///
/// ```rust
/// use stencil_rs::boundary::{AxisBoundary, BoundarySpec, SideCondition};
/// use stencil_rs::grid::{Axis, Geometry};
///
/// let geometry = Geometry::cartesian(vec![
///     Axis::periodic("x", 32, 0.1).unwrap(),
///     Axis::new("y", 16, 0.1).unwrap(),
/// ]).unwrap();
///
/// let boundaries = BoundarySpec::new(vec![
///     AxisBoundary::periodic(),
///     AxisBoundary::new(SideCondition::dirichlet(), SideCondition::neumann()).unwrap(),
/// ]).unwrap();
///
/// assert!(boundaries.validate(&geometry).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BoundarySpec {
    axes: Vec<AxisBoundary>,
}

impl BoundarySpec {
    /// Create from one boundary per axis
    pub fn new(axes: Vec<AxisBoundary>) -> Result<Self> {
        if axes.is_empty() {
            return Err(OperatorError::invalid_condition(
                "list of axis boundaries must not be empty",
            ));
        }
        for axis in &axes {
            axis.validate()?;
        }
        Ok(Self { axes })
    }

    // ====================================== Factory methods ======================================

    /// Same non-periodic condition on every side, periodic on periodic axes
    ///
    /// The origin of hole-free radial axes always gets the reflecting condition.
    pub fn uniform(geometry: &Geometry, condition: SideCondition) -> Result<Self> {
        condition.validate()?;
        let axes = geometry
            .axes()
            .iter()
            .map(|axis| {
                if axis.is_periodic() {
                    AxisBoundary::periodic()
                } else if axis.has_origin() {
                    AxisBoundary {
                        lower: SideCondition::neumann(),
                        upper: condition.clone(),
                    }
                } else {
                    AxisBoundary {
                        lower: condition.clone(),
                        upper: condition.clone(),
                    }
                }
            })
            .collect();
        Self::new(axes)
    }

    /// Periodic on periodic axes, vanishing derivative elsewhere
    pub fn natural(geometry: &Geometry) -> Result<Self> {
        Self::uniform(geometry, SideCondition::neumann())
    }

    /// Periodic on periodic axes, vanishing value elsewhere
    pub fn auto_periodic_dirichlet(geometry: &Geometry) -> Result<Self> {
        Self::uniform(geometry, SideCondition::dirichlet())
    }

    // ===================================== Query methods =========================================

    /// Number of axes
    pub fn ndim(&self) -> usize {
        self.axes.len()
    }

    /// All axis boundaries
    pub fn axes(&self) -> &[AxisBoundary] {
        &self.axes
    }

    /// Boundary of one axis
    pub fn axis(&self, index: usize) -> Result<&AxisBoundary> {
        self.axes.get(index).ok_or_else(|| {
            OperatorError::invalid_condition(format!(
                "no boundary condition for axis {} ({} axes specified)",
                index,
                self.axes.len()
            ))
        })
    }

    /// Periodicity of each axis according to the conditions
    pub fn periodic(&self) -> Vec<bool> {
        self.axes.iter().map(AxisBoundary::is_periodic).collect()
    }

    /// Scalar condition for one component at one side of one axis
    pub fn component_condition(
        &self,
        axis: usize,
        side: Side,
        component: &[usize],
        dim: usize,
    ) -> Result<BoundaryCondition> {
        self.axis(axis)?
            .get(side)
            .component_condition(side, axis, component, dim)
    }

    /// Check that every boundary value matches a field of the given rank
    pub fn check_value_rank(&self, rank: usize, dim: usize) -> Result<()> {
        for axis in &self.axes {
            axis.lower.check_value_rank(rank, dim)?;
            axis.upper.check_value_rank(rank, dim)?;
        }
        Ok(())
    }

    /// Validate the conditions against a grid
    pub fn validate(&self, geometry: &Geometry) -> Result<()> {
        if self.axes.len() != geometry.dim() {
            return Err(OperatorError::invalid_condition(format!(
                "need boundary conditions for {} axes, got {}",
                geometry.dim(),
                self.axes.len()
            )));
        }

        for (index, (boundary, axis)) in self.axes.iter().zip(geometry.axes()).enumerate() {
            boundary.validate()?;

            if boundary.is_periodic() != axis.is_periodic() {
                return Err(OperatorError::invalid_condition(format!(
                    "periodicity of the conditions ({}) does not match axis {} '{}' ({})",
                    boundary.is_periodic(),
                    index,
                    axis.name(),
                    axis.is_periodic()
                )));
            }

            if axis.has_origin() && !boundary.lower.is_reflecting() {
                return Err(OperatorError::invalid_condition(format!(
                    "only a vanishing derivative is allowed at the origin of axis '{}', got {}",
                    axis.name(),
                    boundary.lower
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for BoundarySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items = self
            .axes
            .iter()
            .map(|axis| axis.to_string())
            .collect::<Vec<_>>();
        write!(f, "[{}]", items.join(", "))
    }
}

// =================================================================================================
// Tests
// =================================================================================================
