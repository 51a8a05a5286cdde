//! One discretized dimension
//!
//! Nodes are cell centered: node `n` of an axis starting at `lower` sits at
//! `lower + (n + ½)Δ`, and cell `n` spans the faces `lower + nΔ` and
//! `lower + (n + 1)Δ`. On a radial axis `lower` is the inner radius `r0`.

use crate::error::{OperatorError, Result};
use std::fmt;

/// Discretized axis with uniform spacing
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    name: String,
    node_count: usize,
    spacing: f64,
    lower: f64,
    periodic: bool,
    radial: bool,
}

impl Axis {
    /// Non-periodic Cartesian axis starting at zero
    pub fn new(name: impl Into<String>, node_count: usize, spacing: f64) -> Result<Self> {
        Self::build(name.into(), node_count, spacing, 0.0, false, false)
    }

    /// Periodic Cartesian axis starting at zero
    pub fn periodic(name: impl Into<String>, node_count: usize, spacing: f64) -> Result<Self> {
        Self::build(name.into(), node_count, spacing, 0.0, true, false)
    }

    /// Cartesian axis covering `[lower, upper]` with `node_count` cells
    pub fn from_bounds(
        name: impl Into<String>,
        bounds: (f64, f64),
        node_count: usize,
        periodic: bool,
    ) -> Result<Self> {
        let (lower, upper) = bounds;
        if node_count == 0 {
            return Err(OperatorError::InvalidGrid("axis needs at least one node".into()));
        }
        let spacing = (upper - lower) / node_count as f64;
        Self::build(name.into(), node_count, spacing, lower, periodic, false)
    }

    /// Radial axis starting at `inner_radius` (zero: no hole, the axis contains the origin)
    pub fn radial(node_count: usize, spacing: f64, inner_radius: f64) -> Result<Self> {
        if !(inner_radius.is_finite() && inner_radius >= 0.0) {
            return Err(OperatorError::InvalidGrid(format!(
                "inner radius must be non-negative, got {}",
                inner_radius
            )));
        }
        Self::build("r".into(), node_count, spacing, inner_radius, false, true)
    }

    fn build(
        name: String,
        node_count: usize,
        spacing: f64,
        lower: f64,
        periodic: bool,
        radial: bool,
    ) -> Result<Self> {
        if node_count == 0 {
            return Err(OperatorError::InvalidGrid(format!(
                "axis '{}' needs at least one node",
                name
            )));
        }
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(OperatorError::InvalidGrid(format!(
                "spacing of axis '{}' must be positive and finite, got {}",
                name, spacing
            )));
        }
        if !lower.is_finite() {
            return Err(OperatorError::InvalidGrid(format!(
                "lower bound of axis '{}' must be finite",
                name
            )));
        }
        Ok(Self {
            name,
            node_count,
            spacing,
            lower,
            periodic,
            radial,
        })
    }

    /// Axis name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of nodes N
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Node spacing Δ
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Whether the axis wraps around
    pub fn is_periodic(&self) -> bool {
        self.periodic
    }

    /// Whether the axis is the radial axis of a curvilinear grid
    pub fn is_radial(&self) -> bool {
        self.radial
    }

    /// Inner radius `r0` of a radial axis
    pub fn inner_radius(&self) -> Option<f64> {
        self.radial.then_some(self.lower)
    }

    /// Whether this is a radial axis reaching down to `r = 0`
    pub fn has_origin(&self) -> bool {
        self.radial && self.lower == 0.0
    }

    /// Coordinate of the lower edge
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Coordinate of the upper edge
    pub fn upper(&self) -> f64 {
        self.face(self.node_count)
    }

    /// Coordinate of node `n`
    #[inline]
    pub fn coordinate(&self, n: usize) -> f64 {
        self.lower + (n as f64 + 0.5) * self.spacing
    }

    /// Coordinate of the face between cells `n - 1` and `n`
    #[inline]
    pub fn face(&self, n: usize) -> f64 {
        self.lower + n as f64 * self.spacing
    }

    /// Coordinates of all nodes
    pub fn coordinates(&self) -> Vec<f64> {
        (0..self.node_count).map(|n| self.coordinate(n)).collect()
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: [{}, {}] with {} nodes{}",
            self.name,
            self.lower,
            self.upper(),
            self.node_count,
            if self.periodic { " (periodic)" } else { "" }
        )
    }
}
