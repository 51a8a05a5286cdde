//! Coordinate systems (geometry adapters)
//!
//! Each grid kind has a strategy implementing [`CoordinateSystem`]. It
//! supplies the one-dimensional stencils used along each axis, so that the
//! operators never branch on the geometry themselves:
//!
//! | Grid | Radial divergence term | Radial Laplacian term |
//! |------|------------------------|-----------------------|
//! | Cartesian | – | – |
//! | Cylindrical | `y[n] / r_n` | `(y[n+1] − y[n−1]) / (2 r_n Δr)` |
//! | Spherical | `2 y[n] / r_n` | `(y[n+1] − y[n−1]) / (r_n Δr)` |
//!
//! # Origin
//!
//! When a radial axis reaches `r = 0` the virtual point is fixed to
//! `y[-1] = y[0]`. With `r_0 = Δr/2` the general formulas reduce to
//!
//! ```text
//! cylindrical: div(0) = (y1 − y0)/(2Δr) + 2y0/Δr    lap(0) = 2(y1 − y0)/Δr²
//! spherical:   div(0) = (y1 − y0)/(2Δr) + 4y0/Δr    lap(0) = 3(y1 − y0)/Δr²
//! ```
//!
//! # Conservative spherical Laplacian
//!
//! The naive spherical Laplacian does not integrate to zero under
//! vanishing-flux conditions. The conservative form balances the fluxes
//! through the faces `r₋ = r_{n−½}` and `r₊ = r_{n+½}` of each shell:
//!
//! ```text
//! lap(n) = 3 [r₊² (y[n+1] − y[n]) − r₋² (y[n] − y[n−1])] / (Δr (r₊³ − r₋³))
//! ```
//!
//! which for `r0 = 0` is
//! `3/Δr² [(n+1)²(y[n+1]−y[n]) − n²(y[n]−y[n−1])] / [(n+1)³ − n³]`.

use crate::boundary::{AxisRules, VirtualPointRule};
use crate::error::{OperatorError, Result};
use crate::grid::{Axis, GridKind};
use crate::operators::stencil::{AxisStencil, LinearForm, node_value};
use crate::operators::LaplacianMode;
use std::f64::consts::PI;
use std::fmt;

/// Geometry-specific pieces of the stencil assembly
pub trait CoordinateSystem: Send + Sync + fmt::Debug {
    /// Grid kind handled by this strategy
    fn kind(&self) -> GridKind;

    /// Rule replacing the boundary specification at the lower side of an axis
    fn origin_rule(&self, _axis_index: usize, _axis: &Axis) -> Option<VirtualPointRule> {
        None
    }

    /// Stencil of `∂f/∂x` along one axis
    fn gradient_stencil(&self, _axis_index: usize, axis: &Axis, rules: &AxisRules) -> AxisStencil {
        AxisStencil::first_derivative(axis, rules)
    }

    /// Stencil of the contribution of the component aligned with one axis to a divergence
    fn divergence_stencil(&self, _axis_index: usize, axis: &Axis, rules: &AxisRules) -> AxisStencil {
        AxisStencil::first_derivative(axis, rules)
    }

    /// Stencil of the Laplacian contribution of one axis
    fn laplacian_stencil(
        &self,
        _axis_index: usize,
        axis: &Axis,
        rules: &AxisRules,
        mode: LaplacianMode,
    ) -> Result<AxisStencil> {
        match mode {
            LaplacianMode::Standard => Ok(AxisStencil::second_derivative(axis, rules)),
            LaplacianMode::Conservative => Err(OperatorError::unsupported(format!(
                "conservative Laplacian is only available on spherical grids, not {}",
                self.kind()
            ))),
        }
    }

    /// Measure (length, area or volume factor) of each cell along one axis
    fn cell_measure(&self, _axis_index: usize, axis: &Axis) -> Vec<f64> {
        vec![axis.spacing(); axis.node_count()]
    }
}

// =================================================================================================
// Cartesian
// =================================================================================================

/// Every axis is independent and flat
#[derive(Debug, Clone, Copy, Default)]
pub struct Cartesian;

impl CoordinateSystem for Cartesian {
    fn kind(&self) -> GridKind {
        GridKind::Cartesian
    }
}

// =================================================================================================
// Cylindrical
// =================================================================================================

/// Axisymmetric grid with axes `[r, z]`
#[derive(Debug, Clone, Copy, Default)]
pub struct Cylindrical;

impl CoordinateSystem for Cylindrical {
    fn kind(&self) -> GridKind {
        GridKind::Cylindrical
    }

    fn origin_rule(&self, axis_index: usize, axis: &Axis) -> Option<VirtualPointRule> {
        reflecting_origin(axis_index, axis)
    }

    fn divergence_stencil(&self, axis_index: usize, axis: &Axis, rules: &AxisRules) -> AxisStencil {
        match axis_index {
            0 => radial_divergence(axis, rules, 1.0),
            _ => AxisStencil::first_derivative(axis, rules),
        }
    }

    fn laplacian_stencil(
        &self,
        axis_index: usize,
        axis: &Axis,
        rules: &AxisRules,
        mode: LaplacianMode,
    ) -> Result<AxisStencil> {
        match (axis_index, mode) {
            (_, LaplacianMode::Conservative) => Err(OperatorError::unsupported(
                "conservative Laplacian is only available on spherical grids, not cylindrical",
            )),
            (0, LaplacianMode::Standard) => Ok(radial_laplacian(axis, rules, 1.0)),
            (_, LaplacianMode::Standard) => Ok(AxisStencil::second_derivative(axis, rules)),
        }
    }

    fn cell_measure(&self, axis_index: usize, axis: &Axis) -> Vec<f64> {
        match axis_index {
            0 => shell_measure(axis, |lo, hi| PI * (hi * hi - lo * lo)),
            _ => vec![axis.spacing(); axis.node_count()],
        }
    }
}

// =================================================================================================
// Spherical
// =================================================================================================

/// Radially symmetric grid with the single axis `[r]`
#[derive(Debug, Clone, Copy, Default)]
pub struct Spherical;

impl CoordinateSystem for Spherical {
    fn kind(&self) -> GridKind {
        GridKind::Spherical
    }

    fn origin_rule(&self, axis_index: usize, axis: &Axis) -> Option<VirtualPointRule> {
        reflecting_origin(axis_index, axis)
    }

    fn divergence_stencil(&self, _axis_index: usize, axis: &Axis, rules: &AxisRules) -> AxisStencil {
        radial_divergence(axis, rules, 2.0)
    }

    fn laplacian_stencil(
        &self,
        _axis_index: usize,
        axis: &Axis,
        rules: &AxisRules,
        mode: LaplacianMode,
    ) -> Result<AxisStencil> {
        match mode {
            LaplacianMode::Standard => Ok(radial_laplacian(axis, rules, 2.0)),
            LaplacianMode::Conservative => Ok(conservative_spherical_laplacian(axis, rules)),
        }
    }

    fn cell_measure(&self, _axis_index: usize, axis: &Axis) -> Vec<f64> {
        shell_measure(axis, |lo, hi| 4.0 / 3.0 * PI * (hi.powi(3) - lo.powi(3)))
    }
}

// =================================================================================================
// Shared radial stencils
// =================================================================================================

fn reflecting_origin(axis_index: usize, axis: &Axis) -> Option<VirtualPointRule> {
    (axis_index == 0 && axis.has_origin()).then(|| VirtualPointRule::mirror(0))
}

/// `∂y/∂r + metric · y / r`
fn radial_divergence(axis: &Axis, rules: &AxisRules, metric: f64) -> AxisStencil {
    let mut stencil = AxisStencil::first_derivative(axis, rules);
    stencil.add(&AxisStencil::diagonal(axis.node_count(), |n| {
        metric / axis.coordinate(n)
    }));
    stencil
}

/// `∂²y/∂r² + (metric / r) ∂y/∂r`
fn radial_laplacian(axis: &Axis, rules: &AxisRules, metric: f64) -> AxisStencil {
    let mut stencil = AxisStencil::second_derivative(axis, rules);
    stencil.add_weighted(&AxisStencil::first_derivative(axis, rules), |n| {
        metric / axis.coordinate(n)
    });
    stencil
}

fn conservative_spherical_laplacian(axis: &Axis, rules: &AxisRules) -> AxisStencil {
    let node_count = axis.node_count();
    let spacing = axis.spacing();

    AxisStencil::from_fn(node_count, |n| {
        let r_lo = axis.face(n);
        let r_hi = axis.face(n + 1);
        let scale = 3.0 / (spacing * (r_hi.powi(3) - r_lo.powi(3)));
        let (flux_lo, flux_hi) = (scale * r_lo * r_lo, scale * r_hi * r_hi);

        let mut form = LinearForm::zero();
        form.add_scaled(&node_value(rules, n as isize + 1, node_count), flux_hi);
        form.add_scaled(&LinearForm::node(n), -(flux_hi + flux_lo));
        form.add_scaled(&node_value(rules, n as isize - 1, node_count), flux_lo);
        form
    })
}

fn shell_measure(axis: &Axis, measure: impl Fn(f64, f64) -> f64) -> Vec<f64> {
    (0..axis.node_count())
        .map(|n| measure(axis.face(n), axis.face(n + 1)))
        .collect()
}

// =================================================================================================
// Tests
// =================================================================================================
