//! Virtual point resolution
//!
//! # Mathematical Background
//!
//! Nodes are cell centered, so the boundary lies half a spacing beyond the
//! first and last node. A virtual (ghost) node `y[-1]` is placed one spacing
//! beyond the edge and chosen so that the centered estimates at the boundary
//!
//! ```text
//! f(0)  ≈ (y[0] + y[-1]) / 2
//! ∂ₙf(0) ≈ (y[-1] - y[0]) / Δ       (outward derivative)
//! ```
//!
//! satisfy the boundary equation exactly. Every condition then reduces to an
//! affine rule on a single in-range node:
//!
//! ```text
//! y[-1] = α + β · y[k]
//! ```
//!
//! | Condition | α | β | k (lower / upper) |
//! |---|---|---|---|
//! | Periodic | 0 | 1 | N−1 / 0 |
//! | Value `a` | 2a | −1 | 0 / N−1 |
//! | Derivative `b` | bΔ | 1 | 0 / N−1 |
//! | Mixed `(b,c)` | 2bΔ/(2+cΔ) | (2−cΔ)/(2+cΔ) | 0 / N−1 |
//!
//! Mixed conditions solve `∂ₙf + c·f = b`:
//!
//! ```text
//! (y[-1] - y[0]) / Δ + c (y[0] + y[-1]) / 2 = b
//! ⇒ y[-1] (2 + cΔ) = 2bΔ + (2 - cΔ) y[0]
//! ```
//!
//! The upper side is the mirror image; because derivatives are taken along
//! the outward normal, α and β are the same on both sides.

use crate::boundary::{BoundaryCondition, BoundarySpec, Side};
use crate::error::{OperatorError, Result};
use crate::grid::Geometry;

/// Smallest admissible `|2 + cΔ|` for mixed conditions
pub const DEGENERACY_TOLERANCE: f64 = 1e-12;

/// `|2 + cΔ|` below which a warning is logged
const NEAR_DEGENERACY: f64 = 1e-6;

/// Affine rule defining a virtual point: `offset + factor * y[source]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualPointRule {
    /// Constant part α
    pub offset: f64,

    /// Weight β of the source node
    pub factor: f64,

    /// Index k of the in-range source node
    pub source: usize,
}

impl VirtualPointRule {
    /// Rule copying a node unchanged: `y[virtual] = y[source]`
    pub fn mirror(source: usize) -> Self {
        Self {
            offset: 0.0,
            factor: 1.0,
            source,
        }
    }

    /// Value of the virtual point for the given node values
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.offset + self.factor * values[self.source]
    }
}

/// Map a boundary condition to the rule for the virtual point beyond `side`
///
/// # Errors
///
/// - [`OperatorError::InvalidGrid`] if `spacing` is not a positive finite
///   number or `node_count` is zero
/// - [`OperatorError::InvalidCondition`] if the condition has non-finite parameters
/// - [`OperatorError::DegenerateCondition`] if a mixed condition has `|2 + cΔ| ≤ 1e-12`
///
/// # Example
///
/// ```rust
/// use stencil_rs::boundary::{resolve_virtual_point, BoundaryCondition, Side};
///
/// let rule = resolve_virtual_point(&BoundaryCondition::Value(0.0), 1.0, 4, Side::Upper).unwrap();
/// assert_eq!((rule.offset, rule.factor, rule.source), (0.0, -1.0, 3));
/// ```
pub fn resolve_virtual_point(
    condition: &BoundaryCondition,
    spacing: f64,
    node_count: usize,
    side: Side,
) -> Result<VirtualPointRule> {
    if !(spacing.is_finite() && spacing > 0.0) {
        return Err(OperatorError::InvalidGrid(format!(
            "spacing must be positive and finite, got {}",
            spacing
        )));
    }
    if node_count == 0 {
        return Err(OperatorError::InvalidGrid("axis has no nodes".into()));
    }
    condition.validate()?;

    let edge = match side {
        Side::Lower => 0,
        Side::Upper => node_count - 1,
    };

    let rule = match *condition {
        BoundaryCondition::Periodic => {
            let wrapped = match side {
                Side::Lower => node_count - 1,
                Side::Upper => 0,
            };
            VirtualPointRule::mirror(wrapped)
        }

        BoundaryCondition::Value(a) => VirtualPointRule {
            offset: 2.0 * a,
            factor: -1.0,
            source: edge,
        },

        BoundaryCondition::Derivative(b) => VirtualPointRule {
            offset: b * spacing,
            factor: 1.0,
            source: edge,
        },

        BoundaryCondition::Mixed { value, coefficient } => {
            let (offset, factor) = mixed_rule(value, coefficient, spacing)?;
            VirtualPointRule {
                offset,
                factor,
                source: edge,
            }
        }
    };

    log::trace!(
        "virtual point ({} side, {}): {} + {} * y[{}]",
        side,
        condition,
        rule.offset,
        rule.factor,
        rule.source
    );

    Ok(rule)
}

/// Offset and factor of the mixed rule
///
/// For `|cΔ| > 1` the fraction is divided through by `cΔ`, which keeps the
/// Dirichlet limit `(2a, -1)` exact for very large coefficients instead of
/// overflowing `2bΔ`.
fn mixed_rule(value: f64, coefficient: f64, spacing: f64) -> Result<(f64, f64)> {
    let c_dx = coefficient * spacing;
    let denominator = 2.0 + c_dx;

    if !(denominator.abs() > DEGENERACY_TOLERANCE) {
        return Err(OperatorError::DegenerateCondition {
            coefficient,
            spacing,
            denominator,
        });
    }
    if denominator.abs() < NEAR_DEGENERACY {
        log::warn!(
            "mixed condition close to singular: 2 + c·Δ = {:e} (c = {}, Δ = {})",
            denominator,
            coefficient,
            spacing
        );
    }

    if c_dx.abs() > 1.0 {
        let inverse = 2.0 / c_dx;
        let offset = 2.0 * (value / coefficient) / (1.0 + inverse);
        let factor = (inverse - 1.0) / (inverse + 1.0);
        Ok((offset, factor))
    } else {
        let offset = 2.0 * value * spacing / denominator;
        let factor = (2.0 - c_dx) / denominator;
        Ok((offset, factor))
    }
}

// =================================================================================================
// Axis rules
// =================================================================================================

/// Virtual point rules for both ends of one axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRules {
    /// Rule for `y[-1]`
    pub lower: VirtualPointRule,

    /// Rule for `y[N]`
    pub upper: VirtualPointRule,
}

impl AxisRules {
    /// Resolve both sides of an axis from scalar conditions
    pub fn resolve(
        lower: &BoundaryCondition,
        upper: &BoundaryCondition,
        spacing: f64,
        node_count: usize,
    ) -> Result<Self> {
        if lower.is_periodic() != upper.is_periodic() {
            return Err(OperatorError::invalid_condition(
                "periodic conditions must be declared on both sides of an axis",
            ));
        }
        Ok(Self {
            lower: resolve_virtual_point(lower, spacing, node_count, Side::Lower)?,
            upper: resolve_virtual_point(upper, spacing, node_count, Side::Upper)?,
        })
    }

    /// Rules for one component along one axis of a grid
    ///
    /// The coordinate system may override the boundary specification, which
    /// happens at the origin of radial axes where the virtual point is fixed
    /// to `y[-1] = y[0]`.
    pub fn for_component(
        geometry: &Geometry,
        boundaries: &BoundarySpec,
        axis_index: usize,
        component: &[usize],
    ) -> Result<Self> {
        let axis = geometry.axis(axis_index)?;
        let dim = geometry.dim();
        let axis_boundary = boundaries.axis(axis_index)?;

        let upper_condition =
            axis_boundary
                .upper
                .component_condition(Side::Upper, axis_index, component, dim)?;
        let upper =
            resolve_virtual_point(&upper_condition, axis.spacing(), axis.node_count(), Side::Upper)?;

        let lower = match geometry.coordinate_system().origin_rule(axis_index, axis) {
            Some(rule) => rule,
            None => {
                let lower_condition = axis_boundary.lower.component_condition(
                    Side::Lower,
                    axis_index,
                    component,
                    dim,
                )?;
                if lower_condition.is_periodic() != upper_condition.is_periodic() {
                    return Err(OperatorError::invalid_condition(format!(
                        "periodic conditions must be declared on both sides of axis {}",
                        axis_index
                    )));
                }
                resolve_virtual_point(
                    &lower_condition,
                    axis.spacing(),
                    axis.node_count(),
                    Side::Lower,
                )?
            }
        };

        Ok(Self { lower, upper })
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_periodic_wraps_around() {
        let lower = resolve_virtual_point(&BoundaryCondition::Periodic, 0.5, 6, Side::Lower).unwrap();
        let upper = resolve_virtual_point(&BoundaryCondition::Periodic, 0.5, 6, Side::Upper).unwrap();

        assert_eq!(lower, VirtualPointRule::mirror(5));
        assert_eq!(upper, VirtualPointRule::mirror(0));
    }

    #[test]
    fn test_value_rule() {
        let rule = resolve_virtual_point(&BoundaryCondition::Value(3.0), 0.1, 10, Side::Lower).unwrap();
        assert_eq!(rule.offset, 6.0);
        assert_eq!(rule.factor, -1.0);
        assert_eq!(rule.source, 0);
    }

    #[test]
    fn test_derivative_rule_upper() {
        let rule =
            resolve_virtual_point(&BoundaryCondition::Derivative(2.0), 0.25, 8, Side::Upper).unwrap();
        assert_eq!(rule.offset, 0.5);
        assert_eq!(rule.factor, 1.0);
        assert_eq!(rule.source, 7);
    }

    #[test]
    fn test_mixed_rule_small_coefficient() {
        // c·Δ = 0.5 → α = 2·1·1/2.5, β = 1.5/2.5
        let condition = BoundaryCondition::Mixed { value: 1.0, coefficient: 0.5 };
        let rule = resolve_virtual_point(&condition, 1.0, 3, Side::Lower).unwrap();

        assert_relative_eq!(rule.offset, 0.8, epsilon = 1e-15);
        assert_relative_eq!(rule.factor, 0.6, epsilon = 1e-15);
    }

    #[test]
    fn test_mixed_rule_scaled_branch_matches_direct_formula() {
        let (value, coefficient, spacing) = (3.0, 7.0, 0.5);
        let (offset, factor) = mixed_rule(value, coefficient, spacing).unwrap();

        let denominator = 2.0 + coefficient * spacing;
        assert_relative_eq!(offset, 2.0 * value * spacing / denominator, epsilon = 1e-14);
        assert_relative_eq!(factor, (2.0 - coefficient * spacing) / denominator, epsilon = 1e-14);
    }

    #[test]
    fn test_mixed_satisfies_boundary_equation() {
        // (y[-1] - y[0]) / Δ + c (y[0] + y[-1]) / 2 = b
        let (b, c, dx) = (0.7, 1.3, 0.2);
        let rule = resolve_virtual_point(
            &BoundaryCondition::Mixed { value: b, coefficient: c },
            dx,
            5,
            Side::Lower,
        )
        .unwrap();

        let y0 = 2.5;
        let ghost = rule.evaluate(&[y0, 0.0, 0.0, 0.0, 0.0]);
        let lhs = (ghost - y0) / dx + c * (y0 + ghost) / 2.0;
        assert_relative_eq!(lhs, b, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_mixed_condition() {
        let condition = BoundaryCondition::Mixed { value: 1.0, coefficient: -2.0 };
        let result = resolve_virtual_point(&condition, 1.0, 4, Side::Lower);
        assert!(matches!(result, Err(OperatorError::DegenerateCondition { .. })));
    }

    #[test]
    fn test_invalid_spacing_and_nodes() {
        let condition = BoundaryCondition::Value(0.0);
        assert!(matches!(
            resolve_virtual_point(&condition, 0.0, 4, Side::Lower),
            Err(OperatorError::InvalidGrid(_))
        ));
        assert!(matches!(
            resolve_virtual_point(&condition, 1.0, 0, Side::Lower),
            Err(OperatorError::InvalidGrid(_))
        ));
    }

    #[test]
    fn test_axis_rules_reject_one_sided_periodic() {
        let result = AxisRules::resolve(
            &BoundaryCondition::Periodic,
            &BoundaryCondition::Value(0.0),
            1.0,
            4,
        );
        assert!(matches!(result, Err(OperatorError::InvalidCondition(_))));
    }

    #[test]
    fn test_single_node_axis() {
        let rules = AxisRules::resolve(
            &BoundaryCondition::Value(1.0),
            &BoundaryCondition::Derivative(0.0),
            1.0,
            1,
        )
        .unwrap();
        assert_eq!(rules.lower.source, 0);
        assert_eq!(rules.upper.source, 0);
    }
}
