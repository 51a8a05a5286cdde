//! Boundary conditions for one side of one axis
//!
//! Two levels are modelled:
//!
//! - [`BoundaryCondition`]: the scalar condition seen by a single field
//!   component. This is what the virtual point resolver consumes.
//! - [`SideCondition`]: what the user declares for a side. It may carry one
//!   value per component, or only constrain the component normal to the
//!   boundary. [`SideCondition::component_condition`] reduces it to a
//!   [`BoundaryCondition`] for a given component.
//!
//! # Sign convention
//!
//! Derivatives are always taken along the **outward** normal. At the lower
//! side the outward normal points towards decreasing coordinates, so a
//! derivative condition `b` there means `-∂f/∂x = b`.

use crate::error::{OperatorError, Result};
use nalgebra::DVector;
use std::fmt;

// =================================================================================================
// Side
// =================================================================================================

/// End of an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Side at the smallest coordinate (index 0)
    Lower,

    /// Side at the largest coordinate (index N-1)
    Upper,
}

impl Side {
    /// Both sides, lower first
    pub const BOTH: [Side; 2] = [Side::Lower, Side::Upper];

    /// Component of the outward normal along the axis
    pub fn normal_sign(self) -> f64 {
        match self {
            Side::Lower => -1.0,
            Side::Upper => 1.0,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Lower => write!(f, "lower"),
            Side::Upper => write!(f, "upper"),
        }
    }
}

// =================================================================================================
// Scalar boundary condition
// =================================================================================================

/// Boundary condition acting on one scalar component
///
/// | Variant | Constraint at the boundary |
/// |---------|----------------------------|
/// | `Periodic` | wraps to the opposite side |
/// | `Value(a)` | `f = a` |
/// | `Derivative(b)` | `∂ₙf = b` |
/// | `Mixed { value: b, coefficient: c }` | `∂ₙf + c·f = b` |
///
/// `Mixed` with `c = 0` is exactly `Derivative(b)`; for `c → ∞` with
/// `b / c = a` fixed it approaches `Value(a)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryCondition {
    /// Periodic continuation
    Periodic,

    /// Dirichlet condition
    Value(f64),

    /// Neumann condition on the outward derivative
    Derivative(f64),

    /// Robin condition `∂ₙf + c·f = b`
    Mixed { value: f64, coefficient: f64 },
}

impl BoundaryCondition {
    /// Check that all parameters are finite numbers
    pub fn validate(&self) -> Result<()> {
        match *self {
            BoundaryCondition::Periodic => Ok(()),
            BoundaryCondition::Value(a) => finite("value", a),
            BoundaryCondition::Derivative(b) => finite("derivative", b),
            BoundaryCondition::Mixed { value, coefficient } => {
                finite("mixed value", value)?;
                finite("mixed coefficient", coefficient)
            }
        }
    }

    /// Whether the condition is periodic
    pub fn is_periodic(&self) -> bool {
        matches!(self, BoundaryCondition::Periodic)
    }
}

impl fmt::Display for BoundaryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryCondition::Periodic => write!(f, "periodic"),
            BoundaryCondition::Value(a) => write!(f, "value={}", a),
            BoundaryCondition::Derivative(b) => write!(f, "derivative={}", b),
            BoundaryCondition::Mixed { value, coefficient } => {
                write!(f, "mixed(value={}, coefficient={})", value, coefficient)
            }
        }
    }
}

fn finite(what: &str, x: f64) -> Result<()> {
    if x.is_finite() {
        Ok(())
    } else {
        Err(OperatorError::invalid_condition(format!(
            "{} must be a finite number, got {}",
            what, x
        )))
    }
}

// =================================================================================================
// Boundary values
// =================================================================================================

/// Parameter of a side condition: one number, or one number per component
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryValue {
    /// Same value for every component
    Uniform(f64),

    /// One value per component (row-major flat index for tensors)
    Components(DVector<f64>),
}

impl BoundaryValue {
    /// Create from a list of component values
    pub fn components(values: Vec<f64>) -> Self {
        Self::Components(DVector::from_vec(values))
    }

    /// Value for a flat component index
    pub fn get(&self, index: usize) -> Result<f64> {
        match self {
            BoundaryValue::Uniform(x) => Ok(*x),
            BoundaryValue::Components(values) => values.get(index).copied().ok_or_else(|| {
                OperatorError::invalid_condition(format!(
                    "boundary value has {} components, component {} requested",
                    values.len(),
                    index
                ))
            }),
        }
    }

    /// Number of explicit components, `None` for uniform values
    pub fn component_count(&self) -> Option<usize> {
        match self {
            BoundaryValue::Uniform(_) => None,
            BoundaryValue::Components(values) => Some(values.len()),
        }
    }

    /// Whether every component is exactly zero
    pub fn is_zero(&self) -> bool {
        match self {
            BoundaryValue::Uniform(x) => *x == 0.0,
            BoundaryValue::Components(values) => values.iter().all(|x| *x == 0.0),
        }
    }

    fn validate(&self, what: &str) -> Result<()> {
        match self {
            BoundaryValue::Uniform(x) => finite(what, *x),
            BoundaryValue::Components(values) => values.iter().try_for_each(|x| finite(what, *x)),
        }
    }

    fn expect_len(&self, expected: usize, context: &str) -> Result<()> {
        match self.component_count() {
            Some(found) if found != expected => Err(OperatorError::invalid_condition(format!(
                "{} needs {} component value(s), got {}",
                context, expected, found
            ))),
            _ => Ok(()),
        }
    }
}

impl From<f64> for BoundaryValue {
    fn from(value: f64) -> Self {
        Self::Uniform(value)
    }
}

impl From<Vec<f64>> for BoundaryValue {
    fn from(values: Vec<f64>) -> Self {
        Self::components(values)
    }
}

impl fmt::Display for BoundaryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryValue::Uniform(x) => write!(f, "{}", x),
            BoundaryValue::Components(values) => {
                let items = values.iter().map(|x| x.to_string()).collect::<Vec<_>>();
                write!(f, "[{}]", items.join(", "))
            }
        }
    }
}

// =================================================================================================
// Side condition
// =================================================================================================

/// Boundary condition declared for one side of one axis
///
/// Full conditions (`Value`, `Derivative`, `Mixed`) act on every component
/// independently. Normal conditions only constrain the component aligned
/// with the axis (for tensors: the column aligned with the axis), and carry
/// their value along the outward normal.
///
/// # Examples
///
/// ```rust
/// use stencil_rs::boundary::{BoundaryCondition, Side, SideCondition};
///
/// // Normal velocity of 2.0 leaving the domain through the lower side
/// let condition = SideCondition::normal_value(2.0);
/// let vx = condition.component_condition(Side::Lower, 0, &[0], 2).unwrap();
/// assert_eq!(vx, BoundaryCondition::Value(-2.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SideCondition {
    /// Periodic continuation (must be declared on both sides)
    Periodic,

    /// Fixed value of every component
    Value(BoundaryValue),

    /// Fixed outward derivative of every component
    Derivative(BoundaryValue),

    /// `∂ₙf + c·f = b` for every component
    Mixed { value: BoundaryValue, coefficient: f64 },

    /// Fixed normal component `n·v`
    NormalValue(BoundaryValue),

    /// Fixed normal derivative of the normal component `∂ₙ(n·v)`
    NormalDerivative(BoundaryValue),
}

impl SideCondition {
    /// Dirichlet condition with a uniform value
    pub fn value(value: f64) -> Self {
        Self::Value(BoundaryValue::Uniform(value))
    }

    /// Neumann condition with a uniform outward derivative
    pub fn derivative(derivative: f64) -> Self {
        Self::Derivative(BoundaryValue::Uniform(derivative))
    }

    /// Zero outward derivative (reflecting boundary)
    pub fn neumann() -> Self {
        Self::derivative(0.0)
    }

    /// Zero value
    pub fn dirichlet() -> Self {
        Self::value(0.0)
    }

    /// Robin condition, validated on construction
    pub fn mixed(value: impl Into<BoundaryValue>, coefficient: f64) -> Result<Self> {
        let condition = Self::Mixed {
            value: value.into(),
            coefficient,
        };
        condition.validate()?;
        Ok(condition)
    }

    /// Fixed normal component of a vector or tensor field
    pub fn normal_value(value: impl Into<BoundaryValue>) -> Self {
        Self::NormalValue(value.into())
    }

    /// Fixed normal derivative of the normal component
    pub fn normal_derivative(derivative: impl Into<BoundaryValue>) -> Self {
        Self::NormalDerivative(derivative.into())
    }

    /// Check that every parameter is finite
    pub fn validate(&self) -> Result<()> {
        match self {
            SideCondition::Periodic => Ok(()),
            SideCondition::Value(v) | SideCondition::NormalValue(v) => v.validate("value"),
            SideCondition::Derivative(v) | SideCondition::NormalDerivative(v) => {
                v.validate("derivative")
            }
            SideCondition::Mixed { value, coefficient } => {
                value.validate("mixed value")?;
                finite("mixed coefficient", *coefficient)
            }
        }
    }

    /// Whether the condition is periodic
    pub fn is_periodic(&self) -> bool {
        matches!(self, SideCondition::Periodic)
    }

    /// Whether the condition imposes a vanishing derivative on every component
    pub fn is_reflecting(&self) -> bool {
        match self {
            SideCondition::Derivative(v) => v.is_zero(),
            SideCondition::Mixed { value, coefficient } => value.is_zero() && *coefficient == 0.0,
            _ => false,
        }
    }

    /// Check that the values carry the right number of components
    ///
    /// `rank` is the tensorial rank of the field and `dim` the number of grid axes.
    pub fn check_value_rank(&self, rank: usize, dim: usize) -> Result<()> {
        match self {
            SideCondition::Periodic => Ok(()),
            SideCondition::Value(v) | SideCondition::Derivative(v) => {
                v.expect_len(dim.pow(rank as u32), "full boundary condition")
            }
            SideCondition::Mixed { value, .. } => {
                value.expect_len(dim.pow(rank as u32), "mixed boundary condition")
            }
            SideCondition::NormalValue(v) | SideCondition::NormalDerivative(v) => match rank {
                0 => Err(OperatorError::invalid_condition(
                    "normal-component conditions need a vector or tensor field",
                )),
                1 => v.expect_len(1, "normal condition on a vector field"),
                _ => v.expect_len(dim.pow(rank as u32 - 1), "normal condition on a tensor field"),
            },
        }
    }

    /// Scalar condition seen by one component of the field
    ///
    /// # Arguments
    ///
    /// * `side` - side of the axis the condition is attached to
    /// * `axis` - index of that axis
    /// * `component` - component indices (empty for scalar fields)
    /// * `dim` - number of grid axes (= length of each component index range)
    pub fn component_condition(
        &self,
        side: Side,
        axis: usize,
        component: &[usize],
        dim: usize,
    ) -> Result<BoundaryCondition> {
        let flat = flat_index(component, dim);
        match self {
            SideCondition::Periodic => Ok(BoundaryCondition::Periodic),
            SideCondition::Value(v) => Ok(BoundaryCondition::Value(v.get(flat)?)),
            SideCondition::Derivative(v) => Ok(BoundaryCondition::Derivative(v.get(flat)?)),
            SideCondition::Mixed { value, coefficient } => Ok(BoundaryCondition::Mixed {
                value: value.get(flat)?,
                coefficient: *coefficient,
            }),
            SideCondition::NormalValue(v) => {
                let row = normal_row(component, axis, dim)?;
                Ok(BoundaryCondition::Value(side.normal_sign() * v.get(row)?))
            }
            SideCondition::NormalDerivative(v) => {
                let row = normal_row(component, axis, dim)?;
                Ok(BoundaryCondition::Derivative(side.normal_sign() * v.get(row)?))
            }
        }
    }
}

impl fmt::Display for SideCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SideCondition::Periodic => write!(f, "periodic"),
            SideCondition::Value(v) => write!(f, "value={}", v),
            SideCondition::Derivative(v) => write!(f, "derivative={}", v),
            SideCondition::Mixed { value, coefficient } => {
                write!(f, "mixed(value={}, coefficient={})", value, coefficient)
            }
            SideCondition::NormalValue(v) => write!(f, "normal_value={}", v),
            SideCondition::NormalDerivative(v) => write!(f, "normal_derivative={}", v),
        }
    }
}

/// Row-major flat index of a component
pub(crate) fn flat_index(component: &[usize], dim: usize) -> usize {
    component.iter().fold(0, |flat, &i| flat * dim + i)
}

/// Row of the component constrained by a normal condition
///
/// The last component index must be aligned with the axis; the remaining
/// indices select the entry of the boundary value.
fn normal_row(component: &[usize], axis: usize, dim: usize) -> Result<usize> {
    match component.split_last() {
        None => Err(OperatorError::invalid_condition(
            "normal-component conditions need a vector or tensor field",
        )),
        Some((&last, _)) if last != axis => Err(OperatorError::invalid_condition(format!(
            "normal condition on axis {} does not constrain tangential component {:?}",
            axis, component
        ))),
        Some((_, rest)) => Ok(flat_index(rest, dim)),
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_normal_sign() {
        assert_eq!(Side::Lower.normal_sign(), -1.0);
        assert_eq!(Side::Upper.normal_sign(), 1.0);
        assert_eq!(format!("{}", Side::Upper), "upper");
    }

    #[test]
    fn test_condition_validate() {
        assert!(BoundaryCondition::Value(1.0).validate().is_ok());
        assert!(BoundaryCondition::Derivative(f64::NAN).validate().is_err());
        assert!(BoundaryCondition::Mixed { value: 1.0, coefficient: f64::INFINITY }
            .validate()
            .is_err());
    }

    #[test]
    fn test_mixed_rejects_undefined_coefficient() {
        let result = SideCondition::mixed(1.0, f64::NAN);
        assert!(matches!(result, Err(OperatorError::InvalidCondition(_))));

        let result = SideCondition::mixed(f64::NAN, 1.0);
        assert!(matches!(result, Err(OperatorError::InvalidCondition(_))));
    }

    #[test]
    fn test_full_condition_per_component() {
        let condition = SideCondition::Value(BoundaryValue::components(vec![1.0, 2.0]));

        let first = condition.component_condition(Side::Lower, 0, &[0], 2).unwrap();
        let second = condition.component_condition(Side::Lower, 0, &[1], 2).unwrap();

        assert_eq!(first, BoundaryCondition::Value(1.0));
        assert_eq!(second, BoundaryCondition::Value(2.0));
    }

    #[test]
    fn test_uniform_condition_on_scalar() {
        let condition = SideCondition::derivative(3.0);
        let scalar = condition.component_condition(Side::Upper, 1, &[], 2).unwrap();
        assert_eq!(scalar, BoundaryCondition::Derivative(3.0));
    }

    #[test]
    fn test_normal_value_sign_flip() {
        let condition = SideCondition::normal_value(1.5);

        let lower = condition.component_condition(Side::Lower, 1, &[1], 2).unwrap();
        let upper = condition.component_condition(Side::Upper, 1, &[1], 2).unwrap();

        assert_eq!(lower, BoundaryCondition::Value(-1.5));
        assert_eq!(upper, BoundaryCondition::Value(1.5));
    }

    #[test]
    fn test_normal_derivative_sign_flip() {
        let condition = SideCondition::normal_derivative(0.5);
        let lower = condition.component_condition(Side::Lower, 0, &[0], 1).unwrap();
        assert_eq!(lower, BoundaryCondition::Derivative(-0.5));
    }

    #[test]
    fn test_normal_condition_rejects_tangential_component() {
        let condition = SideCondition::normal_value(1.0);
        let result = condition.component_condition(Side::Lower, 0, &[1], 2);
        assert!(matches!(result, Err(OperatorError::InvalidCondition(_))));
    }

    #[test]
    fn test_normal_condition_rejects_scalar() {
        let condition = SideCondition::normal_value(1.0);
        assert!(condition.component_condition(Side::Lower, 0, &[], 2).is_err());
        assert!(condition.check_value_rank(0, 2).is_err());
    }

    #[test]
    fn test_normal_condition_on_tensor_uses_row() {
        // n_β t_{αβ} = A_α on the upper side of axis 1
        let condition = SideCondition::normal_value(vec![4.0, 5.0]);

        let t01 = condition.component_condition(Side::Upper, 1, &[0, 1], 2).unwrap();
        let t11 = condition.component_condition(Side::Upper, 1, &[1, 1], 2).unwrap();

        assert_eq!(t01, BoundaryCondition::Value(4.0));
        assert_eq!(t11, BoundaryCondition::Value(5.0));
        assert!(condition.check_value_rank(2, 2).is_ok());
    }

    #[test]
    fn test_check_value_rank() {
        let condition = SideCondition::Value(BoundaryValue::components(vec![1.0, 2.0]));
        assert!(condition.check_value_rank(1, 2).is_ok());
        assert!(condition.check_value_rank(1, 3).is_err());
        assert!(condition.check_value_rank(2, 2).is_err());

        assert!(SideCondition::value(1.0).check_value_rank(2, 3).is_ok());
    }

    #[test]
    fn test_is_reflecting() {
        assert!(SideCondition::neumann().is_reflecting());
        assert!(!SideCondition::derivative(1.0).is_reflecting());
        assert!(!SideCondition::dirichlet().is_reflecting());
        assert!(SideCondition::mixed(0.0, 0.0).unwrap().is_reflecting());
    }

    #[test]
    fn test_flat_index() {
        assert_eq!(flat_index(&[], 3), 0);
        assert_eq!(flat_index(&[2], 3), 2);
        assert_eq!(flat_index(&[1, 2], 3), 5);
    }

    #[test]
    fn test_display() {
        assert_eq!(SideCondition::value(1.0).to_string(), "value=1");
        assert_eq!(
            SideCondition::normal_derivative(vec![1.0, 2.0]).to_string(),
            "normal_derivative=[1, 2]"
        );
        assert_eq!(BoundaryCondition::Periodic.to_string(), "periodic");
    }
}
