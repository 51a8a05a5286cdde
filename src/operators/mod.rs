//! Differential operators
//!
//! Finite-difference operators on cell-centered grids. Every operator is a
//! composition of one-dimensional [`AxisStencil`]s: for each component of
//! the input field and each grid axis, the boundary rules of that component
//! are resolved, the geometry supplies the stencil, and the stencil is
//! accumulated into the matching component of the output.
//!
//! # Module Organization
//!
//! - **`traits`**: the `DifferentialOperator` trait
//! - **`stencil`**: `LinearForm` and `AxisStencil`, the folded per-node stencils
//! - **`scalar`**: `Laplacian` and `Gradient`
//! - **`vector`**: `Divergence`, `VectorLaplacian` and `VectorGradient`
//! - **`tensor`**: `TensorDivergence`
//!
//! # Available Operators
//!
//! | Operator | Input | Output |
//! |----------|-------|--------|
//! | Laplacian | scalar | scalar |
//! | Gradient | scalar | vector |
//! | Divergence | vector | scalar |
//! | Vector Laplacian | vector | vector |
//! | Vector Gradient | vector | tensor |
//! | Tensor Divergence | tensor | vector |
//!
//! Curl and advection are not available and fail with
//! [`OperatorError::UnsupportedOperator`].
//!
//! # Example
//!
//! ```rust
//! use stencil_rs::boundary::{BoundarySpec, SideCondition};
//! use stencil_rs::field::{Field, FieldRank};
//! use stencil_rs::grid::{Axis, Geometry};
//! use stencil_rs::operators::{apply_operator, LaplacianMode, OperatorKind};
//!
//! let geometry = Geometry::cartesian(vec![Axis::new("x", 4, 1.0)?])?;
//! let boundaries = BoundarySpec::uniform(&geometry, SideCondition::dirichlet())?;
//! let field = Field::from_vec(&geometry, FieldRank::Scalar, vec![1.0, 2.0, 3.0, 4.0])?;
//!
//! let lap = apply_operator(
//!     OperatorKind::Laplacian(LaplacianMode::Standard),
//!     &geometry,
//!     &field,
//!     &boundaries,
//! )?;
//! assert_eq!(lap.data()[[0]], -1.0);
//! # Ok::<(), stencil_rs::OperatorError>(())
//! ```

// =================================================================================================
// Module Declarations
// =================================================================================================
mod traits;
pub mod stencil;
mod scalar;
mod vector;
mod tensor;

// =================================================================================================
// Parallel Execution Threshold
// =================================================================================================
//
// Lanes along an axis are independent, so a stencil sweep can be split over
// the rayon pool. The split only pays off on large fields; the threshold is
// an AtomicUsize so benchmarks can move it at runtime. Relaxed ordering is
// enough, the value is a performance hint.
// =================================================================================================

use std::sync::atomic::{AtomicUsize, Ordering};

/// Default number of field elements above which lanes are processed in parallel
const DEFAULT_PARALLEL_THRESHOLD: usize = 4095;

static PARALLEL_THRESHOLD: AtomicUsize = AtomicUsize::new(DEFAULT_PARALLEL_THRESHOLD);

/// Current parallel-execution threshold
///
/// Stencil sweeps over arrays with more elements than this value use rayon,
/// provided the crate is compiled with the `parallel` feature.
///
/// # Example
///
/// ```rust
/// use stencil_rs::operators::parallel_threshold;
///
/// assert!(parallel_threshold() > 0);
/// ```
pub fn parallel_threshold() -> usize {
    PARALLEL_THRESHOLD.load(Ordering::Relaxed)
}

/// Set the parallel-execution threshold
///
/// # Panics
///
/// Panics when `threshold == 0`.
///
/// # Example
///
/// ```rust
/// use stencil_rs::operators::{parallel_threshold, set_parallel_threshold};
///
/// let previous = parallel_threshold();
/// set_parallel_threshold(1 << 16);
/// assert_eq!(parallel_threshold(), 1 << 16);
/// set_parallel_threshold(previous);
/// ```
pub fn set_parallel_threshold(threshold: usize) {
    assert!(threshold > 0, "parallel threshold must be at least 1");
    PARALLEL_THRESHOLD.store(threshold, Ordering::Relaxed);
}

/// Saves the threshold on construction and restores it on drop
#[cfg(test)]
pub(crate) struct ThresholdGuard {
    previous: usize,
}

#[cfg(test)]
impl ThresholdGuard {
    pub(crate) fn save(new_value: usize) -> Self {
        let previous = parallel_threshold();
        set_parallel_threshold(new_value);
        Self { previous }
    }
}

#[cfg(test)]
impl Drop for ThresholdGuard {
    fn drop(&mut self) {
        PARALLEL_THRESHOLD.store(self.previous, Ordering::Relaxed);
    }
}

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use scalar::{Gradient, Laplacian};
pub use stencil::{AxisStencil, LinearForm};
pub use tensor::TensorDivergence;
pub use traits::DifferentialOperator;
pub use vector::{Divergence, VectorGradient, VectorLaplacian};

// =================================================================================================
// Operator selection
// =================================================================================================

use crate::boundary::BoundarySpec;
use crate::error::{OperatorError, Result};
use crate::field::Field;
use crate::grid::Geometry;
use std::fmt;
use std::str::FromStr;

/// Discretization of the Laplacian
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LaplacianMode {
    /// Centered second derivative plus the radial first-derivative term
    #[default]
    Standard,

    /// Flux form whose volume integral vanishes under zero-flux boundaries
    ///
    /// Only available on spherical grids.
    Conservative,
}

/// Requested operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    /// Scalar Laplacian in the given discretization
    Laplacian(LaplacianMode),
    /// Scalar to vector
    Gradient,
    /// Vector to scalar
    Divergence,
    /// Component-wise Laplacian of a vector field
    VectorLaplacian,
    /// Vector to tensor, `out[c][i] = ∂v[c]/∂x_i`
    VectorGradient,
    /// Tensor to vector, row-wise divergence
    TensorDivergence,
    /// Not implemented on any grid
    Curl,
    /// Not implemented on any grid
    Advection,
}

impl OperatorKind {
    /// Instantiate the operator
    ///
    /// # Errors
    ///
    /// [`OperatorError::UnsupportedOperator`] for curl and advection.
    pub fn operator(self) -> Result<Box<dyn DifferentialOperator>> {
        match self {
            OperatorKind::Laplacian(mode) => Ok(Box::new(Laplacian::new(mode))),
            OperatorKind::Gradient => Ok(Box::new(Gradient)),
            OperatorKind::Divergence => Ok(Box::new(Divergence)),
            OperatorKind::VectorLaplacian => Ok(Box::new(VectorLaplacian)),
            OperatorKind::VectorGradient => Ok(Box::new(VectorGradient)),
            OperatorKind::TensorDivergence => Ok(Box::new(TensorDivergence)),
            OperatorKind::Curl | OperatorKind::Advection => Err(OperatorError::unsupported(
                format!("{} is not implemented for any grid", self),
            )),
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatorKind::Laplacian(LaplacianMode::Standard) => write!(f, "laplace"),
            OperatorKind::Laplacian(LaplacianMode::Conservative) => write!(f, "laplace_conservative"),
            OperatorKind::Gradient => write!(f, "gradient"),
            OperatorKind::Divergence => write!(f, "divergence"),
            OperatorKind::VectorLaplacian => write!(f, "vector_laplace"),
            OperatorKind::VectorGradient => write!(f, "vector_gradient"),
            OperatorKind::TensorDivergence => write!(f, "tensor_divergence"),
            OperatorKind::Curl => write!(f, "curl"),
            OperatorKind::Advection => write!(f, "advection"),
        }
    }
}

impl FromStr for OperatorKind {
    type Err = OperatorError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "laplace" | "laplacian" => Ok(OperatorKind::Laplacian(LaplacianMode::Standard)),
            "laplace_conservative" => Ok(OperatorKind::Laplacian(LaplacianMode::Conservative)),
            "gradient" => Ok(OperatorKind::Gradient),
            "divergence" => Ok(OperatorKind::Divergence),
            "vector_laplace" => Ok(OperatorKind::VectorLaplacian),
            "vector_gradient" => Ok(OperatorKind::VectorGradient),
            "tensor_divergence" => Ok(OperatorKind::TensorDivergence),
            "curl" => Ok(OperatorKind::Curl),
            "advection" => Ok(OperatorKind::Advection),
            _ => Err(OperatorError::unsupported(format!("unknown operator '{}'", name))),
        }
    }
}

/// Apply an operator to a field
///
/// # Errors
///
/// - [`OperatorError::UnsupportedOperator`] for curl, advection, or a
///   conservative Laplacian outside spherical grids
/// - [`OperatorError::ShapeMismatch`] if the field does not fit the grid or the operator
/// - [`OperatorError::InvalidCondition`] / [`OperatorError::DegenerateCondition`]
///   for boundary conditions that cannot be resolved
pub fn apply_operator(
    kind: OperatorKind,
    geometry: &Geometry,
    field: &Field,
    boundaries: &BoundarySpec,
) -> Result<Field> {
    kind.operator()?.apply(geometry, field, boundaries)
}

// =================================================================================================
// Tests
// =================================================================================================
