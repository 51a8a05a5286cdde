//! Field data
//!
//! A field stores one value per grid node for every component. The
//! component indices come first, so a rank-`k` field on a grid with `d`
//! axes has shape `[d; k] ++ grid_shape`:
//!
//! | Rank | Shape on a `[nx, ny]` grid |
//! |------|----------------------------|
//! | Scalar | `[nx, ny]` |
//! | Vector | `[2, nx, ny]` |
//! | Tensor | `[2, 2, nx, ny]` |
//!
//! Tensor components are addressed row-major: `t[α][β]`.

use crate::error::{OperatorError, Result};
use crate::grid::Geometry;
use ndarray::{Array, ArrayD, ArrayViewD, ArrayViewMutD, Axis, Dimension, IxDyn};
use std::fmt;

/// Tensorial rank of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRank {
    /// One value per node
    Scalar,

    /// `dim` values per node
    Vector,

    /// `dim × dim` values per node
    Tensor,
}

impl FieldRank {
    /// Number of component indices
    pub fn order(self) -> usize {
        match self {
            FieldRank::Scalar => 0,
            FieldRank::Vector => 1,
            FieldRank::Tensor => 2,
        }
    }

    /// Number of components on a grid with `dim` axes
    pub fn component_count(self, dim: usize) -> usize {
        dim.pow(self.order() as u32)
    }

    /// All component indices in row-major order
    ///
    /// A scalar has the single empty index.
    pub fn component_indices(self, dim: usize) -> Vec<Vec<usize>> {
        match self {
            FieldRank::Scalar => vec![vec![]],
            FieldRank::Vector => (0..dim).map(|i| vec![i]).collect(),
            FieldRank::Tensor => (0..dim)
                .flat_map(|i| (0..dim).map(move |j| vec![i, j]))
                .collect(),
        }
    }
}

impl fmt::Display for FieldRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRank::Scalar => write!(f, "scalar"),
            FieldRank::Vector => write!(f, "vector"),
            FieldRank::Tensor => write!(f, "tensor"),
        }
    }
}

/// Discretized scalar, vector or tensor field
///
/// # Examples
///
/// ```rust
/// use stencil_rs::field::{Field, FieldRank};
/// use stencil_rs::grid::{Axis, Geometry};
///
/// let geometry = Geometry::cartesian(vec![
///     Axis::new("x", 8, 0.5).unwrap(),
///     Axis::new("y", 4, 0.5).unwrap(),
/// ]).unwrap();
///
/// // v = (x, -y)
/// let v = Field::from_fn(&geometry, FieldRank::Vector, |component, coords| {
///     if component[0] == 0 { coords[0] } else { -coords[1] }
/// });
///
/// assert_eq!(v.shape(), &[2, 8, 4]);
/// assert_eq!(v.component(&[1])[[0, 0]], -0.25);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    rank: FieldRank,
    data: ArrayD<f64>,
}

impl Field {
    // ======================================= constructors =======================================

    /// Create from raw data, checking that the leading axes have length `dim`
    pub fn new(rank: FieldRank, data: ArrayD<f64>) -> Result<Self> {
        let order = rank.order();
        if data.ndim() <= order {
            return Err(OperatorError::shape_mismatch(
                format!("at least {} axes for a {} field", order + 1, rank),
                format!("{:?}", data.shape()),
            ));
        }

        let dim = data.ndim() - order;
        if data.shape()[..order].iter().any(|&n| n != dim) {
            return Err(OperatorError::shape_mismatch(
                format!("{} leading axes of length {}", order, dim),
                format!("{:?}", data.shape()),
            ));
        }

        Ok(Self { rank, data })
    }

    /// Scalar field from an array of grid shape
    pub fn scalar(data: ArrayD<f64>) -> Result<Self> {
        Self::new(FieldRank::Scalar, data)
    }

    /// Vector field from an array of shape `[dim] ++ grid_shape`
    pub fn vector(data: ArrayD<f64>) -> Result<Self> {
        Self::new(FieldRank::Vector, data)
    }

    /// Tensor field from an array of shape `[dim, dim] ++ grid_shape`
    pub fn tensor(data: ArrayD<f64>) -> Result<Self> {
        Self::new(FieldRank::Tensor, data)
    }

    /// Field from values in row-major order
    pub fn from_vec(geometry: &Geometry, rank: FieldRank, values: Vec<f64>) -> Result<Self> {
        let shape = Self::shape_for(geometry, rank);
        let found = values.len();
        let data = ArrayD::from_shape_vec(IxDyn(&shape), values).map_err(|_| {
            OperatorError::shape_mismatch(
                format!("{} values for shape {:?}", shape.iter().product::<usize>(), shape),
                format!("{} values", found),
            )
        })?;
        Ok(Self { rank, data })
    }

    /// Field with every component equal to zero
    pub fn zeros(geometry: &Geometry, rank: FieldRank) -> Self {
        Self::uniform(geometry, rank, 0.0)
    }

    /// Field with every component equal to `value`
    pub fn uniform(geometry: &Geometry, rank: FieldRank, value: f64) -> Self {
        Self {
            rank,
            data: Array::from_elem(IxDyn(&Self::shape_for(geometry, rank)), value),
        }
    }

    /// Field sampled from a function of component index and node coordinates
    pub fn from_fn(
        geometry: &Geometry,
        rank: FieldRank,
        f: impl Fn(&[usize], &[f64]) -> f64,
    ) -> Self {
        let order = rank.order();
        let coordinates: Vec<Vec<f64>> = geometry.axes().iter().map(|a| a.coordinates()).collect();

        let data = ArrayD::from_shape_fn(IxDyn(&Self::shape_for(geometry, rank)), |index| {
            let index = index.slice();
            let point: Vec<f64> = index[order..]
                .iter()
                .zip(&coordinates)
                .map(|(&n, axis)| axis[n])
                .collect();
            f(&index[..order], &point)
        });

        Self { rank, data }
    }

    fn shape_for(geometry: &Geometry, rank: FieldRank) -> Vec<usize> {
        let mut shape = vec![geometry.dim(); rank.order()];
        shape.extend(geometry.shape());
        shape
    }

    // ========================================== Queries ==========================================

    /// Tensorial rank
    pub fn rank(&self) -> FieldRank {
        self.rank
    }

    /// Number of grid axes
    pub fn dim(&self) -> usize {
        self.data.ndim() - self.rank.order()
    }

    /// Full shape, component axes first
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Shape of the grid part
    pub fn grid_shape(&self) -> &[usize] {
        &self.data.shape()[self.rank.order()..]
    }

    /// All component indices in row-major order
    pub fn component_indices(&self) -> Vec<Vec<usize>> {
        self.rank.component_indices(self.dim())
    }

    /// Whether every value is finite
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }

    /// Largest absolute value
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0, |acc: f64, x| acc.max(x.abs()))
    }

    /// Check that the field lives on `geometry`
    pub fn check_grid(&self, geometry: &Geometry) -> Result<()> {
        let expected = geometry.shape();
        if self.dim() != geometry.dim() || self.grid_shape() != expected.as_slice() {
            return Err(OperatorError::shape_mismatch(
                format!("grid shape {:?}", expected),
                format!("grid shape {:?}", self.grid_shape()),
            ));
        }
        Ok(())
    }

    /// Check that the field lives on `geometry` and has the given rank
    pub fn check_compatible(&self, geometry: &Geometry, rank: FieldRank) -> Result<()> {
        if self.rank != rank {
            return Err(OperatorError::shape_mismatch(
                format!("{} field", rank),
                format!("{} field", self.rank),
            ));
        }
        self.check_grid(geometry)
    }

    // ======================================== Extractions ========================================

    /// Underlying array
    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    /// Mutable view of the values
    ///
    /// A view rather than the array itself, so the shape (and with it the
    /// component axes) cannot be changed behind the field's back.
    pub fn data_mut(&mut self) -> ArrayViewMutD<'_, f64> {
        self.data.view_mut()
    }

    /// Consume into the underlying array
    pub fn into_data(self) -> ArrayD<f64> {
        self.data
    }

    /// Grid-shaped view of one component (panics on an out-of-range index)
    pub fn component(&self, component: &[usize]) -> ArrayViewD<'_, f64> {
        let mut view = self.data.view();
        for &index in component {
            view = view.index_axis_move(Axis(0), index);
        }
        view
    }

    /// Mutable grid-shaped view of one component
    pub fn component_mut(&mut self, component: &[usize]) -> ArrayViewMutD<'_, f64> {
        let mut view = self.data.view_mut();
        for &index in component {
            view = view.index_axis_move(Axis(0), index);
        }
        view
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} field {:?}", self.rank, self.shape())
    }
}

// =================================================================================================
// Tests
// =================================================================================================
