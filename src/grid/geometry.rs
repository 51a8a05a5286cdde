//! Grid geometry: kind of coordinate system plus its axes

use crate::error::{OperatorError, Result};
use crate::field::Field;
use crate::grid::coordinates::{Cartesian, CoordinateSystem, Cylindrical, Spherical};
use crate::grid::Axis;
use ndarray::{ArrayD, IxDyn};
use std::fmt;

/// Kind of grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridKind {
    /// Any number of independent flat axes
    Cartesian,

    /// Axisymmetric grid, axes `[r, z]`
    Cylindrical,

    /// Radially symmetric grid, axis `[r]`
    Spherical,
}

impl GridKind {
    /// Strategy providing the geometry-specific stencils
    pub fn coordinate_system(self) -> &'static dyn CoordinateSystem {
        match self {
            GridKind::Cartesian => &Cartesian,
            GridKind::Cylindrical => &Cylindrical,
            GridKind::Spherical => &Spherical,
        }
    }
}

impl fmt::Display for GridKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridKind::Cartesian => write!(f, "cartesian"),
            GridKind::Cylindrical => write!(f, "cylindrical"),
            GridKind::Spherical => write!(f, "spherical"),
        }
    }
}

/// Grid metadata consumed by the operators
///
/// # Examples
///
/// ```rust
/// use stencil_rs::grid::{Axis, Geometry, GridKind};
///
/// let geometry = Geometry::cylindrical(
///     Axis::radial(16, 0.1, 0.0).unwrap(),
///     Axis::periodic("z", 32, 0.1).unwrap(),
/// ).unwrap();
///
/// assert_eq!(geometry.kind(), GridKind::Cylindrical);
/// assert_eq!(geometry.shape(), vec![16, 32]);
/// assert!(!geometry.has_hole());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    kind: GridKind,
    axes: Vec<Axis>,
}

impl Geometry {
    /// Cartesian grid with one or more axes
    pub fn cartesian(axes: Vec<Axis>) -> Result<Self> {
        if axes.is_empty() {
            return Err(OperatorError::InvalidGrid("a grid needs at least one axis".into()));
        }
        if let Some(axis) = axes.iter().find(|axis| axis.is_radial()) {
            return Err(OperatorError::InvalidGrid(format!(
                "radial axis '{}' cannot be used in a cartesian grid",
                axis.name()
            )));
        }
        Ok(Self {
            kind: GridKind::Cartesian,
            axes,
        })
    }

    /// Axisymmetric grid from a radial and an axial axis
    pub fn cylindrical(radial: Axis, axial: Axis) -> Result<Self> {
        if !radial.is_radial() {
            return Err(OperatorError::InvalidGrid(
                "first axis of a cylindrical grid must be radial".into(),
            ));
        }
        if axial.is_radial() {
            return Err(OperatorError::InvalidGrid(
                "second axis of a cylindrical grid must be axial".into(),
            ));
        }
        Ok(Self {
            kind: GridKind::Cylindrical,
            axes: vec![radial, axial],
        })
    }

    /// Radially symmetric grid
    pub fn spherical(radial: Axis) -> Result<Self> {
        if !radial.is_radial() {
            return Err(OperatorError::InvalidGrid(
                "axis of a spherical grid must be radial".into(),
            ));
        }
        Ok(Self {
            kind: GridKind::Spherical,
            axes: vec![radial],
        })
    }

    /// Kind of grid
    pub fn kind(&self) -> GridKind {
        self.kind
    }

    /// Strategy providing the geometry-specific stencils
    pub fn coordinate_system(&self) -> &'static dyn CoordinateSystem {
        self.kind.coordinate_system()
    }

    /// All axes
    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    /// One axis
    pub fn axis(&self, index: usize) -> Result<&Axis> {
        self.axes.get(index).ok_or_else(|| {
            OperatorError::InvalidGrid(format!(
                "axis {} requested on a grid with {} axes",
                index,
                self.axes.len()
            ))
        })
    }

    /// Number of axes
    pub fn dim(&self) -> usize {
        self.axes.len()
    }

    /// Node count along every axis
    pub fn shape(&self) -> Vec<usize> {
        self.axes.iter().map(Axis::node_count).collect()
    }

    /// Total number of nodes
    pub fn node_count(&self) -> usize {
        self.axes.iter().map(Axis::node_count).product()
    }

    /// Whether the radial axis excludes the origin
    pub fn has_hole(&self) -> bool {
        self.axes
            .iter()
            .any(|axis| axis.is_radial() && !axis.has_origin())
    }

    /// Volume of every cell
    pub fn cell_volumes(&self) -> ArrayD<f64> {
        let coordinates = self.coordinate_system();
        let measures: Vec<Vec<f64>> = self
            .axes
            .iter()
            .enumerate()
            .map(|(index, axis)| coordinates.cell_measure(index, axis))
            .collect();

        let mut volumes = ArrayD::ones(IxDyn(&self.shape()));
        for (index, volume) in volumes.indexed_iter_mut() {
            *volume = measures
                .iter()
                .enumerate()
                .map(|(axis, measure)| measure[index[axis]])
                .product();
        }
        volumes
    }

    /// Volume integral of every component of a field
    ///
    /// Returns one value per component, in row-major component order.
    pub fn integrate(&self, field: &Field) -> Result<Vec<f64>> {
        field.check_grid(self)?;
        let volumes = self.cell_volumes();

        Ok(field
            .component_indices()
            .iter()
            .map(|component| {
                field
                    .component(component)
                    .iter()
                    .zip(volumes.iter())
                    .map(|(value, volume)| value * volume)
                    .sum()
            })
            .collect())
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let axes = self
            .axes
            .iter()
            .map(|axis| axis.to_string())
            .collect::<Vec<_>>();
        write!(f, "{} grid [{}]", self.kind, axes.join("; "))
    }
}
