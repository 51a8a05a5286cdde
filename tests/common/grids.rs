//! Grid fixtures shared by the integration tests

use stencil_rs::grid::{Axis, Geometry};

/// Non-periodic Cartesian line `[0, n·dx]`
pub fn line(node_count: usize, spacing: f64) -> Geometry {
    Geometry::cartesian(vec![Axis::new("x", node_count, spacing).unwrap()]).unwrap()
}

/// Periodic square box with `n × n` nodes on `[0, 1]²`
pub fn periodic_box(node_count: usize) -> Geometry {
    let spacing = 1.0 / node_count as f64;
    Geometry::cartesian(vec![
        Axis::periodic("x", node_count, spacing).unwrap(),
        Axis::periodic("y", node_count, spacing).unwrap(),
    ])
    .unwrap()
}

/// Spherical grid of radius `n·dr` around the origin
pub fn solid_sphere(node_count: usize, spacing: f64) -> Geometry {
    Geometry::spherical(Axis::radial(node_count, spacing, 0.0).unwrap()).unwrap()
}

/// Cylindrical grid without hole and a non-periodic axial axis
pub fn cylinder(radial_nodes: usize, axial_nodes: usize, spacing: f64) -> Geometry {
    Geometry::cylindrical(
        Axis::radial(radial_nodes, spacing, 0.0).unwrap(),
        Axis::new("z", axial_nodes, spacing).unwrap(),
    )
    .unwrap()
}
