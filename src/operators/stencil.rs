//! Stencil assembly
//!
//! Every node of an axis is reduced to a [`LinearForm`]
//! `constant + Σ w_j · y[j]`, in which the virtual points `y[-1]` and `y[N]`
//! have already been replaced by their boundary rules. Duplicate indices are
//! merged, so the forms only ever reference in-range nodes and a single-node
//! axis needs no special handling.
//!
//! The forms of one axis make up an [`AxisStencil`], which is applied to
//! every lane of an n-dimensional array along that axis.

use crate::boundary::{AxisRules, VirtualPointRule};
use crate::error::{OperatorError, Result};
use crate::grid::Axis;
use ndarray::{ArrayView1, ArrayViewD, ArrayViewMut1, ArrayViewMutD, Zip};

// =================================================================================================
// Linear form
// =================================================================================================

/// Affine combination of node values
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinearForm {
    constant: f64,
    terms: Vec<(usize, f64)>,
}

impl LinearForm {
    /// The zero form
    pub fn zero() -> Self {
        Self::default()
    }

    /// The value of one node
    pub fn node(index: usize) -> Self {
        Self {
            constant: 0.0,
            terms: vec![(index, 1.0)],
        }
    }

    /// The value of a virtual point
    pub fn from_rule(rule: &VirtualPointRule) -> Self {
        let mut form = Self {
            constant: rule.offset,
            terms: Vec::with_capacity(1),
        };
        form.add_term(rule.source, rule.factor);
        form
    }

    /// Add `weight · y[index]`, merging with an existing term
    pub fn add_term(&mut self, index: usize, weight: f64) {
        if weight == 0.0 {
            return;
        }
        match self.terms.iter_mut().find(|(i, _)| *i == index) {
            Some((_, w)) => *w += weight,
            None => self.terms.push((index, weight)),
        }
    }

    /// Add `scale · other`
    pub fn add_scaled(&mut self, other: &LinearForm, scale: f64) {
        if scale == 0.0 {
            return;
        }
        self.constant += scale * other.constant;
        for &(index, weight) in &other.terms {
            self.add_term(index, scale * weight);
        }
    }

    /// Constant part
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Merged `(index, weight)` terms
    pub fn terms(&self) -> &[(usize, f64)] {
        &self.terms
    }

    /// Weight of one node (zero when absent)
    pub fn weight(&self, index: usize) -> f64 {
        self.terms
            .iter()
            .find(|(i, _)| *i == index)
            .map_or(0.0, |(_, w)| *w)
    }

    /// Largest node index referenced
    pub fn max_index(&self) -> Option<usize> {
        self.terms.iter().map(|(i, _)| *i).max()
    }

    /// Value of the form for one lane of node values
    #[inline]
    pub fn evaluate(&self, values: &ArrayView1<f64>) -> f64 {
        self.terms
            .iter()
            .fold(self.constant, |acc, &(index, weight)| acc + weight * values[index])
    }
}

/// Value at a possibly out-of-range index, expressed through the boundary rules
///
/// `index = -1` maps to the lower virtual point and `index = node_count` to
/// the upper one.
pub fn node_value(rules: &AxisRules, index: isize, node_count: usize) -> LinearForm {
    if index < 0 {
        LinearForm::from_rule(&rules.lower)
    } else if index as usize >= node_count {
        LinearForm::from_rule(&rules.upper)
    } else {
        LinearForm::node(index as usize)
    }
}

// =================================================================================================
// Axis stencil
// =================================================================================================

/// One linear form per node of an axis
#[derive(Debug, Clone, PartialEq)]
pub struct AxisStencil {
    nodes: Vec<LinearForm>,
}

impl AxisStencil {
    /// Build node by node
    pub fn from_fn(node_count: usize, f: impl FnMut(usize) -> LinearForm) -> Self {
        Self {
            nodes: (0..node_count).map(f).collect(),
        }
    }

    /// `(y[n+1] − y[n−1]) / (2Δ)`
    pub fn first_derivative(axis: &Axis, rules: &AxisRules) -> Self {
        let node_count = axis.node_count();
        let scale = 0.5 / axis.spacing();

        Self::from_fn(node_count, |n| {
            let mut form = LinearForm::zero();
            form.add_scaled(&node_value(rules, n as isize + 1, node_count), scale);
            form.add_scaled(&node_value(rules, n as isize - 1, node_count), -scale);
            form
        })
    }

    /// `(y[n+1] − 2y[n] + y[n−1]) / Δ²`
    pub fn second_derivative(axis: &Axis, rules: &AxisRules) -> Self {
        let node_count = axis.node_count();
        let scale = 1.0 / (axis.spacing() * axis.spacing());

        Self::from_fn(node_count, |n| {
            let mut form = LinearForm::zero();
            form.add_scaled(&node_value(rules, n as isize + 1, node_count), scale);
            form.add_term(n, -2.0 * scale);
            form.add_scaled(&node_value(rules, n as isize - 1, node_count), scale);
            form
        })
    }

    /// `w(n) · y[n]`
    pub fn diagonal(node_count: usize, weight: impl Fn(usize) -> f64) -> Self {
        Self::from_fn(node_count, |n| {
            let mut form = LinearForm::zero();
            form.add_term(n, weight(n));
            form
        })
    }

    /// Add another stencil of the same length
    pub fn add(&mut self, other: &AxisStencil) {
        self.add_weighted(other, |_| 1.0);
    }

    /// Add another stencil, scaling node `n` by `weight(n)`
    pub fn add_weighted(&mut self, other: &AxisStencil, weight: impl Fn(usize) -> f64) {
        for (n, (form, extra)) in self.nodes.iter_mut().zip(&other.nodes).enumerate() {
            form.add_scaled(extra, weight(n));
        }
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the stencil has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Form of one node
    pub fn node(&self, n: usize) -> &LinearForm {
        &self.nodes[n]
    }

    /// Apply to a single lane of values
    pub fn apply(&self, values: &[f64]) -> Vec<f64> {
        let view = ArrayView1::from(values);
        self.nodes.iter().map(|form| form.evaluate(&view)).collect()
    }

    /// Add the stencil applied to `input` into `output`
    #[inline]
    pub fn accumulate_lane(&self, input: ArrayView1<f64>, mut output: ArrayViewMut1<f64>) {
        for (out, form) in output.iter_mut().zip(&self.nodes) {
            *out += form.evaluate(&input);
        }
    }

    /// Add the stencil applied along `axis` of `input` into `output`
    ///
    /// Lanes are independent; above [`parallel_threshold()`](crate::operators::parallel_threshold)
    /// elements they are processed with rayon when the `parallel` feature is on.
    pub fn accumulate_along(
        &self,
        input: ArrayViewD<f64>,
        axis: usize,
        output: ArrayViewMutD<f64>,
    ) -> Result<()> {
        self.accumulate_with_threshold(input, axis, output, crate::operators::parallel_threshold())
    }

    fn accumulate_with_threshold(
        &self,
        input: ArrayViewD<f64>,
        axis: usize,
        output: ArrayViewMutD<f64>,
        threshold: usize,
    ) -> Result<()> {
        if input.shape() != output.shape() {
            return Err(OperatorError::shape_mismatch(
                format!("{:?}", output.shape()),
                format!("{:?}", input.shape()),
            ));
        }
        if axis >= input.ndim() || input.len_of(ndarray::Axis(axis)) != self.len() {
            return Err(OperatorError::shape_mismatch(
                format!("{} nodes along array axis {}", self.len(), axis),
                format!("{:?}", input.shape()),
            ));
        }

        let mut output = output;

        if input.len() > threshold {
            #[cfg(feature = "parallel")]
            {
                if input.len() == self.len() {
                    // a single lane: split its nodes across the pool instead
                    let lane = input.lanes(ndarray::Axis(axis)).into_iter().next();
                    let out = output.lanes_mut(ndarray::Axis(axis)).into_iter().next();
                    if let (Some(lane), Some(out)) = (lane, out) {
                        self.accumulate_nodes_parallel(lane, out);
                    }
                } else {
                    Zip::from(output.lanes_mut(ndarray::Axis(axis)))
                        .and(input.lanes(ndarray::Axis(axis)))
                        .par_for_each(|out, lane| self.accumulate_lane(lane, out));
                }
            }

            // parallel feature not compiled in: fall through to sequential.
            #[cfg(not(feature = "parallel"))]
            Zip::from(output.lanes_mut(ndarray::Axis(axis)))
                .and(input.lanes(ndarray::Axis(axis)))
                .for_each(|out, lane| self.accumulate_lane(lane, out));
        } else {
            Zip::from(output.lanes_mut(ndarray::Axis(axis)))
                .and(input.lanes(ndarray::Axis(axis)))
                .for_each(|out, lane| self.accumulate_lane(lane, out));
        }

        Ok(())
    }

    /// Evaluate the forms of one long lane concurrently
    #[cfg(feature = "parallel")]
    fn accumulate_nodes_parallel(&self, input: ArrayView1<f64>, mut output: ArrayViewMut1<f64>) {
        use rayon::prelude::*;

        let values: Vec<f64> = self
            .nodes
            .par_iter()
            .map(|form| form.evaluate(&input))
            .collect();

        for (out, value) in output.iter_mut().zip(values) {
            *out += value;
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::{resolve_virtual_point, BoundaryCondition, Side};
    use approx::assert_relative_eq;
    use ndarray::{Array2, ArrayD, IxDyn};

    fn rules(lower: BoundaryCondition, upper: BoundaryCondition, axis: &Axis) -> AxisRules {
        AxisRules::resolve(&lower, &upper, axis.spacing(), axis.node_count()).unwrap()
    }

    #[test]
    fn test_linear_form_merges_terms() {
        let mut form = LinearForm::node(2);
        form.add_term(2, 0.5);
        form.add_term(0, 0.0);
        form.add_scaled(&LinearForm::node(1), -3.0);

        assert_eq!(form.terms(), &[(2, 1.5), (1, -3.0)]);
        assert_eq!(form.weight(0), 0.0);
        assert_eq!(form.max_index(), Some(2));
    }

    #[test]
    fn test_node_value_substitutes_virtual_points() {
        let axis = Axis::new("x", 4, 1.0).unwrap();
        let rules = rules(BoundaryCondition::Value(2.0), BoundaryCondition::Derivative(1.0), &axis);

        let lower = node_value(&rules, -1, 4);
        assert_eq!(lower.constant(), 4.0);
        assert_eq!(lower.terms(), &[(0, -1.0)]);

        let upper = node_value(&rules, 4, 4);
        assert_eq!(upper.constant(), 1.0);
        assert_eq!(upper.terms(), &[(3, 1.0)]);

        assert_eq!(node_value(&rules, 2, 4), LinearForm::node(2));
    }

    #[test]
    fn test_dirichlet_second_derivative() {
        let axis = Axis::new("x", 4, 1.0).unwrap();
        let rules = rules(BoundaryCondition::Value(0.0), BoundaryCondition::Value(0.0), &axis);
        let lap = AxisStencil::second_derivative(&axis, &rules).apply(&[1.0, 2.0, 3.0, 4.0]);

        // y[-1] = -1, y[4] = -4
        assert_relative_eq!(lap[0], 2.0 - 2.0 * 1.0 - 1.0);
        assert_relative_eq!(lap[1], 0.0);
        assert_relative_eq!(lap[3], -4.0 - 2.0 * 4.0 + 3.0);
    }

    #[test]
    fn test_neumann_first_derivative() {
        let axis = Axis::new("x", 4, 1.0).unwrap();
        let rules = rules(BoundaryCondition::Derivative(0.0), BoundaryCondition::Derivative(0.0), &axis);
        let grad = AxisStencil::first_derivative(&axis, &rules).apply(&[1.0, 2.0, 3.0, 4.0]);

        assert_relative_eq!(grad[0], 0.5);
        assert_relative_eq!(grad[1], 1.0);
        assert_relative_eq!(grad[3], 0.5);
    }

    #[test]
    fn test_single_node_periodic_axis_vanishes() {
        let axis = Axis::periodic("x", 1, 0.3).unwrap();
        let rules = rules(BoundaryCondition::Periodic, BoundaryCondition::Periodic, &axis);

        let second = AxisStencil::second_derivative(&axis, &rules);
        let first = AxisStencil::first_derivative(&axis, &rules);
        assert!(second.node(0).terms().iter().all(|(_, w)| *w == 0.0));
        assert!(first.node(0).terms().iter().all(|(_, w)| *w == 0.0));
        assert_eq!(second.apply(&[7.0]), vec![0.0]);
    }

    #[test]
    fn test_single_node_mixed_boundaries() {
        // y[-1] = 2a - y0, y[1] = bΔ + y0
        let axis = Axis::new("x", 1, 0.5).unwrap();
        let rules = rules(BoundaryCondition::Value(1.0), BoundaryCondition::Derivative(2.0), &axis);
        let lap = AxisStencil::second_derivative(&axis, &rules).apply(&[3.0]);

        let expected = ((1.0 + 3.0) - 2.0 * 3.0 + (2.0 - 3.0)) / 0.25;
        assert_relative_eq!(lap[0], expected, epsilon = 1e-14);
    }

    #[test]
    fn test_diagonal_and_weighted_sum() {
        let axis = Axis::new("x", 3, 1.0).unwrap();
        let rules = rules(BoundaryCondition::Derivative(0.0), BoundaryCondition::Derivative(0.0), &axis);

        let mut stencil = AxisStencil::diagonal(3, |n| n as f64);
        stencil.add_weighted(&AxisStencil::first_derivative(&axis, &rules), |_| 2.0);

        let out = stencil.apply(&[1.0, 1.0, 1.0]);
        assert_eq!(out, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_accumulate_along_each_axis() {
        let x = Axis::periodic("x", 3, 1.0).unwrap();
        let y = Axis::new("y", 2, 1.0).unwrap();
        let x_rules = rules(BoundaryCondition::Periodic, BoundaryCondition::Periodic, &x);
        let y_rules = rules(BoundaryCondition::Derivative(0.0), BoundaryCondition::Derivative(0.0), &y);

        let input = Array2::from_shape_fn((3, 2), |(i, j)| (i * 10 + j) as f64).into_dyn();
        let mut output = ArrayD::zeros(IxDyn(&[3, 2]));

        AxisStencil::first_derivative(&x, &x_rules)
            .accumulate_along(input.view(), 0, output.view_mut())
            .unwrap();
        assert_relative_eq!(output[[1, 0]], 10.0);
        assert_relative_eq!(output[[0, 1]], (10.0 - 20.0) / 2.0);

        let mut along_y = ArrayD::zeros(IxDyn(&[3, 2]));
        AxisStencil::first_derivative(&y, &y_rules)
            .accumulate_along(input.view(), 1, along_y.view_mut())
            .unwrap();
        assert_relative_eq!(along_y[[2, 0]], 0.5);
        assert_relative_eq!(along_y[[2, 1]], 0.5);
    }

    #[test]
    fn test_parallel_and_sequential_paths_agree() {
        let axis = Axis::new("x", 64, 0.1).unwrap();
        let rules = rules(BoundaryCondition::Value(1.0), BoundaryCondition::Derivative(-2.0), &axis);
        let stencil = AxisStencil::second_derivative(&axis, &rules);
        let input = Array2::from_shape_fn((64, 32), |(i, j)| ((i * j) as f64 * 0.01).sin()).into_dyn();

        let run = |threshold: usize| {
            let mut out = ArrayD::zeros(IxDyn(&[64, 32]));
            stencil
                .accumulate_with_threshold(input.view(), 0, out.view_mut(), threshold)
                .unwrap();
            out
        };
        let sequential = run(usize::MAX);
        let parallel = run(1);

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_single_lane_parallel_path_agrees() {
        // one long lane takes the per-node path instead of the per-lane one
        let axis = Axis::new("x", 200, 0.05).unwrap();
        let rules = rules(BoundaryCondition::Derivative(0.5), BoundaryCondition::Value(-1.0), &axis);
        let stencil = AxisStencil::second_derivative(&axis, &rules);
        let input = ArrayD::from_shape_fn(IxDyn(&[1, 200]), |index| (index[1] as f64 * 0.1).cos());

        let run = |threshold: usize| {
            let mut out = ArrayD::from_elem(IxDyn(&[1, 200]), 1.0);
            stencil
                .accumulate_with_threshold(input.view(), 1, out.view_mut(), threshold)
                .unwrap();
            out
        };
        let sequential = run(usize::MAX);
        let parallel = run(1);

        assert_eq!(sequential, parallel);
        let values: Vec<f64> = input.iter().copied().collect();
        assert_eq!(sequential[[0, 0]], 1.0 + stencil.apply(&values)[0]);
    }

    #[test]
    fn test_accumulate_rejects_wrong_length() {
        let axis = Axis::new("x", 4, 1.0).unwrap();
        let rules = rules(BoundaryCondition::Value(0.0), BoundaryCondition::Value(0.0), &axis);
        let input = ArrayD::<f64>::zeros(IxDyn(&[5]));
        let mut output = ArrayD::zeros(IxDyn(&[5]));

        let result = AxisStencil::first_derivative(&axis, &rules).accumulate_along(
            input.view(),
            0,
            output.view_mut(),
        );
        assert!(matches!(result, Err(OperatorError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_rules_from_resolver_round_through_forms() {
        let rule = resolve_virtual_point(&BoundaryCondition::Value(0.5), 1.0, 3, Side::Upper).unwrap();
        let form = LinearForm::from_rule(&rule);
        assert_eq!(form.evaluate(&ArrayView1::from(&[0.0, 0.0, 2.0][..])), 1.0 - 2.0);
    }
}
