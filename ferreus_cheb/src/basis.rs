/////////////////////////////////////////////////////////////////////////////////////////////
//
// Evaluates Chebyshev polynomials of the first and second kind and maps between domains.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use faer::Mat;
use std::f64::consts::PI;

/// Selects which family of Chebyshev polynomials to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChebyshevKind {
    /// T_n(x) = cos(n arccos(x)).
    First,

    /// U_n(x) = sin((n + 1) arccos(x)) / sin(arccos(x)).
    Second,
}

/// Calculates the Chebyshev polynomials of the requested kind for degrees
/// `0..num_columns` at every node, returning a `nodes.len() × num_columns` matrix.
///
/// Uses the recurrence relation:
///  P_0(x) = 1 \n
///  T_1(x) = x, U_1(x) = 2x \n
///  P_{n+1}(x) = 2xP_n(x) - P_{n-1}(x) for n >= 1
///
/// The recurrence is defined for every real `x`. Outside `[-1, 1]` the values
/// grow without bound, which is expected.
pub fn evaluate_chebyshev_polynomials(
    kind: ChebyshevKind,
    num_columns: usize,
    nodes: &[f64],
) -> Mat<f64> {
    let num_rows = nodes.len();
    let mut pn_x = Mat::<f64>::zeros(num_rows, num_columns);

    for i in 0..num_rows {
        let x = nodes[i];
        for j in 0..num_columns {
            let value = if j == 0 {
                1.0
            } else if j == 1 {
                match kind {
                    ChebyshevKind::First => x,
                    ChebyshevKind::Second => 2.0 * x,
                }
            } else {
                2.0 * x * pn_x[(i, j - 1)] - pn_x[(i, j - 2)]
            };
            pn_x[(i, j)] = value;
        }
    }

    pn_x
}

/// Evaluates the requested degrees at the requested points.
///
/// Returns the outer-product matrix of shape `x_values.len() × degrees.len()`,
/// where entry `(i, j)` is `P_{degrees[j]}(x_values[i])`. A single degree or a
/// single point is simply a slice of length one.
fn evaluate_degrees(kind: ChebyshevKind, degrees: &[usize], x_values: &[f64]) -> Mat<f64> {
    let num_columns = degrees.iter().max().map_or(0, |max_degree| max_degree + 1);
    let all_degrees = evaluate_chebyshev_polynomials(kind, num_columns, x_values);

    Mat::from_fn(x_values.len(), degrees.len(), |i, j| all_degrees[(i, degrees[j])])
}

/// Chebyshev polynomials of the first kind, `T_n(x)`, for every pair of
/// `degrees × x_values`.
///
/// # Examples
///
/// ```
/// use ferreus_cheb::chebyshev_t;
///
/// let values = chebyshev_t(&[0, 1, 2], &[0.5]);
///
/// assert_eq!(values[(0, 0)], 1.0);
/// assert_eq!(values[(0, 1)], 0.5);
/// assert_eq!(values[(0, 2)], -0.5);
/// ```
pub fn chebyshev_t(degrees: &[usize], x_values: &[f64]) -> Mat<f64> {
    evaluate_degrees(ChebyshevKind::First, degrees, x_values)
}

/// Chebyshev polynomials of the second kind, `U_n(x)`, for every pair of
/// `degrees × x_values`.
pub fn chebyshev_u(degrees: &[usize], x_values: &[f64]) -> Mat<f64> {
    evaluate_degrees(ChebyshevKind::Second, degrees, x_values)
}

/// Evaluates a single `T_n(x)` with the three-term recurrence and rolling state.
#[inline]
pub fn chebyshev_t_scalar(n: usize, x: f64) -> f64 {
    match n {
        0 => 1.0,
        1 => x,
        _ => {
            let mut t_prev = 1.0;
            let mut t_curr = x;
            for _ in 1..n {
                let t_next = 2.0 * x * t_curr - t_prev;
                t_prev = t_curr;
                t_curr = t_next;
            }
            t_curr
        }
    }
}

/// Evaluates `P_n(x)` from the trigonometric definition.
///
/// `arccos` is undefined outside `[-1, 1]`, so those arguments fall back to
/// the recurrence form.
pub fn chebyshev_trigonometric(kind: ChebyshevKind, n: usize, x: f64) -> f64 {
    if !is_canonical(x) {
        return evaluate_chebyshev_polynomials(kind, n + 1, &[x])[(0, n)];
    }

    let theta = x.acos();
    match kind {
        ChebyshevKind::First => (n as f64 * theta).cos(),
        ChebyshevKind::Second => {
            let sin_theta = theta.sin();
            if sin_theta.abs() < f64::EPSILON {
                // Limit at x = ±1.
                let sign = if x < 0.0 && n % 2 == 1 { -1.0 } else { 1.0 };
                sign * (n + 1) as f64
            } else {
                ((n + 1) as f64 * theta).sin() / sin_theta
            }
        }
    }
}

/// Returns `true` when `x` lies inside the canonical interval `[-1, 1]`.
#[inline(always)]
pub fn is_canonical(x: f64) -> bool {
    (-1.0..=1.0).contains(&x)
}

/// Maps `x` from `[a, b]` onto the canonical interval `[-1, 1]`.
#[inline(always)]
pub fn to_canonical(x: f64, a: f64, b: f64) -> f64 {
    (2.0 * x - a - b) / (b - a)
}

/// Maps `z` from the canonical interval `[-1, 1]` back onto `[a, b]`.
#[inline(always)]
pub fn from_canonical(z: f64, a: f64, b: f64) -> f64 {
    0.5 * (z * (b - a) + a + b)
}

/// Generates the `num_nodes` extrema of `T_{num_nodes - 1}` on `[-1, 1]`
/// in ascending order, i.e. `-cos(pi * j / (num_nodes - 1))`.
pub fn chebyshev_extrema(num_nodes: usize) -> Vec<f64> {
    match num_nodes {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let n = (num_nodes - 1) as f64;
            (0..num_nodes)
                .map(|j| {
                    if 2 * j + 1 == num_nodes {
                        0.0
                    } else {
                        -(PI * j as f64 / n).cos()
                    }
                })
                .collect()
        }
    }
}

/// Number of nested extrema available at a Smolyak `level`:
/// `1` at level 0 and `2^level + 1` otherwise.
///
/// ### Panics
/// Panics if `2^level + 1` does not fit in a `usize`.
#[inline]
pub fn num_nested_nodes(level: usize) -> usize {
    assert!(
        level < usize::BITS as usize,
        "level {} exceeds the nested node range",
        level
    );
    match level {
        0 => 1,
        _ => (1usize << level) + 1,
    }
}

/// Returns the level at which the node at position `node_index` of the nested
/// sequence first appears.
#[inline]
pub fn level_of_node(node_index: usize) -> usize {
    match node_index {
        0 => 0,
        1 | 2 => 1,
        _ => (usize::BITS - (node_index - 1).leading_zeros()) as usize,
    }
}

/// Generates the nested Chebyshev extrema sequence up to and including `max_level`.
///
/// Nodes are ordered by the level that introduces them, so the first
/// [`num_nested_nodes`]`(l)` entries are exactly the extrema of level `l`:
///
/// ```text
///   level 0: [0]
///   level 1: [-1, 1]
///   level 2: [-cos(pi/4), cos(pi/4)]
///   level l: [-cos(pi * j / 2^l) for odd j in 1..2^l]
/// ```
///
/// Position `k` in this sequence is also the degree of the Chebyshev polynomial
/// paired with the node in a Smolyak basis.
pub fn nested_extrema_sequence(max_level: usize) -> Vec<f64> {
    let mut nodes = Vec::with_capacity(num_nested_nodes(max_level));
    nodes.push(0.0);

    if max_level >= 1 {
        nodes.push(-1.0);
        nodes.push(1.0);
    }

    for level in 2..=max_level {
        let n = (1usize << level) as f64;
        nodes.extend(
            (1..(1usize << level))
                .step_by(2)
                .map(|j| -(PI * j as f64 / n).cos()),
        );
    }

    nodes
}
