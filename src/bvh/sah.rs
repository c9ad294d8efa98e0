//! Split selection by the surface area heuristic.

use crate::aabb::{Aabb, Bounded};
use crate::axis::Axis;
use crate::shapes::triangle::Triangle;
use crate::Real;

/// Maximum number of candidate split positions evaluated per node.
pub const SAH_CANDIDATES: usize = 16;

/// Cost of splitting into two children with the given bounds and triangle counts.
///
/// `area(left)·|left| + area(right)·|right|`. Only used to compare splits of the same node.
#[inline]
pub fn split_cost(left: &Aabb, left_count: usize, right: &Aabb, right_count: usize) -> Real {
    left.surface_area() * left_count as Real + right.surface_area() * right_count as Real
}

/// Sorts `items` by the centroid coordinate on `axis`.
///
/// Floats are compared by their total order, so the result only depends on the input order.
pub fn sort_by_centroid<M>(items: &mut [(Triangle, M)], axis: Axis) {
    items.sort_by(|(a, _), (b, _)| axis.of(&a.centroid()).total_cmp(&axis.of(&b.centroid())));
}

/// Sorts `items` along the widest axis of `aabb` and returns the split position.
///
/// Candidates are `n·i/k` for `i` in `1..k` with `k = min(n, SAH_CANDIDATES)`.
/// The cheapest candidate wins; ties keep the earlier one. Without any finite
/// cost the median `n/2` is used. The returned position is always in `1..n`
/// for `n >= 2`.
pub fn partition<M>(items: &mut [(Triangle, M)], aabb: &Aabb) -> usize {
    let n = items.len();
    sort_by_centroid(items, aabb.largest_axis());

    // prefix[i] bounds items[..=i], suffix[i] bounds items[i..]
    let mut prefix = Vec::with_capacity(n);
    let mut running = Aabb::empty();
    for (triangle, _) in items.iter() {
        running.join_mut(&triangle.aabb());
        prefix.push(running);
    }
    let mut suffix = vec![Aabb::empty(); n];
    let mut running = Aabb::empty();
    for (i, (triangle, _)) in items.iter().enumerate().rev() {
        running.join_mut(&triangle.aabb());
        suffix[i] = running;
    }

    let k = n.min(SAH_CANDIDATES);
    let mut best_cost = Real::MAX;
    let mut best_split = None;
    for i in 1..k {
        let split = n * i / k;
        if split == 0 || split >= n {
            continue;
        }
        let cost = split_cost(&prefix[split - 1], split, &suffix[split], n - split);
        if cost < best_cost {
            best_cost = cost;
            best_split = Some(split);
        }
    }

    best_split.unwrap_or(n / 2)
}
