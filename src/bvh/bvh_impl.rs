//! This module defines [`Bvh`] and the functions for building and inspecting it.

use std::iter::repeat;

use log::{debug, trace};

use crate::aabb::{Aabb, Bounded};
use crate::bvh::sah;
use crate::bvh::BvhNode;
use crate::shapes::triangle::Triangle;
use crate::{Point3, Real, EPSILON};

/// Maximum number of triangles stored in a leaf.
pub const LEAF_SIZE: usize = 4;

/// The [`Bvh`] data structure. Contains the list of [`BvhNode`]s and the triangles
/// with their materials, reordered so that every leaf owns a contiguous run.
///
/// The root is at index `0`. An empty [`Bvh`] has no nodes and never reports a hit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bvh<M> {
    /// The list of nodes of the [`Bvh`].
    pub(crate) nodes: Vec<BvhNode>,

    /// Triangles in leaf order.
    pub(crate) triangles: Vec<Triangle>,

    /// `materials[i]` belongs to `triangles[i]`.
    pub(crate) materials: Vec<M>,
}

impl<M: Copy> Bvh<M> {
    /// Creates a new [`Bvh`] from `(triangle, material)` pairs.
    ///
    /// # Examples
    /// ```
    /// use voxely::{Bvh, Point3, Triangle};
    ///
    /// let triangles = (0..10).map(|i| {
    ///     let x = i as f32;
    ///     let t = Triangle::new(
    ///         Point3::new(x, 0.0, 0.0),
    ///         Point3::new(x + 1.0, 0.0, 0.0),
    ///         Point3::new(x, 1.0, 0.0),
    ///     );
    ///     (t, i)
    /// });
    /// let bvh = Bvh::build(triangles);
    /// assert_eq!(bvh.len(), 10);
    /// assert!(bvh.leaf_count() >= 3);
    /// ```
    pub fn build<I>(items: I) -> Bvh<M>
    where
        I: IntoIterator<Item = (Triangle, M)>,
    {
        let mut bvh = Bvh {
            nodes: Vec::new(),
            triangles: Vec::new(),
            materials: Vec::new(),
        };
        bvh.build_into(items.into_iter().collect());
        bvh
    }

    /// Replaces the contents of this [`Bvh`], reusing its allocations.
    pub fn rebuild<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = (Triangle, M)>,
    {
        trace!(
            "rebuilding bvh, previous {} nodes over {} triangles",
            self.nodes.len(),
            self.triangles.len()
        );
        self.build_into(items.into_iter().collect());
    }

    fn build_into(&mut self, mut items: Vec<(Triangle, M)>) {
        self.nodes.clear();
        self.triangles.clear();
        self.materials.clear();

        if items.is_empty() {
            debug!("built empty bvh");
            return;
        }

        self.nodes.reserve(2 * items.len().div_ceil(LEAF_SIZE));

        let mut max_depth = 0;
        build_node(&mut items, 0, 0, &mut self.nodes, &mut max_depth);

        self.triangles.reserve(items.len());
        self.materials.reserve(items.len());
        for (triangle, material) in items {
            self.triangles.push(triangle);
            self.materials.push(material);
        }

        debug!(
            "built bvh over {} triangles: {} nodes, {} leaves, depth {}",
            self.triangles.len(),
            self.nodes.len(),
            self.leaf_count(),
            max_depth
        );
    }
}

/// Builds the subtree over `items` and returns the index of its root node.
///
/// `offset` is the position of `items[0]` in the final triangle storage.
fn build_node<M>(
    items: &mut [(Triangle, M)],
    offset: usize,
    depth: u32,
    nodes: &mut Vec<BvhNode>,
    max_depth: &mut u32,
) -> usize {
    *max_depth = (*max_depth).max(depth);

    let node_index = nodes.len();
    let aabb = items
        .iter()
        .fold(Aabb::empty(), |aabb, (triangle, _)| aabb.join(&triangle.aabb()));

    // If there are only a few elements left, don't split anymore
    if items.len() <= LEAF_SIZE {
        nodes.push(BvhNode::Leaf {
            aabb,
            start: offset,
            count: items.len(),
        });
        return node_index;
    }

    // From here on we handle the recursive case. This dummy is required, because the
    // children are appended after it and it is only complete once they are.
    nodes.push(BvhNode::create_dummy());

    let split = sah::partition(items, &aabb);
    let (left, right) = items.split_at_mut(split);
    let child_l_index = build_node(left, offset, depth + 1, nodes, max_depth);
    let child_r_index = build_node(right, offset + split, depth + 1, nodes, max_depth);

    nodes[node_index] = BvhNode::Node {
        aabb,
        child_l_index,
        child_r_index,
    };
    node_index
}

impl<M> Bvh<M> {
    /// The list of nodes. The root is at index `0`.
    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    /// Triangles in leaf order.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Materials, parallel to [`Bvh::triangles`].
    pub fn materials(&self) -> &[M] {
        &self.materials
    }

    /// Number of stored triangles.
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if the [`Bvh`] holds no triangles.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of leaf nodes.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }

    /// Length of the longest root to leaf path. A single leaf has depth `0`,
    /// an empty [`Bvh`] reports `0` as well.
    pub fn depth(&self) -> u32 {
        if self.nodes.is_empty() {
            return 0;
        }
        let mut max_depth = 0;
        let mut stack = vec![(0usize, 0u32)];
        while let Some((node_index, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some((l, r)) = self.nodes[node_index].children() {
                stack.push((l, depth + 1));
                stack.push((r, depth + 1));
            }
        }
        max_depth
    }

    /// Bounds of the whole scene, empty if there are no triangles.
    pub fn root_aabb(&self) -> Aabb {
        self.nodes
            .first()
            .map(|node| *node.aabb())
            .unwrap_or_else(Aabb::empty)
    }

    /// Prints the [`Bvh`] in a tree-like visualization.
    pub fn pretty_print(&self) {
        if !self.nodes.is_empty() {
            self.print_node(0, 0);
        }
    }

    fn print_node(&self, node_index: usize, depth: usize) {
        let padding: String = repeat(" ").take(depth).collect();
        match self.nodes[node_index] {
            BvhNode::Node {
                aabb,
                child_l_index,
                child_r_index,
            } => {
                println!("{}node={} {}", padding, node_index, aabb);
                self.print_node(child_l_index, depth + 1);
                self.print_node(child_r_index, depth + 1);
            }
            BvhNode::Leaf { aabb, start, count } => {
                println!(
                    "{}leaf={} triangles {}..{} {}",
                    padding,
                    node_index,
                    start,
                    start + count,
                    aabb
                );
            }
        }
    }

    /// Asserts that every node lies inside its parent, that leaves hold between one and
    /// [`LEAF_SIZE`] triangles, and that every node and every triangle is reached exactly once.
    pub fn assert_consistent(&self) {
        if self.nodes.is_empty() {
            assert!(self.triangles.is_empty(), "Triangles without nodes");
            return;
        }
        assert_eq!(self.triangles.len(), self.materials.len());

        // The root node of the bvh is not bounded by anything.
        let space = Aabb {
            min: Point3::new(Real::NEG_INFINITY, Real::NEG_INFINITY, Real::NEG_INFINITY),
            max: Point3::new(Real::INFINITY, Real::INFINITY, Real::INFINITY),
        };

        let mut node_seen = vec![false; self.nodes.len()];
        let mut triangle_seen = vec![false; self.triangles.len()];
        let mut stack = vec![(0usize, space)];
        while let Some((node_index, outer)) = stack.pop() {
            assert!(!node_seen[node_index], "Node {} reached twice", node_index);
            node_seen[node_index] = true;

            let node = &self.nodes[node_index];
            assert!(
                outer.approx_contains_aabb_eps(node.aabb(), EPSILON),
                "Node {} lies outside the expected bounds.\n\tBounds: {}\n\tNode: {}",
                node_index,
                outer,
                node.aabb()
            );
            match *node {
                BvhNode::Node {
                    aabb,
                    child_l_index,
                    child_r_index,
                } => {
                    stack.push((child_l_index, aabb));
                    stack.push((child_r_index, aabb));
                }
                BvhNode::Leaf { aabb, start, count } => {
                    assert!(
                        (1..=LEAF_SIZE).contains(&count),
                        "Leaf {} holds {} triangles",
                        node_index,
                        count
                    );
                    for i in start..start + count {
                        assert!(!triangle_seen[i], "Triangle {} in two leaves", i);
                        triangle_seen[i] = true;
                        assert!(aabb.approx_contains_aabb_eps(&self.triangles[i].aabb(), EPSILON));
                    }
                }
            }
        }

        assert!(node_seen.iter().all(|&seen| seen), "Detached subtree");
        assert!(triangle_seen.iter().all(|&seen| seen), "Triangle not in any leaf");
    }

    /// Check that the [`Aabb`]s in the [`Bvh`] are tight, which means, that parent [`Aabb`]s
    /// are not larger than they should be.
    pub fn assert_tight(&self) {
        for (node_index, node) in self.nodes.iter().enumerate() {
            let joint_aabb = match *node {
                BvhNode::Node {
                    child_l_index,
                    child_r_index,
                    ..
                } => self.nodes[child_l_index]
                    .aabb()
                    .join(self.nodes[child_r_index].aabb()),
                BvhNode::Leaf { start, count, .. } => self.triangles[start..start + count]
                    .iter()
                    .fold(Aabb::empty(), |aabb, triangle| aabb.join(&triangle.aabb())),
            };
            assert!(
                joint_aabb.relative_eq(node.aabb(), EPSILON),
                "{} real_aabb={} stored_aabb={}",
                node_index,
                joint_aabb,
                node.aabb()
            );
        }
    }
}
