use std::ops::Range;

use crate::aabb::Aabb;

/// The [`BvhNode`] enum that describes a node in a [`Bvh`].
/// It's either a leaf node and references a run of triangles (by holding its range)
/// or a regular node that has two child nodes.
/// Both variants store the tight [`Aabb`] of everything below them.
///
/// [`Bvh`]: crate::Bvh
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BvhNode {
    /// Leaf node.
    Leaf {
        /// The union of the contained triangles' [`Aabb`]s.
        aabb: Aabb,

        /// Index of the first triangle in the [`Bvh`](crate::Bvh) storage.
        start: usize,

        /// Number of consecutive triangles, at most [`LEAF_SIZE`](crate::bvh::LEAF_SIZE).
        count: usize,
    },
    /// Inner node.
    Node {
        /// The union of both children's [`Aabb`]s.
        aabb: Aabb,

        /// Index of the left subtree's root node.
        child_l_index: usize,

        /// Index of the right subtree's root node.
        child_r_index: usize,
    },
}

impl BvhNode {
    /// Returns the bounds of this node.
    #[inline]
    pub fn aabb(&self) -> &Aabb {
        match self {
            BvhNode::Leaf { aabb, .. } | BvhNode::Node { aabb, .. } => aabb,
        }
    }

    /// Returns true for leaf nodes.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, BvhNode::Leaf { .. })
    }

    /// Returns the indices of the left and right child, or `None` for leaves.
    pub fn children(&self) -> Option<(usize, usize)> {
        match *self {
            BvhNode::Node {
                child_l_index,
                child_r_index,
                ..
            } => Some((child_l_index, child_r_index)),
            BvhNode::Leaf { .. } => None,
        }
    }

    /// Returns the range of triangles held by a leaf, or `None` for inner nodes.
    pub fn triangle_range(&self) -> Option<Range<usize>> {
        match *self {
            BvhNode::Leaf { start, count, .. } => Some(start..start + count),
            BvhNode::Node { .. } => None,
        }
    }

    /// The build function sometimes needs to add nodes while their data is not available yet.
    /// A dummy created by this function serves the purpose of being changed later on.
    pub(crate) fn create_dummy() -> BvhNode {
        BvhNode::Leaf {
            aabb: Aabb::empty(),
            start: 0,
            count: 0,
        }
    }
}
