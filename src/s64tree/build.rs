//! This module defines [`S64Tree`] and the functions for building and inspecting it.

use log::{debug, trace};

use crate::aabb::Aabb;
use crate::error::{Error, Result};
use crate::s64tree::S64Node;
use crate::voxel::{VoxelGrid, VoxelId};

/// Edge length, in voxels, of the block covered by a leaf.
pub const BASE_BLOCK: usize = 4;

/// A sparse 64-ary voxel tree.
///
/// Every node splits its cell into `4×4×4` sub-cells and only stores the occupied
/// ones, so empty space costs no storage. Leaves cover `4×4×4` voxels and keep the
/// ids of their occupied voxels in a shared byte pool.
///
/// The root is at index `0`. A tree over an empty grid is a single leaf with an empty mask.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct S64Tree {
    pub(crate) nodes: Vec<S64Node>,
    pub(crate) leaf_data: Vec<VoxelId>,
    pub(crate) bounds: Aabb,
    pub(crate) grid_size: usize,
}

/// Returns true for `4, 16, 64, ...`.
fn is_power_of_four(n: usize) -> bool {
    n >= BASE_BLOCK && n.is_power_of_two() && n.trailing_zeros() % 2 == 0
}

/// Mask with only the bit of sub-cell `(x, y, z)` set.
fn bit(x: usize, y: usize, z: usize) -> u64 {
    1u64 << S64Node::bit_index(x as u32, y as u32, z as u32)
}

fn to_ptr(n: usize) -> Result<u32> {
    u32::try_from(n).map_err(|_| Error::TreeTooLarge(u32::MAX as usize))
}

impl S64Tree {
    /// Builds a tree over `grid`, which is mapped onto the world-space box `bounds`.
    ///
    /// The grid size must be a power of four and `bounds` must be finite with a
    /// positive extent on every axis.
    ///
    /// # Examples
    /// ```
    /// use voxely::{Aabb, Point3, S64Tree, VoxelGrid};
    ///
    /// let mut grid = VoxelGrid::new(16).unwrap();
    /// grid.set(3, 9, 15, 2);
    /// let bounds = Aabb::with_bounds(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
    /// let tree = S64Tree::build(&grid, bounds).unwrap();
    ///
    /// // Root plus one leaf.
    /// assert_eq!(tree.nodes().len(), 2);
    /// assert_eq!(tree.leaf_data(), &[2]);
    /// assert_eq!(tree.voxel_at(3, 9, 15), 2);
    ///
    /// assert!(S64Tree::build(&VoxelGrid::new(8).unwrap(), bounds).is_err());
    /// ```
    pub fn build(grid: &VoxelGrid, bounds: Aabb) -> Result<S64Tree> {
        let mut tree = S64Tree {
            nodes: Vec::new(),
            leaf_data: Vec::new(),
            bounds,
            grid_size: 0,
        };
        tree.rebuild(grid, bounds)?;
        Ok(tree)
    }

    /// Replaces the contents of this tree, reusing its allocations.
    ///
    /// On error the tree is left cleared.
    pub fn rebuild(&mut self, grid: &VoxelGrid, bounds: Aabb) -> Result<()> {
        trace!(
            "rebuilding s64 tree, previous {} nodes, {} leaf bytes",
            self.nodes.len(),
            self.leaf_data.len()
        );
        self.clear();

        let size = grid.size();
        if !is_power_of_four(size) {
            return Err(Error::GridSizeNotPowerOfFour(size));
        }
        let extent = bounds.size();
        if !bounds.is_valid() || extent.iter().any(|&e| e <= 0.0) {
            return Err(Error::InvalidBounds);
        }

        self.bounds = bounds;
        self.grid_size = size;
        self.nodes.push(S64Node::EMPTY_LEAF);

        let built = Builder {
            grid,
            nodes: &mut self.nodes,
            leaf_data: &mut self.leaf_data,
        }
        .build_node(0, [0, 0, 0], size);

        match built {
            Ok(true) => {}
            Ok(false) => self.nodes[0] = S64Node::EMPTY_LEAF,
            Err(err) => {
                self.clear();
                return Err(err);
            }
        }

        debug!(
            "built s64 tree over {}³ grid: {} nodes, {} leaf bytes",
            size,
            self.nodes.len(),
            self.leaf_data.len()
        );
        Ok(())
    }

    /// Releases all nodes and leaf data. Afterwards the tree has no root, a grid size
    /// of `0`, and every query misses.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.leaf_data.clear();
        self.grid_size = 0;
    }

    /// The node pool. The root is at index `0`.
    pub fn nodes(&self) -> &[S64Node] {
        &self.nodes
    }

    /// Voxel ids of all leaves, packed.
    pub fn leaf_data(&self) -> &[VoxelId] {
        &self.leaf_data
    }

    /// The world-space box covered by the grid.
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Number of voxels per axis, `0` after [`S64Tree::clear`].
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Looks up voxel `(x, y, z)` through the tree. Returns `0` for empty voxels and
    /// for coordinates outside the grid.
    pub fn voxel_at(&self, x: usize, y: usize, z: usize) -> VoxelId {
        let size = self.grid_size;
        if x >= size || y >= size || z >= size {
            return 0;
        }
        let Some(mut node) = self.nodes.first() else {
            return 0;
        };

        let mut cell = size;
        loop {
            let sub = cell / 4;
            let bit = S64Node::bit_index(
                ((x % cell) / sub) as u32,
                ((y % cell) / sub) as u32,
                ((z % cell) / sub) as u32,
            );
            let Some(entry) = node.entry(bit) else {
                return 0;
            };
            if node.is_leaf {
                return self.leaf_data.get(entry).copied().unwrap_or(0);
            }
            match self.nodes.get(entry) {
                Some(child) => node = child,
                None => return 0,
            }
            cell = sub;
        }
    }
}

/// State of a single build pass.
struct Builder<'a> {
    grid: &'a VoxelGrid,
    nodes: &'a mut Vec<S64Node>,
    leaf_data: &'a mut Vec<VoxelId>,
}

impl Builder<'_> {
    /// Fills in node `node_index` for the `size³` block at `origin`.
    /// Returns whether the block holds any voxel.
    fn build_node(&mut self, node_index: usize, origin: [usize; 3], size: usize) -> Result<bool> {
        let [x0, y0, z0] = origin;

        if size == BASE_BLOCK {
            let child_ptr = to_ptr(self.leaf_data.len())?;
            let mut child_mask = 0u64;
            // Ascending bit order, so ids are packed in the order they are addressed.
            for y in 0..4 {
                for z in 0..4 {
                    for x in 0..4 {
                        let id = self.grid.get(x0 + x, y0 + y, z0 + z);
                        if id != 0 {
                            child_mask |= bit(x, y, z);
                            self.leaf_data.push(id);
                        }
                    }
                }
            }
            self.nodes[node_index] = S64Node {
                is_leaf: true,
                child_ptr,
                child_mask,
            };
            return Ok(child_mask != 0);
        }

        let child_size = size / 4;
        let child_origin = |x: usize, y: usize, z: usize| {
            [x0 + x * child_size, y0 + y * child_size, z0 + z * child_size]
        };

        let mut child_mask = 0u64;
        for y in 0..4 {
            for z in 0..4 {
                for x in 0..4 {
                    let [cx, cy, cz] = child_origin(x, y, z);
                    if self.grid.block_any(cx, cy, cz, child_size) {
                        child_mask |= bit(x, y, z);
                    }
                }
            }
        }

        if child_mask == 0 {
            self.nodes[node_index] = S64Node::default();
            return Ok(false);
        }

        let first_child = self.nodes.len();
        let child_ptr = to_ptr(first_child)?;
        self.nodes
            .resize(first_child + child_mask.count_ones() as usize, S64Node::default());
        self.nodes[node_index] = S64Node {
            is_leaf: false,
            child_ptr,
            child_mask,
        };

        let mut slot = first_child;
        for y in 0..4 {
            for z in 0..4 {
                for x in 0..4 {
                    if child_mask & bit(x, y, z) == 0 {
                        continue;
                    }
                    self.build_node(slot, child_origin(x, y, z), child_size)?;
                    slot += 1;
                }
            }
        }

        Ok(true)
    }
}
