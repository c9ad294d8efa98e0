use crate::utils::popcount_before;

/// A node of an [`S64Tree`](crate::S64Tree).
///
/// Each node covers a `4×4×4` arrangement of sub-cells. Bit `x + z·4 + y·16` of
/// `child_mask` is set iff sub-cell `(x, y, z)` holds anything. The entries of the
/// set bits are stored consecutively from `child_ptr` in ascending bit order: child
/// nodes in the node pool for internal nodes, voxel ids in the leaf data for leaves.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct S64Node {
    /// Whether `child_ptr` points into the leaf data.
    pub is_leaf: bool,

    /// Index of the first entry.
    pub child_ptr: u32,

    /// Occupancy of the 64 sub-cells.
    pub child_mask: u64,
}

impl S64Node {
    /// Leaf with no occupied voxel. Only the root of an empty tree looks like this.
    pub const EMPTY_LEAF: S64Node = S64Node {
        is_leaf: true,
        child_ptr: 0,
        child_mask: 0,
    };

    /// Bit index of sub-cell `(x, y, z)`, each coordinate in `0..4`.
    ///
    /// # Examples
    /// ```
    /// use voxely::S64Node;
    ///
    /// assert_eq!(S64Node::bit_index(1, 0, 0), 1);
    /// assert_eq!(S64Node::bit_index(0, 0, 1), 4);
    /// assert_eq!(S64Node::bit_index(0, 1, 0), 16);
    /// assert_eq!(S64Node::bit_index(3, 3, 3), 63);
    /// ```
    #[inline]
    pub const fn bit_index(x: u32, y: u32, z: u32) -> u32 {
        x + z * 4 + y * 16
    }

    /// Returns true if sub-cell `bit` is occupied.
    #[inline]
    pub fn has(&self, bit: u32) -> bool {
        self.child_mask & (1u64 << bit) != 0
    }

    /// Number of occupied sub-cells.
    #[inline]
    pub fn count(&self) -> u32 {
        self.child_mask.count_ones()
    }

    /// Position of the entry for sub-cell `bit`, or `None` if it is empty.
    #[inline]
    pub fn entry(&self, bit: u32) -> Option<usize> {
        if self.has(bit) {
            Some(self.child_ptr as usize + popcount_before(self.child_mask, bit) as usize)
        } else {
            None
        }
    }
}
