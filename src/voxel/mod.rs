//! A dense, owned voxel grid. It is the input of the [`S64Tree`](crate::S64Tree)
//! builder and can be meshed into triangles for the [`Bvh`](crate::Bvh).

mod mesh;
mod patterns;

use crate::error::{Error, Result};

/// Voxel contents. `0` is empty, anything else is an occupied voxel of that kind.
pub type VoxelId = u8;

/// A cubic grid of `size³` voxels.
///
/// Cells are stored at `(z·size + y)·size + x`. Reads outside the grid return `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoxelGrid {
    size: usize,
    cells: Vec<VoxelId>,
}

/// Number of cells of a `size³` grid.
fn cell_count(size: usize) -> Result<usize> {
    if size == 0 {
        return Err(Error::ZeroGridSize);
    }
    size.checked_mul(size)
        .and_then(|n| n.checked_mul(size))
        .ok_or(Error::GridTooLarge(size))
}

impl VoxelGrid {
    /// Creates an empty grid with `size` cells per axis.
    ///
    /// # Examples
    /// ```
    /// use voxely::VoxelGrid;
    ///
    /// let grid = VoxelGrid::new(16).unwrap();
    /// assert_eq!(grid.size(), 16);
    /// assert!(grid.is_empty());
    /// assert!(VoxelGrid::new(0).is_err());
    /// ```
    pub fn new(size: usize) -> Result<VoxelGrid> {
        let count = cell_count(size)?;
        Ok(VoxelGrid {
            size,
            cells: vec![0; count],
        })
    }

    /// Wraps an existing cell buffer laid out as `(z·size + y)·size + x`.
    pub fn from_vec(size: usize, cells: Vec<VoxelId>) -> Result<VoxelGrid> {
        let expected = cell_count(size)?;
        if cells.len() != expected {
            return Err(Error::VoxelCountMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(VoxelGrid { size, cells })
    }

    /// Number of cells per axis.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// The raw cell buffer.
    pub fn cells(&self) -> &[VoxelId] {
        &self.cells
    }

    #[inline]
    fn index(&self, x: usize, y: usize, z: usize) -> Option<usize> {
        if x < self.size && y < self.size && z < self.size {
            Some((z * self.size + y) * self.size + x)
        } else {
            None
        }
    }

    /// Returns the voxel at `(x, y, z)`, or `0` outside the grid.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> VoxelId {
        self.index(x, y, z).map_or(0, |i| self.cells[i])
    }

    /// Returns the voxel at `(x, y, z)` displaced by `offset`, or `0` outside the grid.
    #[inline]
    pub(crate) fn get_offset(&self, x: usize, y: usize, z: usize, offset: [isize; 3]) -> VoxelId {
        match (
            x.checked_add_signed(offset[0]),
            y.checked_add_signed(offset[1]),
            z.checked_add_signed(offset[2]),
        ) {
            (Some(x), Some(y), Some(z)) => self.get(x, y, z),
            _ => 0,
        }
    }

    /// Stores `id` at `(x, y, z)`. Returns false, and changes nothing, outside the grid.
    pub fn set(&mut self, x: usize, y: usize, z: usize, id: VoxelId) -> bool {
        match self.index(x, y, z) {
            Some(i) => {
                self.cells[i] = id;
                true
            }
            None => false,
        }
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// Returns true if no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&id| id == 0)
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&id| id != 0).count()
    }

    /// Returns true if any cell of the `extent³` block starting at `(x0, y0, z0)` is occupied.
    /// The part of the block outside the grid counts as empty.
    pub fn block_any(&self, x0: usize, y0: usize, z0: usize, extent: usize) -> bool {
        if x0 >= self.size || y0 >= self.size || z0 >= self.size {
            return false;
        }
        let x1 = (x0 + extent).min(self.size);
        let y1 = (y0 + extent).min(self.size);
        let z1 = (z0 + extent).min(self.size);
        for z in z0..z1 {
            for y in y0..y1 {
                let row = (z * self.size + y) * self.size;
                if self.cells[row + x0..row + x1].iter().any(|&id| id != 0) {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::voxel::VoxelGrid;

    #[test]
    fn test_from_vec_checks_length() {
        assert_eq!(
            VoxelGrid::from_vec(2, vec![0; 7]),
            Err(Error::VoxelCountMismatch {
                expected: 8,
                actual: 7
            })
        );
        assert_eq!(VoxelGrid::from_vec(0, Vec::new()), Err(Error::ZeroGridSize));
        assert!(VoxelGrid::from_vec(2, vec![0; 8]).is_ok());
    }

    #[test]
    fn test_oversized_grid_is_rejected() {
        let size = 1 << 22;
        assert_eq!(VoxelGrid::from_vec(size, Vec::new()), Err(Error::GridTooLarge(size)));
        assert_eq!(VoxelGrid::new(usize::MAX), Err(Error::GridTooLarge(usize::MAX)));
    }

    #[test]
    fn test_layout_is_z_major() {
        let mut cells = vec![0; 27];
        cells[(2 * 3 + 1) * 3] = 5;
        let grid = VoxelGrid::from_vec(3, cells).unwrap();
        assert_eq!(grid.get(0, 1, 2), 5);
        assert_eq!(grid.get(2, 1, 0), 0);
    }

    #[test]
    fn test_get_set_outside_grid() {
        let mut grid = VoxelGrid::new(4).unwrap();
        assert!(!grid.set(4, 0, 0, 1));
        assert_eq!(grid.get(4, 0, 0), 0);
        assert_eq!(grid.get_offset(0, 0, 0, [-1, 0, 0]), 0);
        assert!(grid.is_empty());

        assert!(grid.set(3, 3, 3, 7));
        assert_eq!(grid.get(3, 3, 3), 7);
        assert_eq!(grid.get_offset(2, 3, 3, [1, 0, 0]), 7);
        assert_eq!(grid.occupied_count(), 1);

        grid.clear();
        assert!(grid.is_empty());
    }

    #[test]
    fn test_block_any() {
        let mut grid = VoxelGrid::new(8).unwrap();
        grid.set(5, 6, 7, 1);
        assert!(grid.block_any(4, 4, 4, 4));
        assert!(grid.block_any(5, 6, 7, 1));
        assert!(!grid.block_any(0, 0, 0, 4));
        assert!(!grid.block_any(4, 4, 0, 4));
        // Clipped against the grid.
        assert!(grid.block_any(4, 4, 4, 100));
    }
}
