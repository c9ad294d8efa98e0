//! Face meshing of a [`VoxelGrid`], so the same scene can be traced through a [`Bvh`](crate::Bvh).

use crate::aabb::Aabb;
use crate::shapes::triangle::Triangle;
use crate::voxel::{VoxelGrid, VoxelId};
use crate::{Point3, Real, Vector3};

/// Neighbour offsets, one per face: -X, +X, -Y, +Y, -Z, +Z.
const FACE_OFFSETS: [[isize; 3]; 6] = [
    [-1, 0, 0],
    [1, 0, 0],
    [0, -1, 0],
    [0, 1, 0],
    [0, 0, -1],
    [0, 0, 1],
];

/// Corner indices of the two triangles of each face, wound outwards.
/// Corner `i` sits at `(i & 1, (i >> 1) & 1, (i >> 2) & 1)` within the voxel.
const FACE_CORNERS: [[usize; 6]; 6] = [
    [0, 4, 6, 0, 6, 2],
    [1, 3, 7, 1, 7, 5],
    [0, 1, 5, 0, 5, 4],
    [2, 6, 7, 2, 7, 3],
    [0, 2, 3, 0, 3, 1],
    [4, 5, 7, 4, 7, 6],
];

impl VoxelGrid {
    /// Number of voxel faces that border an empty cell or the outside of the grid.
    pub fn exposed_face_count(&self) -> usize {
        let mut faces = 0;
        for z in 0..self.size {
            for y in 0..self.size {
                for x in 0..self.size {
                    if self.get(x, y, z) == 0 {
                        continue;
                    }
                    faces += FACE_OFFSETS
                        .iter()
                        .filter(|&&offset| self.get_offset(x, y, z, offset) == 0)
                        .count();
                }
            }
        }
        faces
    }

    /// Meshes the grid into triangles, two per exposed face, placed so that the grid
    /// spans `bounds`. Each triangle carries `material_of(id)` of its voxel.
    ///
    /// Triangles are wound so that [`Triangle::normal`] points out of the voxel.
    ///
    /// # Examples
    /// ```
    /// use voxely::{Aabb, Bvh, Point3, VoxelGrid};
    ///
    /// let mut grid = VoxelGrid::new(4).unwrap();
    /// grid.set(0, 0, 0, 3);
    /// let bounds = Aabb::with_bounds(Point3::new(0.0, 0.0, 0.0), Point3::new(4.0, 4.0, 4.0));
    /// let triangles = grid.to_triangles(&bounds, |id| id as u32 * 10);
    /// assert_eq!(triangles.len(), 12);
    /// assert!(triangles.iter().all(|(_, material)| *material == 30));
    ///
    /// let bvh = Bvh::build(triangles);
    /// assert_eq!(bvh.len(), 12);
    /// ```
    pub fn to_triangles<M, F>(&self, bounds: &Aabb, mut material_of: F) -> Vec<(Triangle, M)>
    where
        F: FnMut(VoxelId) -> M,
        M: Copy,
    {
        let voxel_size = bounds.size() / self.size as Real;
        let mut triangles = Vec::with_capacity(2 * self.exposed_face_count());

        for z in 0..self.size {
            for y in 0..self.size {
                for x in 0..self.size {
                    let id = self.get(x, y, z);
                    if id == 0 {
                        continue;
                    }
                    let material = material_of(id);

                    let corner = |i: usize| -> Point3 {
                        let cell = Vector3::new(
                            (x + (i & 1)) as Real,
                            (y + ((i >> 1) & 1)) as Real,
                            (z + ((i >> 2) & 1)) as Real,
                        );
                        bounds.min + cell.component_mul(&voxel_size)
                    };

                    for (offset, corners) in FACE_OFFSETS.iter().zip(FACE_CORNERS.iter()) {
                        if self.get_offset(x, y, z, *offset) != 0 {
                            continue;
                        }
                        for tri in corners.chunks_exact(3) {
                            triangles.push((
                                Triangle::new(corner(tri[0]), corner(tri[1]), corner(tri[2])),
                                material,
                            ));
                        }
                    }
                }
            }
        }

        triangles
    }
}
