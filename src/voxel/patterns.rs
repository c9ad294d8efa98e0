//! Procedural fills used to populate test and demo scenes.

use crate::voxel::{VoxelGrid, VoxelId};
use crate::Real;

impl VoxelGrid {
    /// Sets every cell whose corner lies strictly within `radius` of the grid center to `id`
    /// and empties the others.
    ///
    /// # Examples
    /// ```
    /// use voxely::VoxelGrid;
    ///
    /// let mut grid = VoxelGrid::new(16).unwrap();
    /// grid.fill_sphere(4.0, 1);
    /// assert_eq!(grid.get(8, 8, 8), 1);
    /// assert_eq!(grid.get(0, 0, 0), 0);
    /// ```
    pub fn fill_sphere(&mut self, radius: Real, id: VoxelId) {
        let half = self.size as Real * 0.5;
        let r2 = radius * radius;
        for z in 0..self.size {
            for y in 0..self.size {
                for x in 0..self.size {
                    let dx = x as Real - half;
                    let dy = y as Real - half;
                    let dz = z as Real - half;
                    let inside = dx * dx + dy * dy + dz * dz < r2;
                    self.set(x, y, z, if inside { id } else { 0 });
                }
            }
        }
    }

    /// Sets the cube of cells within `half_extent` of `center` (inclusive) to `id`,
    /// clipped against the grid.
    pub fn fill_cube(&mut self, center: [usize; 3], half_extent: usize, id: VoxelId) {
        let size = self.size;
        let lo = |c: usize| c.saturating_sub(half_extent);
        let hi = |c: usize| (c + half_extent + 1).min(size);
        for z in lo(center[2])..hi(center[2]) {
            for y in lo(center[1])..hi(center[1]) {
                for x in lo(center[0])..hi(center[0]) {
                    self.set(x, y, z, id);
                }
            }
        }
    }

    /// Fills the grid with a porous, sponge-like structure from smoothed value noise.
    ///
    /// Cells where the noise sampled at `position / size * scale` exceeds `threshold`
    /// are set to `id`, all others are emptied. The result only depends on the arguments.
    pub fn fill_sponge(&mut self, scale: Real, threshold: Real, id: VoxelId) {
        let size = self.size as Real;
        for z in 0..self.size {
            for y in 0..self.size {
                for x in 0..self.size {
                    let n = value_noise(
                        x as Real / size * scale,
                        y as Real / size * scale,
                        z as Real / size * scale,
                    );
                    self.set(x, y, z, if n > threshold { id } else { 0 });
                }
            }
        }
    }
}

fn smoothstep(x: Real) -> Real {
    let x = x.clamp(0.0, 1.0);
    x * x * (3.0 - 2.0 * x)
}

fn mix(a: Real, b: Real, t: Real) -> Real {
    a + t * (b - a)
}

/// Pseudo random value in `[0, 1)` for a lattice point.
fn hash3(x: i32, y: i32, z: i32) -> Real {
    let d = x as Real * 12.9898 + y as Real * 78.233 + z as Real * 45.164;
    let v = d.sin() * 43758.547;
    v - v.floor()
}

/// Trilinear interpolation of lattice hashes with smoothstep weights.
fn value_noise(x: Real, y: Real, z: Real) -> Real {
    let (ix, iy, iz) = (x.floor() as i32, y.floor() as i32, z.floor() as i32);
    let u = smoothstep(x - ix as Real);
    let v = smoothstep(y - iy as Real);
    let w = smoothstep(z - iz as Real);

    let corner = |dx: i32, dy: i32, dz: i32| hash3(ix + dx, iy + dy, iz + dz);
    let x00 = mix(corner(0, 0, 0), corner(1, 0, 0), u);
    let x10 = mix(corner(0, 1, 0), corner(1, 1, 0), u);
    let x01 = mix(corner(0, 0, 1), corner(1, 0, 1), u);
    let x11 = mix(corner(0, 1, 1), corner(1, 1, 1), u);
    mix(mix(x00, x10, v), mix(x01, x11, v), w)
}
