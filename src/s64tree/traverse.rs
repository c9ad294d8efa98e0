//! Block-skipping ray march through an [`S64Tree`].

use crate::aabb::Aabb;
use crate::ray::{HitRecord, Ray};
use crate::s64tree::{S64Node, S64Tree};
use crate::voxel::VoxelId;
use crate::{Point3, Real, Vector3, DIRECTION_EPSILON, T_FAR};

/// Result of a query against an [`S64Tree`]; the payload is the voxel id.
pub type VoxelHit = HitRecord<VoxelId>;

/// Upper bound on the number of march steps per ray.
pub const MAX_MARCH_STEPS: usize = 512;

/// World-space distance added to every step, so the march always leaves the current cell.
pub const MARCH_EPSILON: Real = 1e-4;

/// Normal reported for every voxel hit.
const HIT_NORMAL: Vector3 = Vector3::new(0.0, 1.0, 0.0);

/// Index `0..4` of the sub-cell of size `sub` containing `p`, per axis.
#[inline]
fn sub_cell(p: &Point3, cell_min: &Point3, sub: &Vector3) -> [u32; 3] {
    let offset = (p - cell_min).component_div(sub);
    offset
        .map(|o| (o.floor() as i32).clamp(0, 3) as u32)
        .into()
}

/// Distance along `ray` from `p` to the far side of `cell`.
fn exit_distance(ray: &Ray, p: &Point3, cell: &Aabb) -> Real {
    let mut dt = T_FAR;
    for i in 0..3 {
        let d = ray.direction[i];
        let t = if d > DIRECTION_EPSILON {
            (cell.max[i] - p[i]) / d
        } else if d < -DIRECTION_EPSILON {
            (cell.min[i] - p[i]) / d
        } else {
            T_FAR
        };
        dt = dt.min(t);
    }
    dt
}

/// Where a descent from the root ended.
enum Lookup {
    /// The voxel at the looked-up point is occupied.
    Hit(VoxelId),
    /// The looked-up point lies in this empty region.
    Empty(Aabb),
    /// The tree references an entry outside its pools.
    Corrupt,
}

impl S64Tree {
    /// Finds the first occupied voxel along `ray`.
    ///
    /// The ray is marched through the world box, skipping the largest empty cell around
    /// the current point at every step. The reported `t` and `point` are the march
    /// position inside the voxel, the normal is always `(0, 1, 0)`.
    ///
    /// Every step overshoots the cell exit by [`MARCH_EPSILON`] in world space, whatever
    /// the length of `ray.direction`. A ray that only clips a voxel edge or corner by
    /// less than that distance passes it and may report a miss.
    ///
    /// # Examples
    /// ```
    /// use voxely::{Aabb, Point3, Ray, S64Tree, Vector3, VoxelGrid};
    ///
    /// let mut grid = VoxelGrid::new(16).unwrap();
    /// grid.set(8, 8, 8, 5);
    /// let bounds = Aabb::with_bounds(Point3::new(0.0, 0.0, 0.0), Point3::new(16.0, 16.0, 16.0));
    /// let tree = S64Tree::build(&grid, bounds).unwrap();
    ///
    /// let ray = Ray::new(Point3::new(8.5, 8.5, -4.0), Vector3::new(0.0, 0.0, 1.0));
    /// let hit = tree.intersect(&ray);
    /// assert!(hit.hit);
    /// assert_eq!(hit.payload, 5);
    /// assert!(hit.t >= 12.0 && hit.t < 13.0);
    ///
    /// let ray = Ray::new(Point3::new(9.5, 8.5, -4.0), Vector3::new(0.0, 0.0, 1.0));
    /// assert!(!tree.intersect(&ray).hit);
    /// ```
    pub fn intersect(&self, ray: &Ray) -> VoxelHit {
        let mut rec = VoxelHit::miss();
        self.intersect_with(ray, &mut rec);
        rec
    }

    /// Like [`S64Tree::intersect`], but only accepts a hit closer than `rec.t` and
    /// writes it into `rec`. Returns true if `rec` was updated.
    pub fn intersect_with(&self, ray: &Ray, rec: &mut VoxelHit) -> bool {
        if self.nodes.is_empty() {
            return false;
        }
        let Some((t0, t1)) = ray.slab_test(&self.bounds, Real::NEG_INFINITY, Real::INFINITY)
        else {
            return false;
        };
        if t1 < 0.0 {
            return false;
        }
        let length = ray.direction.norm();
        if !(length > 0.0) {
            return false;
        }
        let step_epsilon = MARCH_EPSILON / length;

        let mut t = t0.max(0.0);
        for _ in 0..MAX_MARCH_STEPS {
            if t >= rec.t {
                return false;
            }
            let p = ray.at(t);
            let empty = match self.locate(&p) {
                Lookup::Hit(id) => {
                    rec.hit = true;
                    rec.t = t;
                    rec.point = p;
                    rec.normal = HIT_NORMAL;
                    rec.payload = id;
                    return true;
                }
                Lookup::Empty(cell) => cell,
                Lookup::Corrupt => return false,
            };

            let mut dt = exit_distance(ray, &p, &empty);
            if !(dt > 0.0) {
                dt = step_epsilon;
            }
            t += dt + step_epsilon;
            if t > t1 {
                break;
            }
        }

        false
    }

    /// Descends from the root to the cell containing `p`. Indices are clamped, so
    /// points slightly outside the world box resolve to the nearest border cell.
    fn locate(&self, p: &Point3) -> Lookup {
        let mut node: S64Node = self.nodes[0];
        let mut cell_min = self.bounds.min;
        let mut cell_size = self.bounds.size();

        loop {
            let sub = cell_size / 4.0;
            let [x, y, z] = sub_cell(p, &cell_min, &sub);
            let bit = S64Node::bit_index(x, y, z);
            cell_min += Vector3::new(x as Real, y as Real, z as Real).component_mul(&sub);
            cell_size = sub;

            let Some(entry) = node.entry(bit) else {
                // An empty leaf is the root of an empty tree: skip the whole box.
                if node.is_leaf && node.child_mask == 0 {
                    return Lookup::Empty(self.bounds);
                }
                return Lookup::Empty(Aabb::with_bounds(cell_min, cell_min + cell_size));
            };

            if node.is_leaf {
                return match self.leaf_data.get(entry) {
                    Some(&id) => Lookup::Hit(id),
                    None => Lookup::Corrupt,
                };
            }
            match self.nodes.get(entry) {
                Some(child) => node = *child,
                None => return Lookup::Corrupt,
            }
        }
    }
}
