//! Nearest-hit traversal of a [`Bvh`].

use crate::bvh::{Bvh, BvhNode};
use crate::ray::{HitRecord, Ray};
use crate::EPSILON;

/// Capacity of the traversal stack. Nodes that would overflow it are skipped.
pub const STACK_SIZE: usize = 1024;

/// Counters collected by [`Bvh::intersect_with_stats`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraversalStats {
    /// Nodes popped from the stack, including the ones culled by their box.
    pub nodes_visited: usize,

    /// Ray/triangle tests performed.
    pub triangles_tested: usize,

    /// Children that were not visited because the stack was full.
    pub dropped_nodes: usize,
}

impl<M: Copy> Bvh<M> {
    /// Finds the closest triangle hit by `ray` at a distance of at least [`EPSILON`].
    ///
    /// # Examples
    /// ```
    /// use voxely::{Bvh, Point3, Ray, Triangle, Vector3};
    ///
    /// let floor = Triangle::new(
    ///     Point3::new(-10.0, 0.0, -10.0),
    ///     Point3::new(10.0, 0.0, -10.0),
    ///     Point3::new(0.0, 0.0, 10.0),
    /// );
    /// let bvh = Bvh::build(vec![(floor, 'f')]);
    ///
    /// let ray = Ray::new(Point3::new(0.0, 2.0, 0.0), Vector3::new(0.0, -1.0, 0.0));
    /// let hit = bvh.intersect(&ray);
    /// assert!(hit.hit);
    /// assert_eq!(hit.payload, 'f');
    /// assert!((hit.t - 2.0).abs() < 1e-5);
    /// ```
    pub fn intersect(&self, ray: &Ray) -> HitRecord<M>
    where
        M: Default,
    {
        let mut rec = HitRecord::miss();
        self.intersect_with(ray, &mut rec);
        rec
    }

    /// Like [`Bvh::intersect`], but only accepts hits closer than `rec.t` and writes them
    /// into `rec`. Returns true if `rec` was updated.
    ///
    /// This allows one record to accumulate the closest hit over several structures.
    pub fn intersect_with(&self, ray: &Ray, rec: &mut HitRecord<M>) -> bool {
        let mut stats = TraversalStats::default();
        self.traverse(ray, rec, &mut stats)
    }

    /// Like [`Bvh::intersect`], additionally returning traversal counters.
    pub fn intersect_with_stats(&self, ray: &Ray) -> (HitRecord<M>, TraversalStats)
    where
        M: Default,
    {
        let mut rec = HitRecord::miss();
        let mut stats = TraversalStats::default();
        self.traverse(ray, &mut rec, &mut stats);
        (rec, stats)
    }

    fn traverse(&self, ray: &Ray, rec: &mut HitRecord<M>, stats: &mut TraversalStats) -> bool {
        if self.nodes.is_empty() {
            return false;
        }

        let mut stack = [0usize; STACK_SIZE];
        let mut stack_len = 1;
        let mut updated = false;

        while stack_len > 0 {
            stack_len -= 1;
            let node = &self.nodes[stack[stack_len]];
            stats.nodes_visited += 1;

            if !ray.intersects_aabb_within(node.aabb(), EPSILON, rec.t) {
                continue;
            }

            match *node {
                BvhNode::Leaf { start, count, .. } => {
                    for i in start..start + count {
                        stats.triangles_tested += 1;
                        let triangle = &self.triangles[i];
                        if let Some(hit) = triangle.intersects_ray(ray, EPSILON, rec.t) {
                            let t = hit.distance;
                            rec.hit = true;
                            rec.t = t;
                            rec.point = ray.at(t);
                            rec.normal = triangle.normal();
                            rec.payload = self.materials[i];
                            updated = true;
                        }
                    }
                }
                BvhNode::Node {
                    child_l_index,
                    child_r_index,
                    ..
                } => {
                    for child in [child_l_index, child_r_index] {
                        if stack_len < STACK_SIZE {
                            stack[stack_len] = child;
                            stack_len += 1;
                        } else {
                            stats.dropped_nodes += 1;
                        }
                    }
                }
            }
        }

        updated
    }
}
