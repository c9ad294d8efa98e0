//! This module defines the [`BoundingHierarchy`] trait shared by [`Bvh`] and [`S64Tree`],
//! and helpers for tracing many rays at once.

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::bvh::Bvh;
use crate::ray::{HitRecord, Ray};
use crate::s64tree::S64Tree;
use crate::voxel::VoxelId;

/// An immutable acceleration structure answering nearest-hit ray queries.
///
/// Implementors can be queried from many threads at once.
pub trait BoundingHierarchy: Sync {
    /// Payload reported for the struck primitive.
    type Payload: Copy + Default + Send;

    /// Returns the closest hit along `ray`, or a miss record.
    fn intersect(&self, ray: &Ray) -> HitRecord<Self::Payload>;

    /// Answers one query per ray. The output has the same order as `rays`.
    ///
    /// Runs in parallel when the `rayon` feature is enabled. The results do not depend
    /// on it.
    fn intersect_batch(&self, rays: &[Ray]) -> Vec<HitRecord<Self::Payload>> {
        #[cfg(feature = "rayon")]
        {
            rays.par_iter().map(|ray| self.intersect(ray)).collect()
        }
        #[cfg(not(feature = "rayon"))]
        {
            rays.iter().map(|ray| self.intersect(ray)).collect()
        }
    }
}

impl<M> BoundingHierarchy for Bvh<M>
where
    M: Copy + Default + Send + Sync,
{
    type Payload = M;

    fn intersect(&self, ray: &Ray) -> HitRecord<M> {
        let mut rec = HitRecord::miss();
        self.intersect_with(ray, &mut rec);
        rec
    }
}

impl BoundingHierarchy for S64Tree {
    type Payload = VoxelId;

    fn intersect(&self, ray: &Ray) -> HitRecord<VoxelId> {
        let mut rec = HitRecord::miss();
        self.intersect_with(ray, &mut rec);
        rec
    }
}

/// Traces one ray per pixel of a `width × height` image and returns the hits row by row.
///
/// `ray_for_pixel(x, y)` produces the ray of a pixel. Rows are traced in parallel when
/// the `rayon` feature is enabled.
///
/// # Examples
/// ```
/// use voxely::{trace_rows, Aabb, Point3, Ray, S64Tree, Vector3, VoxelGrid};
///
/// let mut grid = VoxelGrid::new(4).unwrap();
/// grid.set(0, 0, 0, 1);
/// let bounds = Aabb::with_bounds(Point3::new(0.0, 0.0, 0.0), Point3::new(4.0, 4.0, 4.0));
/// let tree = S64Tree::build(&grid, bounds).unwrap();
///
/// let hits = trace_rows(&tree, 4, 4, |x, y| {
///     Ray::new(
///         Point3::new(x as f32 + 0.5, y as f32 + 0.5, -1.0),
///         Vector3::new(0.0, 0.0, 1.0),
///     )
/// });
/// assert_eq!(hits.len(), 16);
/// assert!(hits[0].hit);
/// assert!(hits[1..].iter().all(|hit| !hit.hit));
/// ```
pub fn trace_rows<H, F>(
    hierarchy: &H,
    width: usize,
    height: usize,
    ray_for_pixel: F,
) -> Vec<HitRecord<H::Payload>>
where
    H: BoundingHierarchy + ?Sized,
    F: Fn(usize, usize) -> Ray + Sync,
{
    let trace_row = |y: usize| {
        (0..width)
            .map(|x| hierarchy.intersect(&ray_for_pixel(x, y)))
            .collect::<Vec<_>>()
    };

    #[cfg(feature = "rayon")]
    let rows: Vec<Vec<_>> = (0..height).into_par_iter().map(trace_row).collect();
    #[cfg(not(feature = "rayon"))]
    let rows: Vec<Vec<_>> = (0..height).map(trace_row).collect();

    rows.into_iter().flatten().collect()
}
