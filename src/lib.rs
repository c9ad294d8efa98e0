//! A crate which exports rays, axis-aligned bounding boxes, a binary SAH bounding
//! volume hierarchy over triangles and a sparse 64-ary voxel tree.
//!
//! ## About
//!
//! Both structures answer the same question: what does this ray hit first?
//!
//! - [`Bvh`] is built over a triangle soup where every triangle carries a material
//!   value. Construction sorts triangles along the widest axis and picks the split
//!   with the lowest surface area heuristic cost. Traversal uses a fixed-size stack,
//!   so no memory is allocated per query.
//! - [`S64Tree`] is built over a dense `N³` occupancy grid ([`VoxelGrid`]) where `N`
//!   is a power of four. Every node covers a `4×4×4` arrangement of sub-cells and
//!   stores a 64-bit occupancy mask, so empty space costs no storage. Traversal
//!   marches the ray and skips whole empty blocks at a time.
//!
//! Both structures are immutable once built and can be queried from many threads at
//! once. Any change of the scene requires a full rebuild.
//!
//! ## Example
//!
//! ```
//! use voxely::{Aabb, Bvh, Point3, Ray, S64Tree, Triangle, Vector3, VoxelGrid};
//!
//! let triangles = vec![(
//!     Triangle::new(
//!         Point3::new(-1.0, -1.0, 0.0),
//!         Point3::new(1.0, -1.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!     ),
//!     7u32,
//! )];
//! let bvh = Bvh::build(triangles);
//! let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
//! let hit = bvh.intersect(&ray);
//! assert!(hit.hit);
//! assert_eq!(hit.payload, 7);
//!
//! let mut grid = VoxelGrid::new(4).unwrap();
//! grid.set(1, 2, 3, 9);
//! let bounds = Aabb::with_bounds(Point3::new(0.0, 0.0, 0.0), Point3::new(4.0, 4.0, 4.0));
//! let tree = S64Tree::build(&grid, bounds).unwrap();
//! let ray = Ray::new(Point3::new(1.5, 2.5, -10.0), Vector3::new(0.0, 0.0, 1.0));
//! assert_eq!(tree.intersect(&ray).payload, 9);
//! ```
//!
//! ## Features
//!
//! - `rayon` (default **enabled**) - traces batches of rays and pixel rows in parallel
//! - `serde` (default **disabled**) - adds `Serialize` and `Deserialize` implementations
//! - `cli` (default **disabled**) - builds the `voxely-trace` demo binary
//!

/// Float type used by this crate.
pub type Real = f32;

/// Point math type used by this crate. Type alias for [`nalgebra::Point3`].
pub type Point3 = nalgebra::Point3<Real>;

/// Vector math type used by this crate. Type alias for [`nalgebra::Vector3`].
pub type Vector3 = nalgebra::Vector3<Real>;

/// Minimal ray distance accepted as a hit. Avoids self intersection artifacts.
pub const EPSILON: Real = 0.0001;

/// Rays whose direction is this close to a triangle's plane are treated as parallel.
pub const PARALLEL_EPSILON: Real = 1e-6;

/// Direction components with a smaller magnitude are treated as zero.
pub const DIRECTION_EPSILON: Real = 1e-8;

/// Stand-in for `1 / d` when a direction component `d` is treated as zero.
pub const DIRECTION_SENTINEL: Real = 1e30;

/// Initial distance of a [`HitRecord`] before anything was hit.
pub const T_FAR: Real = 1e30;

pub mod aabb;
pub mod axis;
pub mod bounding_hierarchy;
pub mod bvh;
pub mod error;
pub mod ray;
pub mod s64tree;
pub mod shapes;
pub mod voxel;
mod utils;

#[cfg(test)]
mod testbase;

pub use crate::aabb::{Aabb, Bounded};
pub use crate::bounding_hierarchy::{trace_rows, BoundingHierarchy};
pub use crate::bvh::{Bvh, BvhNode, TraversalStats};
pub use crate::error::{Error, Result};
pub use crate::ray::{HitRecord, Intersection, Ray};
pub use crate::s64tree::{S64Node, S64Tree, VoxelHit};
pub use crate::shapes::triangle::Triangle;
pub use crate::voxel::{VoxelGrid, VoxelId};

#[cfg(doctest)]
doc_comment::doctest!("../README.md");
