//! Common utilities shared by unit tests.
#![cfg(test)]

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::aabb::Aabb;
use crate::ray::{HitRecord, Ray};
use crate::shapes::triangle::Triangle;
use crate::voxel::VoxelGrid;
use crate::{Point3, Vector3, EPSILON};

/// A vector represented as a tuple
pub type TupleVec = (f32, f32, f32);

/// Generate a `TupleVec` for [`proptest::strategy::Strategy`] from -10e3 to 10e3.
/// A small enough range to prevent most fp32 errors from breaking certain tests.
pub fn tuplevec_small_strategy() -> impl Strategy<Value = TupleVec> {
    (-10e3_f32..10e3_f32, -10e3_f32..10e3_f32, -10e3_f32..10e3_f32)
}

/// Convert a `TupleVec` to a [`Point3`].
pub fn tuple_to_point(tpl: &TupleVec) -> Point3 {
    Point3::new(tpl.0, tpl.1, tpl.2)
}

/// Creates the 12 triangles of a unit size cube centered at `pos`, all carrying `material`.
pub fn unit_cube(pos: Point3, material: u32) -> Vec<(Triangle, u32)> {
    let mut triangles = Vec::with_capacity(12);
    push_cube(pos, &mut triangles);
    triangles.into_iter().map(|t| (t, material)).collect()
}

/// Creates a unit size cube centered at `pos` and pushes the triangles to `shapes`.
fn push_cube(pos: Point3, shapes: &mut Vec<Triangle>) {
    let top_front_right = pos + Vector3::new(0.5, 0.5, -0.5);
    let top_back_right = pos + Vector3::new(0.5, 0.5, 0.5);
    let top_back_left = pos + Vector3::new(-0.5, 0.5, 0.5);
    let top_front_left = pos + Vector3::new(-0.5, 0.5, -0.5);
    let bottom_front_right = pos + Vector3::new(0.5, -0.5, -0.5);
    let bottom_back_right = pos + Vector3::new(0.5, -0.5, 0.5);
    let bottom_back_left = pos + Vector3::new(-0.5, -0.5, 0.5);
    let bottom_front_left = pos + Vector3::new(-0.5, -0.5, -0.5);

    shapes.push(Triangle::new(top_back_right, top_front_right, top_front_left));
    shapes.push(Triangle::new(top_front_left, top_back_left, top_back_right));
    shapes.push(Triangle::new(bottom_front_left, bottom_front_right, bottom_back_right));
    shapes.push(Triangle::new(bottom_back_right, bottom_back_left, bottom_front_left));
    shapes.push(Triangle::new(top_back_left, top_front_left, bottom_front_left));
    shapes.push(Triangle::new(bottom_front_left, bottom_back_left, top_back_left));
    shapes.push(Triangle::new(bottom_front_right, top_front_right, top_back_right));
    shapes.push(Triangle::new(top_back_right, bottom_back_right, bottom_front_right));
    shapes.push(Triangle::new(top_front_left, top_front_right, bottom_front_right));
    shapes.push(Triangle::new(bottom_front_right, bottom_front_left, top_front_left));
    shapes.push(Triangle::new(bottom_back_right, top_back_right, top_back_left));
    shapes.push(Triangle::new(top_back_left, bottom_back_left, bottom_back_right));
}

/// Implementation of splitmix64.
/// For reference see: http://xoroshiro.di.unimi.it/splitmix64.c
fn splitmix64(x: &mut u64) -> u64 {
    *x = x.wrapping_add(0x9E3779B97F4A7C15u64);
    let mut z = *x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9u64);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EBu64);
    z ^ (z >> 31)
}

/// Generates a new `Point3`, which will lie inside the given `aabb`. Mutates the seed.
pub fn next_point3(seed: &mut u64, aabb: &Aabb) -> Point3 {
    let u = splitmix64(seed);
    let unit = |bits: u64| (bits & 0x1F_FFFF) as f32 / 0x1F_FFFF as f32;
    let float_vector = Vector3::new(unit(u), unit(u >> 21), unit(u >> 42));
    aabb.min + aabb.size().component_mul(&float_vector)
}

/// Returns an [`Aabb`] which defines the default testing space bounds.
pub fn default_bounds() -> Aabb {
    Aabb::with_bounds(
        Point3::new(-100_000.0, -100_000.0, -100_000.0),
        Point3::new(100_000.0, 100_000.0, 100_000.0),
    )
}

/// Creates `n` deterministic random cubes. Every triangle's material is its
/// position in the returned `Vec`.
pub fn create_n_cubes(n: usize, bounds: &Aabb) -> Vec<(Triangle, u32)> {
    let mut vec = Vec::new();
    let mut seed = 0;
    for _ in 0..n {
        push_cube(next_point3(&mut seed, bounds), &mut vec);
    }
    vec.into_iter()
        .enumerate()
        .map(|(i, t)| (t, i as u32))
        .collect()
}

/// Tests every triangle against `ray` and returns the closest hit at `t >= EPSILON`.
pub fn brute_force_intersect(items: &[(Triangle, u32)], ray: &Ray) -> HitRecord<u32> {
    let mut rec = HitRecord::miss();
    for (triangle, material) in items {
        let t = ray
            .intersects_triangle(&triangle.a, &triangle.b, &triangle.c)
            .distance;
        if t >= EPSILON && t < rec.t {
            rec.hit = true;
            rec.t = t;
            rec.point = ray.at(t);
            rec.normal = triangle.normal();
            rec.payload = *material;
        }
    }
    rec
}

/// Creates a `size³` grid where each cell is occupied with probability `density`.
/// Occupied cells get ids in `1..=255`.
pub fn random_grid(size: usize, density: f64, seed: u64) -> VoxelGrid {
    let mut rng = StdRng::seed_from_u64(seed);
    let cells = (0..size * size * size)
        .map(|_| {
            if rng.random_bool(density) {
                rng.random_range(1..=255u8)
            } else {
                0
            }
        })
        .collect();
    VoxelGrid::from_vec(size, cells).unwrap()
}
