//! This module holds the [`Ray`] definition, the triangle [`Intersection`] and the
//! [`HitRecord`] produced by queries.
mod hit;
mod ray_impl;

pub use self::hit::*;
pub use self::ray_impl::*;
