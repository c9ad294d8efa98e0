//! This module defines a Triangle and its intersection algorithms

use crate::aabb::{Aabb, Bounded};
use crate::ray::{Intersection, Ray};
use crate::{Point3, Real, Vector3};

/// A triangle struct. Instance of a more complex `Bounded` primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Triangle {
    /// First point on the triangle
    pub a: Point3,
    /// Second point on the triangle
    pub b: Point3,
    /// Third point on the triangle
    pub c: Point3,
}

impl Triangle {
    /// Creates a new triangle given a counter clockwise set of points
    pub fn new(a: Point3, b: Point3, c: Point3) -> Triangle {
        Triangle { a, b, c }
    }

    /// Average of the three vertices. Items are ordered by this point when splitting.
    ///
    /// # Examples
    /// ```
    /// use voxely::{Point3, Triangle};
    ///
    /// let t = Triangle::new(
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(3.0, 0.0, 0.0),
    ///     Point3::new(0.0, 3.0, 3.0),
    /// );
    /// assert_eq!(t.centroid(), Point3::new(1.0, 1.0, 1.0));
    /// ```
    pub fn centroid(&self) -> Point3 {
        Point3::from((self.a.coords + self.b.coords + self.c.coords) / 3.0)
    }

    /// Unit normal `normalize((b - a) × (c - a))`.
    ///
    /// A degenerate triangle has no direction to normalize and yields NaN components.
    pub fn normal(&self) -> Vector3 {
        (self.b - self.a).cross(&(self.c - self.a)).normalize()
    }

    /// Intersects `ray` with this triangle, accepting distances in `[t_min, t_max)`.
    pub fn intersects_ray(&self, ray: &Ray, t_min: Real, t_max: Real) -> Option<Intersection> {
        let inter = ray.intersects_triangle(&self.a, &self.b, &self.c);
        if inter.distance < t_max && inter.distance >= t_min {
            Some(inter)
        } else {
            None
        }
    }
}

impl Bounded for Triangle {
    fn aabb(&self) -> Aabb {
        Aabb::empty().grow(&self.a).grow(&self.b).grow(&self.c)
    }
}
