//! Rays with a cached inverse direction, the slab test against boxes and the
//! two-sided triangle test.

use crate::aabb::Aabb;
use crate::utils::{fast_max, fast_min, safe_recip};
use crate::{Point3, Real, Vector3, DIRECTION_EPSILON, DIRECTION_SENTINEL, PARALLEL_EPSILON};

/// A half line `origin + t · direction`, `t >= 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ray {
    /// Start point.
    pub origin: Point3,

    /// The ray direction. Distances along the ray are measured in multiples of it.
    pub direction: Vector3,

    /// Component-wise reciprocal of `direction`, used by the slab test.
    ///
    /// Components of `direction` with a magnitude below [`DIRECTION_EPSILON`] map to
    /// `±DIRECTION_SENTINEL`, signed like the component.
    pub inv_direction: Vector3,
}

/// Outcome of [`Ray::intersects_triangle`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Intersection {
    /// Parametric distance of the hit, `+∞` for a miss.
    pub distance: Real,

    /// Barycentric weight of vertex `b`.
    pub u: Real,

    /// Barycentric weight of vertex `c`.
    pub v: Real,
}

impl Intersection {
    /// Creates an [`Intersection`]. Use `Real::INFINITY` as `distance` for a miss.
    pub fn new(distance: Real, u: Real, v: Real) -> Intersection {
        Intersection { distance, u, v }
    }

    /// Miss which still reports the weights computed so far.
    fn miss(u: Real, v: Real) -> Intersection {
        Intersection::new(Real::INFINITY, u, v)
    }
}

impl Ray {
    /// Creates a [`Ray`]. The `direction` is stored as given and not normalized, so
    /// `t` is measured in multiples of its length.
    ///
    /// # Examples
    /// ```
    /// use voxely::ray::Ray;
    /// use voxely::{Point3, Vector3};
    ///
    /// let ray = Ray::new(Point3::origin(), Vector3::new(2.0, 0.0, 0.0));
    ///
    /// assert_eq!(ray.at(3.0), Point3::new(6.0, 0.0, 0.0));
    /// assert_eq!(ray.inv_direction.x, 0.5);
    /// assert_eq!(ray.inv_direction.y, 1e30);
    /// ```
    pub fn new(origin: Point3, direction: Vector3) -> Ray {
        Ray {
            origin,
            direction,
            inv_direction: direction
                .map(|x| safe_recip(x, DIRECTION_EPSILON, DIRECTION_SENTINEL)),
        }
    }

    /// Returns the point at parametric distance `t` along the ray.
    #[inline]
    pub fn at(&self, t: Real) -> Point3 {
        self.origin + self.direction * t
    }

    /// Narrows `[t_min, t_max]` to the part of the ray inside `aabb` using the slab method.
    ///
    /// Returns the narrowed interval if it is non-empty (`t_max >= t_min`), `None` otherwise.
    ///
    /// # Examples
    /// ```
    /// use voxely::aabb::Aabb;
    /// use voxely::ray::Ray;
    /// use voxely::{Point3, Vector3};
    ///
    /// let ray = Ray::new(Point3::origin(), Vector3::x());
    /// let aabb = Aabb::with_bounds(Point3::new(2.0, -1.0, -1.0), Point3::new(4.0, 1.0, 1.0));
    ///
    /// assert_eq!(ray.slab_test(&aabb, 0.0, 100.0), Some((2.0, 4.0)));
    /// assert_eq!(ray.slab_test(&aabb, 0.0, 1.0), None);
    /// ```
    pub fn slab_test(&self, aabb: &Aabb, t_min: Real, t_max: Real) -> Option<(Real, Real)> {
        let lbr = (aabb.min - self.origin).component_mul(&self.inv_direction);
        let rtr = (aabb.max - self.origin).component_mul(&self.inv_direction);

        let mut t_min = t_min;
        let mut t_max = t_max;
        for i in 0..3 {
            t_min = fast_max(t_min, fast_min(lbr[i], rtr[i]));
            t_max = fast_min(t_max, fast_max(lbr[i], rtr[i]));
        }

        if t_max >= t_min {
            Some((t_min, t_max))
        } else {
            None
        }
    }

    /// Boolean form of [`Ray::slab_test`].
    #[inline]
    pub fn intersects_aabb_within(&self, aabb: &Aabb, t_min: Real, t_max: Real) -> bool {
        self.slab_test(aabb, t_min, t_max).is_some()
    }

    /// Returns true if the ray enters `aabb` at any `t >= 0`.
    ///
    /// # Examples
    /// ```
    /// use voxely::aabb::Aabb;
    /// use voxely::ray::Ray;
    /// use voxely::{Point3, Vector3};
    ///
    /// let aabb = Aabb::with_bounds(Point3::new(99.9, -1.0, -1.0), Point3::new(100.1, 1.0, 1.0));
    ///
    /// assert!(Ray::new(Point3::origin(), Vector3::x()).intersects_aabb(&aabb));
    /// assert!(!Ray::new(Point3::origin(), -Vector3::x()).intersects_aabb(&aabb));
    /// ```
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        self.intersects_aabb_within(aabb, 0.0, Real::INFINITY)
    }

    /// Möller-Trumbore test against the triangle `abc`, from either side.
    ///
    /// A miss, or a ray within [`PARALLEL_EPSILON`] of the triangle plane, reports an
    /// infinite distance. Hits behind the origin report a negative distance, so callers
    /// must apply their own `t` bounds.
    #[allow(clippy::many_single_char_names)]
    pub fn intersects_triangle(&self, a: &Point3, b: &Point3, c: &Point3) -> Intersection {
        let edge_ab = *b - *a;
        let edge_ac = *c - *a;

        let p = self.direction.cross(&edge_ac);
        let det = edge_ab.dot(&p);
        // Either sign is a hit, only a vanishing determinant is rejected.
        if det.abs() < PARALLEL_EPSILON {
            return Intersection::miss(0.0, 0.0);
        }
        let inv_det = 1.0 / det;

        let s = self.origin - *a;
        let u = s.dot(&p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return Intersection::miss(u, 0.0);
        }

        let q = s.cross(&edge_ab);
        let v = self.direction.dot(&q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return Intersection::miss(u, v);
        }

        Intersection::new(edge_ac.dot(&q) * inv_det, u, v)
    }
}

#[cfg(test)]
mod tests {
    use std::cmp;

    use crate::aabb::Aabb;
    use crate::ray::Ray;
    use crate::testbase::{tuple_to_point, tuplevec_small_strategy, TupleVec};
    use crate::{Point3, Vector3};

    use float_eq::assert_float_eq;
    use proptest::prelude::*;

    /// Box spanned by the first two points and a ray from the third towards its center.
    fn gen_ray_to_aabb(data: (TupleVec, TupleVec, TupleVec)) -> (Ray, Aabb) {
        let aabb = Aabb::empty()
            .grow(&tuple_to_point(&data.0))
            .grow(&tuple_to_point(&data.1));
        let pos = tuple_to_point(&data.2);
        (Ray::new(pos, aabb.center() - pos), aabb)
    }

    /// Make sure a ray can intersect an [`Aabb`] with no depth.
    #[test]
    fn ray_hits_zero_depth_aabb() {
        let origin = Point3::new(0.0, 0.0, 0.0);
        let direction = Vector3::new(0.0, 0.0, 1.0);
        let ray = Ray::new(origin, direction);
        let min = Point3::new(-1.0, -1.0, 1.0);
        let max = Point3::new(1.0, 1.0, 1.0);
        let aabb = Aabb::with_bounds(min, max);
        assert!(ray.intersects_aabb(&aabb));
    }

    /// An axis-aligned ray inside a slab on its zero axes still hits.
    #[test]
    fn ray_with_zero_components_hits_aabb() {
        let ray = Ray::new(Point3::new(0.5, 0.5, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let aabb = Aabb::with_bounds(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let (t0, t1) = ray.slab_test(&aabb, 0.0, 1e30).unwrap();
        assert_float_eq!(t0, 5.0, abs <= 1e-5);
        assert_float_eq!(t1, 6.0, abs <= 1e-5);

        // Outside the slab of a zero axis the ray misses.
        let ray = Ray::new(Point3::new(1.5, 0.5, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(ray.slab_test(&aabb, 0.0, 1e30).is_none());
    }

    /// Two-sided triangle test: both faces report the same distance.
    #[test]
    fn ray_hits_triangle_from_both_sides() {
        let a = Point3::new(-1.0, -1.0, 0.0);
        let b = Point3::new(1.0, -1.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);

        let front = Ray::new(Point3::new(0.0, 0.0, 2.0), Vector3::new(0.0, 0.0, -1.0));
        let back = Ray::new(Point3::new(0.0, 0.0, -2.0), Vector3::new(0.0, 0.0, 1.0));
        assert_float_eq!(front.intersects_triangle(&a, &b, &c).distance, 2.0, abs <= 1e-5);
        assert_float_eq!(back.intersects_triangle(&a, &b, &c).distance, 2.0, abs <= 1e-5);
    }

    /// A ray in the plane of the triangle is rejected as parallel.
    #[test]
    fn parallel_ray_misses_triangle() {
        let a = Point3::new(-1.0, -1.0, 0.0);
        let b = Point3::new(1.0, -1.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);
        let ray = Ray::new(Point3::new(-5.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(ray.intersects_triangle(&a, &b, &c).distance, f32::INFINITY);
    }

    proptest! {
        // Test whether a `Ray` which points at the center of an `Aabb` intersects it.
        #[test]
        fn test_ray_points_at_aabb_center(data in (tuplevec_small_strategy(),
                                                   tuplevec_small_strategy(),
                                                   tuplevec_small_strategy())) {
            let (ray, aabb) = gen_ray_to_aabb(data);
            assert!(ray.intersects_aabb(&aabb));
        }

        // Test whether a `Ray` which points away from the center of an `Aabb`
        // does not intersect it, unless its origin is inside the `Aabb`.
        #[test]
        fn test_ray_points_from_aabb_center(data in (tuplevec_small_strategy(),
                                                     tuplevec_small_strategy(),
                                                     tuplevec_small_strategy())) {
            let (ray, aabb) = gen_ray_to_aabb(data);
            let ray = Ray::new(ray.origin, -ray.direction);
            assert!(!ray.intersects_aabb(&aabb) || aabb.contains(&ray.origin));
        }

        // Test whether the narrowed slab interval lies within the requested one.
        #[test]
        fn test_slab_interval_is_narrowed(data in (tuplevec_small_strategy(),
                                                   tuplevec_small_strategy(),
                                                   tuplevec_small_strategy()),
                                          t_min in 0.0f32..10.0,
                                          t_len in 0.0f32..10.0) {
            let (ray, aabb) = gen_ray_to_aabb(data);
            if let Some((t0, t1)) = ray.slab_test(&aabb, t_min, t_min + t_len) {
                assert!(t0 >= t_min);
                assert!(t1 <= t_min + t_len);
                assert!(t0 <= t1);
            }
        }

        // Test whether a `Ray` which points at a point of a triangle hits it
        // at the expected distance, from either side.
        #[test]
        fn test_ray_hits_triangle(a in tuplevec_small_strategy(),
                                  b in tuplevec_small_strategy(),
                                  c in tuplevec_small_strategy(),
                                  origin in tuplevec_small_strategy(),
                                  u: u16,
                                  v: u16) {
            let triangle = (tuple_to_point(&a), tuple_to_point(&b), tuple_to_point(&c));
            let u_vec = triangle.1 - triangle.0;
            let v_vec = triangle.2 - triangle.0;

            // Barycentric weights in steps of 0.01 with u + v <= 1.
            let u = u % 101;
            let v = cmp::min(100 - u, v % 101);
            let u = u as f32 / 100.0;
            let v = v as f32 / 100.0;

            let target = triangle.0 + u * u_vec + v * v_vec;
            let origin = tuple_to_point(&origin);
            let ray = Ray::new(origin, target - origin);

            let hit = ray.intersects_triangle(&triangle.0, &triangle.1, &triangle.2);
            let inside = (0.0..=1.0).contains(&(hit.u + hit.v)) && hit.distance < f32::INFINITY;

            // Targets on an edge may fall off due to rounding.
            let close_to_border =
                u.abs() < f32::EPSILON || (u - 1.0).abs() < f32::EPSILON || v.abs() < f32::EPSILON ||
                (v - 1.0).abs() < f32::EPSILON || (u + v - 1.0).abs() < f32::EPSILON;

            let normal = u_vec.cross(&v_vec);
            let degenerate = normal.dot(&ray.direction).abs() < 1e-6 * normal.norm() * ray.direction.norm()
                || normal.norm() < 1e-6;

            assert!(inside || close_to_border || degenerate);
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_ray_types_are_serializable() {
        fn assert_serde<T: serde::Serialize + serde::de::DeserializeOwned>() {}
        assert_serde::<Ray>();
        assert_serde::<crate::ray::Intersection>();
    }
}
