//! Axis Aligned Bounding Boxes.

use std::fmt;
use std::ops::Index;

use crate::axis::Axis;
use crate::{Point3, Real, Vector3};

/// [`Aabb`] struct.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    /// Minimum coordinates
    pub min: Point3,

    /// Maximum coordinates
    pub max: Point3,
}

impl fmt::Display for Aabb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Min bound: {}; Max bound: {}", self.min, self.max)
    }
}

/// A trait implemented by things which can be bounded by an [`Aabb`].
pub trait Bounded {
    /// Returns the geometric bounds of this object in the form of an [`Aabb`].
    ///
    /// # Examples
    /// ```
    /// use voxely::aabb::{Aabb, Bounded};
    /// use voxely::Point3;
    ///
    /// struct Something;
    ///
    /// impl Bounded for Something {
    ///     fn aabb(&self) -> Aabb {
    ///         let point1 = Point3::new(0.0,0.0,0.0);
    ///         let point2 = Point3::new(1.0,1.0,1.0);
    ///         Aabb::with_bounds(point1, point2)
    ///     }
    /// }
    ///
    /// let something = Something;
    /// let aabb = something.aabb();
    ///
    /// assert!(aabb.contains(&Point3::new(0.0,0.0,0.0)));
    /// assert!(aabb.contains(&Point3::new(1.0,1.0,1.0)));
    /// ```
    fn aabb(&self) -> Aabb;
}

impl Aabb {
    /// Creates a new [`Aabb`] with the given bounds.
    ///
    /// # Examples
    /// ```
    /// use voxely::aabb::Aabb;
    /// use voxely::Point3;
    ///
    /// let aabb = Aabb::with_bounds(Point3::new(-1.0,-1.0,-1.0), Point3::new(1.0,1.0,1.0));
    /// assert_eq!(aabb.min.x, -1.0);
    /// assert_eq!(aabb.max.z, 1.0);
    /// ```
    pub fn with_bounds(min: Point3, max: Point3) -> Aabb {
        Aabb { min, max }
    }

    /// Creates a new empty [`Aabb`]. Joining anything with it yields the other operand.
    ///
    /// # Examples
    /// ```
    /// use voxely::aabb::Aabb;
    ///
    /// let aabb = Aabb::empty();
    /// assert!(aabb.is_empty());
    /// ```
    pub fn empty() -> Aabb {
        Aabb {
            min: Point3::new(Real::INFINITY, Real::INFINITY, Real::INFINITY),
            max: Point3::new(Real::NEG_INFINITY, Real::NEG_INFINITY, Real::NEG_INFINITY),
        }
    }

    /// Returns true if the [`Aabb`] is empty, i.e. `min > max` on some axis.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Returns true if both corners are finite and `min <= max` on every axis.
    pub fn is_valid(&self) -> bool {
        let finite = self
            .min
            .coords
            .iter()
            .chain(self.max.coords.iter())
            .all(|c| c.is_finite());
        finite && !self.is_empty()
    }

    /// Returns true if the [`Point3`] is inside the [`Aabb`].
    ///
    /// # Examples
    /// ```
    /// use voxely::aabb::Aabb;
    /// use voxely::Point3;
    ///
    /// let aabb = Aabb::with_bounds(Point3::new(-1.0,-1.0,-1.0), Point3::new(1.0,1.0,1.0));
    /// assert!(aabb.contains(&Point3::new(0.0,0.0,0.0)));
    /// assert!(!aabb.contains(&Point3::new(2.0,0.0,0.0)));
    /// ```
    pub fn contains(&self, p: &Point3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Returns true if the [`Point3`] is approximately inside the [`Aabb`]
    /// with respect to some `epsilon`.
    pub fn approx_contains_eps(&self, p: &Point3, epsilon: Real) -> bool {
        (p.x - self.min.x) > -epsilon
            && (p.x - self.max.x) < epsilon
            && (p.y - self.min.y) > -epsilon
            && (p.y - self.max.y) < epsilon
            && (p.z - self.min.z) > -epsilon
            && (p.z - self.max.z) < epsilon
    }

    /// Returns true if `other` is approximately inside this [`Aabb`]
    /// with respect to some `epsilon`.
    pub fn approx_contains_aabb_eps(&self, other: &Aabb, epsilon: Real) -> bool {
        self.approx_contains_eps(&other.min, epsilon)
            && self.approx_contains_eps(&other.max, epsilon)
    }

    /// Returns true if the corners of both boxes are within `epsilon` of each other.
    pub fn relative_eq(&self, other: &Aabb, epsilon: Real) -> bool {
        (self.min - other.min).abs().max() < epsilon && (self.max - other.max).abs().max() < epsilon
    }

    /// Returns a new minimal [`Aabb`] which contains both this [`Aabb`] and `other`.
    /// The result is the union of both boxes; it is associative and commutative.
    ///
    /// # Examples
    /// ```
    /// use voxely::aabb::Aabb;
    /// use voxely::Point3;
    ///
    /// let aabb1 = Aabb::with_bounds(Point3::new(-101.0,0.0,0.0), Point3::new(-100.0,1.0,1.0));
    /// let aabb2 = Aabb::with_bounds(Point3::new(100.0,0.0,0.0), Point3::new(101.0,1.0,1.0));
    /// let joint = aabb1.join(&aabb2);
    ///
    /// assert_eq!(joint.min, Point3::new(-101.0,0.0,0.0));
    /// assert_eq!(joint.max, Point3::new(101.0,1.0,1.0));
    /// ```
    pub fn join(&self, other: &Aabb) -> Aabb {
        Aabb::with_bounds(
            Point3::from(self.min.coords.inf(&other.min.coords)),
            Point3::from(self.max.coords.sup(&other.max.coords)),
        )
    }

    /// Mutable version of [`Aabb::join`].
    pub fn join_mut(&mut self, other: &Aabb) {
        *self = self.join(other);
    }

    /// Returns a new minimal [`Aabb`] which contains both this [`Aabb`] and the point `other`.
    ///
    /// # Examples
    /// ```
    /// use voxely::aabb::Aabb;
    /// use voxely::Point3;
    ///
    /// let aabb = Aabb::empty().grow(&Point3::new(1.0, 2.0, 3.0)).grow(&Point3::new(-1.0, 0.0, 5.0));
    /// assert_eq!(aabb.min, Point3::new(-1.0, 0.0, 3.0));
    /// assert_eq!(aabb.max, Point3::new(1.0, 2.0, 5.0));
    /// ```
    pub fn grow(&self, other: &Point3) -> Aabb {
        Aabb::with_bounds(
            Point3::from(self.min.coords.inf(&other.coords)),
            Point3::from(self.max.coords.sup(&other.coords)),
        )
    }

    /// Returns the size of this [`Aabb`] in all three dimensions.
    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    /// Returns the center [`Point3`] of the [`Aabb`].
    pub fn center(&self) -> Point3 {
        self.min + (self.size() / 2.0)
    }

    /// Returns the total surface area of this [`Aabb`].
    ///
    /// Only used as a relative cost by the surface area heuristic.
    ///
    /// # Examples
    /// ```
    /// use voxely::aabb::Aabb;
    /// use voxely::Point3;
    ///
    /// let aabb = Aabb::with_bounds(Point3::new(0.0,0.0,0.0), Point3::new(1.0,2.0,3.0));
    /// assert_eq!(aabb.surface_area(), 22.0);
    /// ```
    pub fn surface_area(&self) -> Real {
        let size = self.size();
        2.0 * (size.x * size.y + size.y * size.z + size.z * size.x)
    }

    /// Returns the axis along which the [`Aabb`] is stretched the most.
    ///
    /// `Y` wins over `X` only if strictly larger, and `Z` wins over the
    /// current choice only if strictly larger, so ties prefer `X`, then `Y`.
    ///
    /// # Examples
    /// ```
    /// use voxely::aabb::Aabb;
    /// use voxely::axis::Axis;
    /// use voxely::Point3;
    ///
    /// let aabb = Aabb::with_bounds(Point3::new(0.0,0.0,0.0), Point3::new(2.0,2.0,1.0));
    /// assert_eq!(aabb.largest_axis(), Axis::X);
    /// ```
    pub fn largest_axis(&self) -> Axis {
        let size = self.size();
        let mut axis = if size.y > size.x { Axis::Y } else { Axis::X };
        if size.z > size[axis.index()] {
            axis = Axis::Z;
        }
        axis
    }
}

impl Default for Aabb {
    fn default() -> Aabb {
        Aabb::empty()
    }
}

/// Make [`Aabb`]s indexable. `aabb[0]` gives a reference to the minimum bound.
/// All other indices return a reference to the maximum bound.
impl Index<usize> for Aabb {
    type Output = Point3;

    fn index(&self, index: usize) -> &Point3 {
        if index == 0 {
            &self.min
        } else {
            &self.max
        }
    }
}

/// Implementation of [`Bounded`] for [`Aabb`].
impl Bounded for Aabb {
    fn aabb(&self) -> Aabb {
        *self
    }
}

/// Implementation of [`Bounded`] for single points.
impl Bounded for Point3 {
    fn aabb(&self) -> Aabb {
        Aabb::with_bounds(*self, *self)
    }
}

#[cfg(test)]
mod tests {
    use crate::aabb::Aabb;
    use crate::axis::Axis;
    use crate::testbase::{tuple_to_point, tuplevec_small_strategy, TupleVec};
    use crate::Point3;

    use float_eq::assert_float_eq;
    use proptest::prelude::*;

    proptest! {
        // Test whether an empty `Aabb` does not contain anything.
        #[test]
        fn test_empty_contains_nothing(tpl: TupleVec) {
            let p = tuple_to_point(&tpl);
            let aabb = Aabb::empty();
            assert!(!aabb.contains(&p));
        }

        // Test whether an `Aabb` always contains its center.
        #[test]
        fn test_aabb_contains_center(a in tuplevec_small_strategy(), b in tuplevec_small_strategy()) {
            let aabb = Aabb::empty().grow(&tuple_to_point(&a)).grow(&tuple_to_point(&b));
            assert!(aabb.contains(&aabb.center()));
        }

        // Test whether the union of two point-sets contains all the points.
        #[test]
        fn test_join_two_aabbs(a in prop::collection::vec(tuplevec_small_strategy(), 5),
                               b in prop::collection::vec(tuplevec_small_strategy(), 5)) {
            let points_a = a.iter().map(tuple_to_point).collect::<Vec<_>>();
            let points_b = b.iter().map(tuple_to_point).collect::<Vec<_>>();
            let aabb1 = points_a.iter().fold(Aabb::empty(), |aabb, point| aabb.grow(point));
            let aabb2 = points_b.iter().fold(Aabb::empty(), |aabb, point| aabb.grow(point));

            let joint = aabb1.join(&aabb2);
            for point in points_a.iter().chain(points_b.iter()) {
                assert!(joint.contains(point));
            }
        }

        // Test whether joining is commutative and associative.
        #[test]
        fn test_join_commutative_associative(a in tuplevec_small_strategy(),
                                             b in tuplevec_small_strategy(),
                                             c in tuplevec_small_strategy(),
                                             d in tuplevec_small_strategy()) {
            let x = Aabb::empty().grow(&tuple_to_point(&a)).grow(&tuple_to_point(&b));
            let y = Aabb::empty().grow(&tuple_to_point(&c));
            let z = Aabb::empty().grow(&tuple_to_point(&d));

            assert_eq!(x.join(&y), y.join(&x));
            assert_eq!(x.join(&y).join(&z), x.join(&y.join(&z)));
        }

        // Test whether the joint `Aabb` of a box and the empty box is the box itself.
        #[test]
        fn test_join_empty_is_identity(a in tuplevec_small_strategy(), b in tuplevec_small_strategy()) {
            let aabb = Aabb::empty().grow(&tuple_to_point(&a)).grow(&tuple_to_point(&b));
            assert_eq!(aabb.join(&Aabb::empty()), aabb);
        }
    }

    #[test]
    fn test_default_is_empty() {
        assert!(Aabb::default().is_empty());
    }

    #[test]
    fn test_surface_area_cube() {
        let aabb = Aabb::with_bounds(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
        assert_float_eq!(aabb.surface_area(), 24.0, abs <= 1e-6);
    }

    #[test]
    fn test_surface_area_flat_box() {
        let aabb = Aabb::with_bounds(Point3::new(0.0, 0.0, 0.0), Point3::new(3.0, 2.0, 0.0));
        assert_float_eq!(aabb.surface_area(), 12.0, abs <= 1e-6);
    }

    #[test]
    fn test_largest_axis_tie_break() {
        let p = |x, y, z| Aabb::with_bounds(Point3::origin(), Point3::new(x, y, z));
        assert_eq!(p(1.0, 1.0, 1.0).largest_axis(), Axis::X);
        assert_eq!(p(1.0, 2.0, 1.0).largest_axis(), Axis::Y);
        assert_eq!(p(1.0, 2.0, 2.0).largest_axis(), Axis::Y);
        assert_eq!(p(3.0, 2.0, 3.0).largest_axis(), Axis::X);
        assert_eq!(p(1.0, 2.0, 2.5).largest_axis(), Axis::Z);
        assert_eq!(p(1.0, 0.0, 1.5).largest_axis(), Axis::Z);
    }

    #[test]
    fn test_is_valid() {
        assert!(!Aabb::empty().is_valid());
        let aabb = Aabb::with_bounds(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        assert!(aabb.is_valid());
        let inf = Aabb::with_bounds(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(f32::INFINITY, 1.0, 1.0),
        );
        assert!(!inf.is_valid());
    }
}
