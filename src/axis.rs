//! Coordinate axes, used to pick the BVH split dimension.

use std::fmt;

use crate::{Point3, Real};

/// One of the three coordinate axes.
///
/// # Examples
/// ```
/// use voxely::axis::Axis;
/// use voxely::Point3;
///
/// let p = Point3::new(1.0, 2.0, 3.0);
/// assert_eq!(Axis::Y.of(&p), 2.0);
/// assert_eq!(p[Axis::Z.index()], 3.0);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Axis {
    /// All three axes in component order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index on `nalgebra` points and vectors.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Coordinate of `point` along this axis.
    #[inline]
    pub fn of(self, point: &Point3) -> Real {
        point[self.index()]
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}
