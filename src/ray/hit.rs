//! The running best-so-far result of a ray query.

use crate::{Point3, Real, Vector3, T_FAR};

/// Result of a nearest-hit query.
///
/// A record starts as a miss with `t` at [`T_FAR`]. Traversal only ever replaces it
/// with strictly closer hits, so `t` never increases.
///
/// `P` is the payload of the struck primitive: the triangle material for a
/// [`Bvh`](crate::Bvh), the voxel id for an [`S64Tree`](crate::S64Tree).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitRecord<P> {
    /// Whether anything was hit.
    pub hit: bool,

    /// Parametric distance along the ray direction.
    pub t: Real,

    /// World-space hit point.
    pub point: Point3,

    /// Surface normal at the hit point.
    pub normal: Vector3,

    /// Payload of the struck primitive.
    pub payload: P,
}

impl<P: Copy + Default> HitRecord<P> {
    /// Creates a record which has not hit anything yet.
    ///
    /// # Examples
    /// ```
    /// use voxely::{HitRecord, T_FAR};
    ///
    /// let rec = HitRecord::<u8>::miss();
    /// assert!(!rec.is_hit());
    /// assert_eq!(rec.t, T_FAR);
    /// assert_eq!(rec.payload, 0);
    /// ```
    pub fn miss() -> HitRecord<P> {
        HitRecord {
            hit: false,
            t: T_FAR,
            point: Point3::origin(),
            normal: Vector3::zeros(),
            payload: P::default(),
        }
    }

    /// Returns true if the query struck something.
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.hit
    }
}

impl<P: Copy + Default> Default for HitRecord<P> {
    fn default() -> HitRecord<P> {
        HitRecord::miss()
    }
}
