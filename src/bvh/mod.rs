//! This module defines a [`Bvh`], a binary bounding volume hierarchy over triangles
//! built with the surface area heuristic.

mod bvh_impl;
mod bvh_node;
pub(crate) mod sah;
mod traverse;

pub use self::bvh_impl::*;
pub use self::bvh_node::*;
pub use self::sah::SAH_CANDIDATES;
pub use self::traverse::*;
