//! This module defines the sparse 64-ary voxel tree and its ray march.

mod build;
mod s64_node;
mod traverse;

pub use self::build::*;
pub use self::s64_node::*;
pub use self::traverse::*;
