//! Primitives that can be stored in a [`Bvh`](crate::Bvh).
pub mod triangle;
