//! Pure geometry primitives for Grapple
//!
//! This crate contains the point, rect, and resize-edge types that are used
//! throughout the Grapple interaction engine. It has no dependencies and no
//! knowledge of sessions or modifiers.

mod geometry;

pub use geometry::*;

pub mod prelude {
    pub use crate::geometry::{Edges, Point, Rect};
}
