//! Coordinate modifiers for Grapple
//!
//! Each modifier implements the staged `start`/`set`/`end` contract from
//! `grapple-core` and owns its per-interaction status, reset every time an
//! interaction begins. Compose them through a `ModifierPipeline` in the
//! order the adjustments should apply.

pub mod aspect_ratio;
pub mod restrict;
pub mod snap;

pub use aspect_ratio::{AspectRatio, AspectRatioOptions, Ratio};
pub use restrict::{ElementRect, Restrict, RestrictOptions, Restriction};
pub use snap::{Snap, SnapOptions, SnapTarget};

pub mod prelude {
    pub use crate::aspect_ratio::{AspectRatio, AspectRatioOptions, Ratio};
    pub use crate::restrict::{Restrict, RestrictOptions, Restriction};
    pub use crate::snap::{Snap, SnapOptions, SnapTarget};
}
