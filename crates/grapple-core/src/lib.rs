//! Core interaction engine for Grapple
//!
//! Turns a raw stream of pointer samples into interaction events (drag,
//! resize, gesture) and runs each sample through an ordered pipeline of
//! coordinate modifiers before the event is derived. Pointer capture,
//! element geometry lookup, and style application live outside this crate;
//! it only sees well-formed samples and element ids.

pub mod coords;
pub mod event;
pub mod modifier;
pub mod origin;
pub mod pointer;
pub mod session;
pub mod velocity;

pub use coords::{CoordinateSample, CoordsInfo, DeltaSource, SampleDelta};
pub use event::{classify_swipe, DeriveContext, InteractionEvent, Swipe};
pub use modifier::{Modifier, ModifierArg, ModifierPipeline};
pub use origin::{origin_fn, OriginResolver, ZeroOrigin};
pub use pointer::{
    ActionKind, ElementId, KeyModifiers, Phase, PointerButton, PointerButtons, PointerId,
    PointerRecord, RawPointer,
};
pub use session::{InteractionSession, TargetConfig};
pub use velocity::{VelocityTracker1D, VelocityTracker2D};

pub mod prelude {
    pub use crate::coords::{CoordinateSample, DeltaSource};
    pub use crate::event::{InteractionEvent, Swipe};
    pub use crate::modifier::{Modifier, ModifierArg, ModifierPipeline};
    pub use crate::origin::OriginResolver;
    pub use crate::pointer::{ActionKind, ElementId, Phase, RawPointer};
    pub use crate::session::{InteractionSession, TargetConfig};
    pub use grapple_geometry::prelude::*;
}
