//! The modifier pipeline: composable coordinate constraints.
//!
//! Modifiers run in user-configured order, each mutating the shared working
//! coordinates in place so later modifiers see the already-adjusted values.
//! That order is part of the public contract, not an implementation detail.

use grapple_geometry::{Edges, Point, Rect};
use log::trace;

use crate::pointer::{ActionKind, Phase};

/// The shared per-sample state a modifier operates on.
///
/// `coords` is the working point the pipeline rewrites; `page_coords` keeps
/// the unmodified sample so a modifier can always see what the pointer
/// actually did, however many stages ran before it.
pub struct ModifierArg<'a> {
    pub action: ActionKind,
    pub phase: Phase,
    /// Currently active resize edges. A modifier's `start` may replace these
    /// for the rest of the interaction by returning a new set.
    pub edges: Edges,
    /// The target element's rect, updated by the embedder between samples.
    pub rect: &'a mut Rect,
    /// Working coordinates, mutated in place by each stage.
    pub coords: &'a mut Point,
    /// The raw page coordinates of the current sample, before any stage ran.
    pub page_coords: Point,
    /// The interaction's recorded start page coordinates.
    pub start_coords: Point,
}

/// A composable coordinate constraint with a staged lifecycle.
///
/// `start` runs once when the governing action begins and may return a
/// replacement edge set (edge linking); `set` runs on every sample and must
/// be idempotent for identical input state, because the session may
/// re-evaluate the pipeline during validation; `end` releases per-interaction
/// state so nothing leaks into the next interaction reusing this instance.
pub trait Modifier {
    fn start(&mut self, arg: &mut ModifierArg<'_>) -> Option<Edges> {
        let _ = arg;
        None
    }

    fn set(&mut self, arg: &mut ModifierArg<'_>);

    fn end(&mut self, arg: &mut ModifierArg<'_>) {
        let _ = arg;
    }
}

/// Ordered list of modifiers driven once per sample.
#[derive(Default)]
pub struct ModifierPipeline {
    modifiers: Vec<Box<dyn Modifier>>,
}

impl ModifierPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, modifier: Box<dyn Modifier>) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn push(&mut self, modifier: Box<dyn Modifier>) {
        self.modifiers.push(modifier);
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    /// Runs every `start` hook in order.
    ///
    /// When a modifier returns replacement edges, later modifiers in the same
    /// pass already observe them, and the final set is returned for the
    /// session to assign into its own state.
    pub fn start(&mut self, arg: &mut ModifierArg<'_>) -> Option<Edges> {
        let mut replaced = None;
        for modifier in &mut self.modifiers {
            if let Some(edges) = modifier.start(arg) {
                arg.edges = edges;
                replaced = Some(edges);
            }
        }
        replaced
    }

    /// Runs every `set` hook in order over the shared working coordinates.
    pub fn set(&mut self, arg: &mut ModifierArg<'_>) {
        for modifier in &mut self.modifiers {
            modifier.set(arg);
        }
        trace!(
            "pipeline set: raw=({}, {}) adjusted=({}, {})",
            arg.page_coords.x,
            arg.page_coords.y,
            arg.coords.x,
            arg.coords.y
        );
    }

    /// Runs every `end` hook in order. Called on normal end and on cancel,
    /// so modifier status never survives an aborted interaction.
    pub fn end(&mut self, arg: &mut ModifierArg<'_>) {
        for modifier in &mut self.modifiers {
            modifier.end(arg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Offset(f32);

    impl Modifier for Offset {
        fn set(&mut self, arg: &mut ModifierArg<'_>) {
            arg.coords.x = arg.page_coords.x + self.0;
        }
    }

    /// Doubles whatever x the stages before it produced.
    struct DoubleX;

    impl Modifier for DoubleX {
        fn set(&mut self, arg: &mut ModifierArg<'_>) {
            arg.coords.x *= 2.0;
        }
    }

    struct LinkAll;

    impl Modifier for LinkAll {
        fn start(&mut self, arg: &mut ModifierArg<'_>) -> Option<Edges> {
            Some(arg.edges.linked())
        }

        fn set(&mut self, _arg: &mut ModifierArg<'_>) {}
    }

    fn run_set(pipeline: &mut ModifierPipeline, start: Point, sample: Point) -> Point {
        let mut rect = Rect::default();
        let mut coords = sample;
        let mut arg = ModifierArg {
            action: ActionKind::Drag,
            phase: Phase::Move,
            edges: Edges::NONE,
            rect: &mut rect,
            coords: &mut coords,
            page_coords: sample,
            start_coords: start,
        };
        pipeline.set(&mut arg);
        coords
    }

    #[test]
    fn stages_see_earlier_adjustments() {
        let mut pipeline = ModifierPipeline::new()
            .with(Box::new(Offset(10.0)))
            .with(Box::new(DoubleX));

        let out = run_set(&mut pipeline, Point::ZERO, Point::new(5.0, 0.0));
        assert_eq!(out.x, 30.0);
    }

    #[test]
    fn order_is_significant() {
        let mut pipeline = ModifierPipeline::new()
            .with(Box::new(DoubleX))
            .with(Box::new(Offset(10.0)));

        // Offset overwrites from the raw sample, so reversing the order
        // produces a different result.
        let out = run_set(&mut pipeline, Point::ZERO, Point::new(5.0, 0.0));
        assert_eq!(out.x, 15.0);
    }

    #[test]
    fn set_is_idempotent_for_identical_input() {
        let mut pipeline = ModifierPipeline::new().with(Box::new(Offset(3.0)));

        let first = run_set(&mut pipeline, Point::ZERO, Point::new(1.0, 2.0));
        let second = run_set(&mut pipeline, Point::ZERO, Point::new(1.0, 2.0));
        assert_eq!(first, second);
    }

    #[test]
    fn start_returns_replacement_edges() {
        let mut pipeline = ModifierPipeline::new().with(Box::new(LinkAll));

        let mut rect = Rect::default();
        let mut coords = Point::ZERO;
        let mut arg = ModifierArg {
            action: ActionKind::Resize,
            phase: Phase::Start,
            edges: Edges {
                left: true,
                ..Edges::NONE
            },
            rect: &mut rect,
            coords: &mut coords,
            page_coords: Point::ZERO,
            start_coords: Point::ZERO,
        };
        let replaced = pipeline.start(&mut arg).unwrap();
        assert!(replaced.left && replaced.top);
        assert!(!replaced.bottom && !replaced.right);
    }
}
