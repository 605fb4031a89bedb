//! Keeps working coordinates inside a restriction rect.

use std::fmt;
use std::rc::Rc;

use grapple_core::{Modifier, ModifierArg};
use grapple_geometry::{Edges, Point, Rect};

/// Where the restriction rect comes from.
#[derive(Clone)]
pub enum Restriction {
    /// A fixed rect.
    Rect(Rect),
    /// Resolved per sample; `None` skips the restriction for that sample.
    Dynamic(Rc<dyn Fn(&ModifierArg<'_>) -> Option<Rect>>),
}

impl fmt::Debug for Restriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Restriction::Rect(rect) => f.debug_tuple("Rect").field(rect).finish(),
            Restriction::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Which band of the dragged element must stay inside the restriction,
/// expressed as fractions of the element's size. `left`/`top` of 0 and
/// `right`/`bottom` of 1 keep the whole element inside; all four at 0.5 keep
/// only the element's center inside.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl ElementRect {
    pub const WHOLE: ElementRect = ElementRect {
        left: 0.0,
        top: 0.0,
        right: 1.0,
        bottom: 1.0,
    };

    pub const CENTER: ElementRect = ElementRect {
        left: 0.5,
        top: 0.5,
        right: 0.5,
        bottom: 0.5,
    };
}

/// Recognized options, merged with [`Default`] before the interaction starts.
#[derive(Clone, Debug, Default)]
pub struct RestrictOptions {
    /// No restriction means the modifier leaves every sample untouched.
    pub restriction: Option<Restriction>,
    /// When set, the clamp accounts for the element's extent around the
    /// pointer, captured when the interaction starts.
    pub element_rect: Option<ElementRect>,
}

struct Status {
    offset_left: f32,
    offset_top: f32,
    offset_right: f32,
    offset_bottom: f32,
}

/// The restriction modifier.
#[derive(Default)]
pub struct Restrict {
    options: RestrictOptions,
    status: Option<Status>,
}

impl Restrict {
    pub fn new(options: RestrictOptions) -> Self {
        Self {
            options,
            status: None,
        }
    }

    pub fn to_rect(rect: Rect) -> Self {
        Self::new(RestrictOptions {
            restriction: Some(Restriction::Rect(rect)),
            ..RestrictOptions::default()
        })
    }

    fn resolve(&self, arg: &ModifierArg<'_>) -> Option<Rect> {
        match self.options.restriction.as_ref()? {
            Restriction::Rect(rect) => Some(*rect),
            Restriction::Dynamic(resolve) => resolve(arg),
        }
    }
}

impl Modifier for Restrict {
    fn start(&mut self, arg: &mut ModifierArg<'_>) -> Option<Edges> {
        let mut status = Status {
            offset_left: 0.0,
            offset_top: 0.0,
            offset_right: 0.0,
            offset_bottom: 0.0,
        };

        // Distances from the pointer to the element band that must stay
        // inside, frozen at start so the clamp window is stable even if the
        // element's rect is refreshed mid-interaction.
        if let Some(element_rect) = self.options.element_rect {
            let rect = *arg.rect;
            if !rect.is_degenerate() {
                let width = rect.width();
                let height = rect.height();
                let start = arg.start_coords;
                status.offset_left = start.x - (rect.left + width * element_rect.left);
                status.offset_top = start.y - (rect.top + height * element_rect.top);
                status.offset_right = (rect.left + width * element_rect.right) - start.x;
                status.offset_bottom = (rect.top + height * element_rect.bottom) - start.y;
            }
        }

        self.status = Some(status);
        None
    }

    fn set(&mut self, arg: &mut ModifierArg<'_>) {
        let Some(status) = &self.status else { return };
        let Some(restriction) = self.resolve(arg) else {
            return;
        };

        // max-then-min rather than clamp: an over-constrained window (band
        // wider than the restriction) must pin deterministically, not panic.
        arg.coords.x = arg
            .coords
            .x
            .max(restriction.left + status.offset_left)
            .min(restriction.right - status.offset_right);
        arg.coords.y = arg
            .coords
            .y
            .max(restriction.top + status.offset_top)
            .min(restriction.bottom - status.offset_bottom);
    }

    fn end(&mut self, _arg: &mut ModifierArg<'_>) {
        self.status = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grapple_core::{ActionKind, Phase};

    fn run(modifier: &mut Restrict, element: Rect, start: Point, sample: Point) -> Point {
        let mut rect = element;
        let mut coords = start;
        let mut arg = ModifierArg {
            action: ActionKind::Drag,
            phase: Phase::Start,
            edges: Edges::NONE,
            rect: &mut rect,
            coords: &mut coords,
            page_coords: start,
            start_coords: start,
        };
        modifier.start(&mut arg);

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
        modifier.set(&mut arg);
        coords
    }

    #[test]
    fn coordinates_inside_the_rect_pass_through() {
        let mut modifier = Restrict::to_rect(Rect::new(0.0, 0.0, 100.0, 100.0));
        let sample = Point::new(40.0, 60.0);
        let out = run(&mut modifier, Rect::default(), sample, sample);
        assert_eq!(out, sample);
    }

    #[test]
    fn coordinates_outside_clamp_to_the_boundary() {
        let mut modifier = Restrict::to_rect(Rect::new(0.0, 0.0, 100.0, 100.0));
        let out = run(
            &mut modifier,
            Rect::default(),
            Point::new(50.0, 50.0),
            Point::new(130.0, -20.0),
        );
        assert_eq!(out, Point::new(100.0, 0.0));
    }

    #[test]
    fn element_rect_shrinks_the_window() {
        // Element is 20x20 with the pointer grabbing its center; keeping the
        // whole element inside [0,100] limits the pointer to [10, 90].
        let mut modifier = Restrict::new(RestrictOptions {
            restriction: Some(Restriction::Rect(Rect::new(0.0, 0.0, 100.0, 100.0))),
            element_rect: Some(ElementRect::WHOLE),
        });

        let element = Rect::new(40.0, 40.0, 60.0, 60.0);
        let start = Point::new(50.0, 50.0);
        let out = run(&mut modifier, element, start, Point::new(95.0, 5.0));
        assert_eq!(out, Point::new(90.0, 10.0));
    }

    #[test]
    fn dynamic_restriction_may_skip_samples() {
        let mut modifier = Restrict::new(RestrictOptions {
            restriction: Some(Restriction::Dynamic(Rc::new(|_| None))),
            element_rect: None,
        });

        let sample = Point::new(500.0, 500.0);
        let out = run(&mut modifier, Rect::default(), sample, sample);
        assert_eq!(out, sample);
    }

    #[test]
    fn no_restriction_is_a_no_op() {
        let mut modifier = Restrict::default();
        let sample = Point::new(500.0, 500.0);
        let out = run(&mut modifier, Rect::default(), sample, sample);
        assert_eq!(out, sample);
    }

    #[test]
    fn clamping_is_idempotent() {
        let mut modifier = Restrict::to_rect(Rect::new(0.0, 0.0, 100.0, 100.0));
        let first = run(
            &mut modifier,
            Rect::default(),
            Point::new(50.0, 50.0),
            Point::new(130.0, -20.0),
        );
        let second = run(&mut modifier, Rect::default(), Point::new(50.0, 50.0), first);
        assert_eq!(first, second);
    }
}
