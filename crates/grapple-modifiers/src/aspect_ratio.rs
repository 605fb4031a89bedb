//! Forces resizes to keep a dx/dy ratio.
//!
//! At `start` the requested edge set is replaced with a linked set so a
//! single-edge grab still has a coherent corner to scale against; at `set`
//! the displacement on the non-primary axis is derived from the primary
//! axis's displacement and the resolved ratio.

use std::fmt;
use std::rc::Rc;

use grapple_core::{Modifier, ModifierArg};
use grapple_geometry::{Edges, Point, Rect};
use log::trace;

/// How the target ratio is obtained when the interaction starts.
#[derive(Clone)]
pub enum Ratio {
    /// A fixed width/height ratio.
    Of(f32),
    /// Compute the ratio from the element's rect at start.
    Preserve,
    /// Force 1:1. Also clears the `fix` flag regardless of the option.
    Square,
    /// Resolve the ratio from the interaction at start.
    Dynamic(Rc<dyn Fn(&ModifierArg<'_>) -> f32>),
}

impl fmt::Debug for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Of(ratio) => f.debug_tuple("Of").field(ratio).finish(),
            Ratio::Preserve => f.write_str("Preserve"),
            Ratio::Square => f.write_str("Square"),
            Ratio::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Recognized options, merged with [`Default`] before the interaction starts.
#[derive(Clone, Debug, Default)]
pub struct AspectRatioOptions {
    /// No ratio means the modifier leaves every sample untouched.
    pub ratio: Option<Ratio>,
    /// When true, the perpendicular displacement also corrects any ratio
    /// error the start rect carried, converging the rect to the exact
    /// target ratio instead of only constraining the deltas.
    pub fix: bool,
}

struct Status {
    ratio: Option<f32>,
    fix: bool,
    start_coords: Point,
    start_rect: Rect,
    original_edges: Edges,
    linked_edges: Edges,
}

/// The aspect-ratio modifier. One instance per pipeline; its status is
/// rebuilt at every interaction start.
#[derive(Default)]
pub struct AspectRatio {
    options: AspectRatioOptions,
    status: Option<Status>,
}

impl AspectRatio {
    pub fn new(options: AspectRatioOptions) -> Self {
        Self {
            options,
            status: None,
        }
    }

    pub fn with_ratio(ratio: Ratio) -> Self {
        Self::new(AspectRatioOptions {
            ratio: Some(ratio),
            ..AspectRatioOptions::default()
        })
    }

    fn resolve_ratio(&self, arg: &ModifierArg<'_>) -> (Option<f32>, bool) {
        let mut fix = self.options.fix;
        let raw = match &self.options.ratio {
            None => None,
            Some(Ratio::Of(ratio)) => Some(*ratio),
            Some(Ratio::Preserve) => {
                if arg.rect.height() == 0.0 {
                    None
                } else {
                    Some(arg.rect.width() / arg.rect.height())
                }
            }
            Some(Ratio::Square) => {
                fix = false;
                Some(1.0)
            }
            Some(Ratio::Dynamic(resolve)) => Some(resolve(arg)),
        };

        // A zero, negative, or non-finite ratio cannot anchor the math;
        // treat it as unresolved and let samples pass through untouched.
        let ratio = raw.filter(|ratio| ratio.is_finite() && *ratio > 0.0);
        (ratio, fix)
    }
}

impl Modifier for AspectRatio {
    fn start(&mut self, arg: &mut ModifierArg<'_>) -> Option<Edges> {
        let (mut ratio, fix) = self.resolve_ratio(arg);

        let original_edges = arg.edges;
        if arg.rect.is_degenerate() || !original_edges.any() {
            ratio = None;
        }
        if ratio.is_none() {
            trace!("aspect ratio unresolved, constraint disabled");
        }

        let linked_edges = original_edges.linked();
        self.status = Some(Status {
            ratio,
            fix,
            start_coords: arg.start_coords,
            start_rect: *arg.rect,
            original_edges,
            linked_edges,
        });

        Some(linked_edges)
    }

    fn set(&mut self, arg: &mut ModifierArg<'_>) {
        let Some(status) = &self.status else { return };
        let Some(ratio) = status.ratio else { return };

        let displacement = *arg.coords - status.start_coords;

        // Signs translate coordinate displacement into size change for the
        // edge pair that is actually moving.
        let sx = if status.linked_edges.left { -1.0 } else { 1.0 };
        let sy = if status.linked_edges.top { -1.0 } else { 1.0 };

        // The axis the user grabbed leads; the other follows the ratio.
        if status.original_edges.horizontal() {
            let dx = displacement.x;
            let dy = if status.fix {
                let new_width = status.start_rect.width() + sx * dx;
                sy * (new_width / ratio - status.start_rect.height())
            } else {
                sy * sx * dx / ratio
            };
            arg.coords.x = status.start_coords.x + dx;
            arg.coords.y = status.start_coords.y + dy;
        } else {
            let dy = displacement.y;
            let dx = if status.fix {
                let new_height = status.start_rect.height() + sy * dy;
                sx * (new_height * ratio - status.start_rect.width())
            } else {
                sx * sy * dy * ratio
            };
            arg.coords.x = status.start_coords.x + dx;
            arg.coords.y = status.start_coords.y + dy;
        }
    }

    fn end(&mut self, _arg: &mut ModifierArg<'_>) {
        self.status = None;
    }
}
