//! Snaps working coordinates to the nearest attracting target.

use grapple_core::{Modifier, ModifierArg};
use grapple_geometry::{Edges, Point};

/// Something coordinates can snap to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SnapTarget {
    /// A fixed point.
    Point(Point),
    /// The infinite lattice of grid intersections; the nearest one attracts.
    Grid { spacing: Point, offset: Point },
}

impl SnapTarget {
    pub fn grid(spacing: Point) -> Self {
        SnapTarget::Grid {
            spacing,
            offset: Point::ZERO,
        }
    }

    /// The concrete point this target puts the given coordinates at.
    fn resolve(&self, coords: Point) -> Point {
        match self {
            SnapTarget::Point(point) => *point,
            SnapTarget::Grid { spacing, offset } => Point::new(
                snap_axis(coords.x, spacing.x, offset.x),
                snap_axis(coords.y, spacing.y, offset.y),
            ),
        }
    }
}

/// Nearest lattice coordinate on one axis; zero spacing means the axis does
/// not snap.
fn snap_axis(value: f32, spacing: f32, offset: f32) -> f32 {
    if spacing == 0.0 {
        value
    } else {
        offset + ((value - offset) / spacing).round() * spacing
    }
}

/// Recognized options, merged with [`Default`] before the interaction starts.
#[derive(Clone, Debug)]
pub struct SnapOptions {
    pub targets: Vec<SnapTarget>,
    /// Maximum distance at which a target attracts. Out-of-range targets
    /// leave coordinates untouched.
    pub range: f32,
    /// When true, targets are interpreted relative to the interaction's
    /// start coordinates instead of absolutely.
    pub relative: bool,
}

impl Default for SnapOptions {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            range: f32::INFINITY,
            relative: false,
        }
    }
}

struct Status {
    offset: Point,
}

/// The snap modifier.
#[derive(Default)]
pub struct Snap {
    options: SnapOptions,
    status: Option<Status>,
}

impl Snap {
    pub fn new(options: SnapOptions) -> Self {
        Self {
            options,
            status: None,
        }
    }

    pub fn to_targets(targets: Vec<SnapTarget>) -> Self {
        Self::new(SnapOptions {
            targets,
            ..SnapOptions::default()
        })
    }
}

impl Modifier for Snap {
    fn start(&mut self, arg: &mut ModifierArg<'_>) -> Option<Edges> {
        let offset = if self.options.relative {
            arg.start_coords
        } else {
            Point::ZERO
        };
        self.status = Some(Status { offset });
        None
    }

    fn set(&mut self, arg: &mut ModifierArg<'_>) {
        let Some(status) = &self.status else { return };

        let base = *arg.coords - status.offset;
        let mut best: Option<(f32, Point)> = None;

        for target in &self.options.targets {
            let candidate = target.resolve(base) + status.offset;
            let distance = arg.coords.distance_to(candidate);
            if distance > self.options.range {
                continue;
            }
            if best.map_or(true, |(best_distance, _)| distance < best_distance) {
                best = Some((distance, candidate));
            }
        }

        if let Some((_, point)) = best {
            *arg.coords = point;
        }
    }

    fn end(&mut self, _arg: &mut ModifierArg<'_>) {
        self.status = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grapple_core::{ActionKind, Phase};
    use grapple_geometry::Rect;

    fn run(modifier: &mut Snap, start: Point, sample: Point) -> Point {
        let mut rect = Rect::default();
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
    fn single_target_with_infinite_range_snaps_exactly() {
        let target = Point::new(50.0, 100.0);
        let mut modifier = Snap::to_targets(vec![SnapTarget::Point(target)]);

        let out = run(&mut modifier, Point::new(10.0, 20.0), Point::new(10.0, 20.0));
        assert_eq!(out, target);
    }

    #[test]
    fn nearest_target_wins() {
        let mut modifier = Snap::to_targets(vec![
            SnapTarget::Point(Point::new(0.0, 0.0)),
            SnapTarget::Point(Point::new(100.0, 0.0)),
        ]);

        let out = run(&mut modifier, Point::ZERO, Point::new(70.0, 0.0));
        assert_eq!(out, Point::new(100.0, 0.0));
    }

    #[test]
    fn out_of_range_targets_do_not_attract() {
        let mut modifier = Snap::new(SnapOptions {
            targets: vec![SnapTarget::Point(Point::new(50.0, 100.0))],
            range: 10.0,
            relative: false,
        });

        let sample = Point::new(10.0, 20.0);
        let out = run(&mut modifier, sample, sample);
        assert_eq!(out, sample);
    }

    #[test]
    fn grid_snaps_to_nearest_intersection() {
        let mut modifier = Snap::to_targets(vec![SnapTarget::grid(Point::new(20.0, 20.0))]);

        let out = run(&mut modifier, Point::ZERO, Point::new(27.0, 12.0));
        assert_eq!(out, Point::new(20.0, 20.0));
    }

    #[test]
    fn relative_targets_anchor_at_the_start_point() {
        let mut modifier = Snap::new(SnapOptions {
            targets: vec![SnapTarget::Point(Point::new(10.0, 0.0))],
            range: f32::INFINITY,
            relative: true,
        });

        let start = Point::new(100.0, 100.0);
        let out = run(&mut modifier, start, Point::new(104.0, 101.0));
        assert_eq!(out, Point::new(110.0, 100.0));
    }

    #[test]
    fn snapping_is_idempotent() {
        let mut modifier = Snap::to_targets(vec![SnapTarget::grid(Point::new(20.0, 20.0))]);

        let first = run(&mut modifier, Point::ZERO, Point::new(27.0, 12.0));
        let second = run(&mut modifier, Point::ZERO, first);
        assert_eq!(first, second);
    }

    #[test]
    fn no_targets_means_no_adjustment() {
        let mut modifier = Snap::default();
        let sample = Point::new(3.0, 4.0);
        let out = run(&mut modifier, sample, sample);
        assert_eq!(out, sample);
    }
}
