//! Interaction events and swipe classification.
//!
//! An [`InteractionEvent`] is an immutable snapshot derived once per phase
//! transition or move sample. The session passes in the scalars the
//! derivation needs (rolling coordinates, the previous event, the smoothed
//! velocity) so events never hold a back-reference to the session.

use std::cell::Cell;

use grapple_geometry::Point;
use log::trace;

use crate::coords::{CoordsInfo, DeltaSource};
use crate::pointer::{ActionKind, ElementId, KeyModifiers, Phase, PointerButton, PointerButtons, RawPointer};

/// Minimum release speed for a gesture to classify as a swipe, in px/sec.
const SWIPE_MIN_SPEED: f32 = 600.0;

/// A swipe must end within this long of the last fast sample, in ms.
const SWIPE_MAX_IDLE_MS: u64 = 150;

/// Sector widening beyond the four cardinal 90-degree buckets, in degrees.
const SWIPE_OVERLAP_DEG: f32 = 22.5;

/// A fast, recently-ended gesture classified into cardinal directions from
/// release velocity. Diagonals may set two directions at once.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Swipe {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub angle: f32,
    pub speed: f32,
    pub velocity: Point,
}

/// Classifies the gesture that `prev` belonged to, as observed at `now`.
///
/// Velocity is only well-defined while samples are still arriving, so the
/// classification reads the *previous* event's velocity, not the ending
/// sample's.
pub fn classify_swipe(prev: &InteractionEvent, now: u64) -> Option<Swipe> {
    if prev.speed() < SWIPE_MIN_SPEED || now.saturating_sub(prev.time_stamp()) > SWIPE_MAX_IDLE_MS {
        return None;
    }

    let velocity = prev.velocity();
    let mut angle = velocity.y.atan2(velocity.x).to_degrees();
    if angle < 0.0 {
        angle += 360.0;
    }

    let left = 135.0 - SWIPE_OVERLAP_DEG <= angle && angle < 225.0 + SWIPE_OVERLAP_DEG;
    let up = 225.0 - SWIPE_OVERLAP_DEG <= angle && angle < 315.0 + SWIPE_OVERLAP_DEG;

    // Left and up win the shared overlap band at the exact boundary.
    let right = !left && (315.0 - SWIPE_OVERLAP_DEG <= angle || angle < 45.0 + SWIPE_OVERLAP_DEG);
    let down = !up && 45.0 - SWIPE_OVERLAP_DEG <= angle && angle < 135.0 + SWIPE_OVERLAP_DEG;

    Some(Swipe {
        up,
        down,
        left,
        right,
        angle,
        speed: prev.speed(),
        velocity,
    })
}

/// Everything the derivation reads from the session, borrowed for one call.
pub struct DeriveContext<'a> {
    pub action: ActionKind,
    pub target: ElementId,
    pub related: Option<ElementId>,
    pub delta_source: DeltaSource,
    /// Offset subtracted from raw coordinates, resolved by the embedder's
    /// origin resolver for this target and action.
    pub origin: Point,
    pub coords: &'a CoordsInfo,
    /// Smoothed velocity for the active delta source.
    pub velocity: Point,
    /// Down-time of the most recently added active pointer.
    pub down_time: u64,
    pub prev: Option<&'a InteractionEvent>,
}

/// Immutable snapshot of one derived interaction event.
///
/// Field access goes through methods; the flat accessors (`page_x`, `dx`,
/// `velocity_x`, ...) are derived views over the nested points, never
/// separate storage. The propagation flags are the only interior mutability,
/// so listener dispatch can stop propagation through a shared reference.
#[derive(Debug, Clone)]
pub struct InteractionEvent {
    action: ActionKind,
    phase: Phase,
    target: ElementId,
    related: Option<ElementId>,
    page: Point,
    client: Point,
    delta: Point,
    velocity: Point,
    speed: f32,
    x0: f32,
    y0: f32,
    client_x0: f32,
    client_y0: f32,
    t0: u64,
    time_stamp: u64,
    dt: u64,
    duration: u64,
    button: Option<PointerButton>,
    buttons: PointerButtons,
    modifiers: KeyModifiers,
    swipe: Option<Swipe>,
    propagation_stopped: Cell<bool>,
    immediate_propagation_stopped: Cell<bool>,
}

impl InteractionEvent {
    /// Derives the event for one sample.
    ///
    /// The coordinate basis depends on the phase: `Start` reads the recorded
    /// start coordinates, `End` freezes position at the previous event's
    /// (already origin-adjusted) points while taking the current timestamp,
    /// and everything else reads the current rolling sample. The origin is
    /// subtracted exactly once, here, for the non-end cases; end events reuse
    /// points that were adjusted when they were first derived.
    pub fn derive(ctx: DeriveContext<'_>, raw: &RawPointer, phase: Phase) -> Self {
        let starting = phase == Phase::Start;
        let ending = phase == Phase::End;
        let origin = ctx.origin;

        let (mut page, mut client, time_stamp) = if starting {
            (
                ctx.coords.start.page,
                ctx.coords.start.client,
                ctx.coords.start.time_stamp,
            )
        } else if ending {
            match ctx.prev {
                Some(prev) => (prev.page, prev.client, ctx.coords.cur.time_stamp),
                // An end with no prior event degrades to the current sample.
                None => (
                    ctx.coords.cur.page,
                    ctx.coords.cur.client,
                    ctx.coords.cur.time_stamp,
                ),
            }
        } else {
            (
                ctx.coords.cur.page,
                ctx.coords.cur.client,
                ctx.coords.cur.time_stamp,
            )
        };

        if !(ending && ctx.prev.is_some()) {
            page = page - origin;
            client = client - origin;
        }

        let t0 = if starting {
            ctx.down_time
        } else {
            ctx.prev.map(|prev| prev.t0).unwrap_or(ctx.down_time)
        };

        let delta = if starting || ending {
            Point::ZERO
        } else {
            let current = match ctx.delta_source {
                DeltaSource::Page => page,
                DeltaSource::Client => client,
            };
            let previous = ctx
                .prev
                .map(|prev| prev.point(ctx.delta_source))
                .unwrap_or(current);
            current - previous
        };

        let speed = ctx.velocity.hypot();

        let swipe = if matches!(phase, Phase::End | Phase::InertiaStart) {
            ctx.prev.and_then(|prev| classify_swipe(prev, time_stamp))
        } else {
            None
        };

        trace!(
            "derive {}{}: page=({}, {}) delta=({}, {})",
            ctx.action.as_str(),
            phase.as_str(),
            page.x,
            page.y,
            delta.x,
            delta.y
        );

        Self {
            action: ctx.action,
            phase,
            target: ctx.target,
            related: ctx.related,
            page,
            client,
            delta,
            velocity: ctx.velocity,
            speed,
            x0: ctx.coords.start.page.x - origin.x,
            y0: ctx.coords.start.page.y - origin.y,
            client_x0: ctx.coords.start.client.x - origin.x,
            client_y0: ctx.coords.start.client.y - origin.y,
            t0,
            time_stamp,
            dt: ctx.coords.delta.dt,
            duration: time_stamp.saturating_sub(t0),
            button: raw.button,
            buttons: raw.buttons,
            modifiers: raw.modifiers,
            swipe,
            propagation_stopped: Cell::new(false),
            immediate_propagation_stopped: Cell::new(false),
        }
    }

    pub fn action(&self) -> ActionKind {
        self.action
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The listener-surface event name, e.g. `"resizestart"`.
    pub fn event_type(&self) -> String {
        format!("{}{}", self.action.as_str(), self.phase.as_str())
    }

    pub fn target(&self) -> ElementId {
        self.target
    }

    pub fn related(&self) -> Option<ElementId> {
        self.related
    }

    pub fn page(&self) -> Point {
        self.page
    }

    pub fn client(&self) -> Point {
        self.client
    }

    pub fn delta(&self) -> Point {
        self.delta
    }

    pub fn velocity(&self) -> Point {
        self.velocity
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    fn point(&self, source: DeltaSource) -> Point {
        match source {
            DeltaSource::Page => self.page,
            DeltaSource::Client => self.client,
        }
    }

    pub fn page_x(&self) -> f32 {
        self.page.x
    }

    pub fn page_y(&self) -> f32 {
        self.page.y
    }

    pub fn client_x(&self) -> f32 {
        self.client.x
    }

    pub fn client_y(&self) -> f32 {
        self.client.y
    }

    pub fn dx(&self) -> f32 {
        self.delta.x
    }

    pub fn dy(&self) -> f32 {
        self.delta.y
    }

    pub fn velocity_x(&self) -> f32 {
        self.velocity.x
    }

    pub fn velocity_y(&self) -> f32 {
        self.velocity.y
    }

    /// Start coordinates of the interaction, origin-adjusted.
    pub fn x0(&self) -> f32 {
        self.x0
    }

    pub fn y0(&self) -> f32 {
        self.y0
    }

    pub fn client_x0(&self) -> f32 {
        self.client_x0
    }

    pub fn client_y0(&self) -> f32 {
        self.client_y0
    }

    /// Time the interaction started; invariant across all events of one
    /// interaction.
    pub fn t0(&self) -> u64 {
        self.t0
    }

    pub fn time_stamp(&self) -> u64 {
        self.time_stamp
    }

    /// Time between the two most recent samples.
    pub fn dt(&self) -> u64 {
        self.dt
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn button(&self) -> Option<PointerButton> {
        self.button
    }

    pub fn buttons(&self) -> PointerButtons {
        self.buttons
    }

    pub fn key_modifiers(&self) -> KeyModifiers {
        self.modifiers
    }

    pub fn swipe(&self) -> Option<Swipe> {
        self.swipe
    }

    /// Retained for API compatibility with DOM-style listeners; the core has
    /// no default behavior to prevent.
    pub fn prevent_default(&self) {}

    /// Don't call listeners on subsequent targets.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    /// Don't call any remaining listeners, current target included.
    pub fn stop_immediate_propagation(&self) {
        self.immediate_propagation_stopped.set(true);
        self.propagation_stopped.set(true);
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    pub fn immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped.get()
    }
}
