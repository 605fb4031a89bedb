//! Interaction sessions: phase orchestration over a pointer sample stream.
//!
//! One session tracks one interaction (multi-touch is modeled as independent
//! sessions). The capture layer drives it with `pointer_down` / `start` /
//! `pointer_move` / `end`; the session keeps the rolling coordinate buffers,
//! pointer records, and velocity estimators, runs the modifier pipeline over
//! every sample, and derives the event the embedder dispatches.

use std::rc::Rc;

use grapple_geometry::{Edges, Rect};
use log::debug;
use smallvec::SmallVec;

use crate::coords::{CoordinateSample, CoordsInfo, DeltaSource};
use crate::event::{DeriveContext, InteractionEvent};
use crate::modifier::{ModifierArg, ModifierPipeline};
use crate::origin::{OriginResolver, ZeroOrigin};
use crate::pointer::{ActionKind, ElementId, Phase, PointerId, PointerRecord, RawPointer};
use crate::velocity::VelocityTracker2D;

/// Per-target configuration handed to the session at interaction start.
#[derive(Clone, Copy, Debug, Default)]
pub struct TargetConfig {
    pub element: ElementId,
    /// Overrides the process-wide default delta source when set.
    pub delta_source: Option<DeltaSource>,
}

impl TargetConfig {
    pub fn new(element: ElementId) -> Self {
        Self {
            element,
            delta_source: None,
        }
    }

    pub fn with_delta_source(mut self, source: DeltaSource) -> Self {
        self.delta_source = Some(source);
        self
    }
}

/// State machine for one interaction: `start -> move* -> end`, with
/// `inertia_start` reachable only while an interaction is live and ending.
pub struct InteractionSession {
    origin: Rc<dyn OriginResolver>,
    pipeline: ModifierPipeline,
    coords: CoordsInfo,
    pointers: SmallVec<[PointerRecord; 2]>,
    page_velocity: VelocityTracker2D,
    client_velocity: VelocityTracker2D,
    prev_event: Option<InteractionEvent>,
    interacting: bool,
    action: ActionKind,
    target: ElementId,
    related: Option<ElementId>,
    delta_source: DeltaSource,
    edges: Edges,
    rect: Rect,
}

impl InteractionSession {
    pub fn new(pipeline: ModifierPipeline) -> Self {
        Self::with_origin(pipeline, Rc::new(ZeroOrigin))
    }

    pub fn with_origin(pipeline: ModifierPipeline, origin: Rc<dyn OriginResolver>) -> Self {
        Self {
            origin,
            pipeline,
            coords: CoordsInfo::default(),
            pointers: SmallVec::new(),
            page_velocity: VelocityTracker2D::new(),
            client_velocity: VelocityTracker2D::new(),
            prev_event: None,
            interacting: false,
            action: ActionKind::Drag,
            target: 0,
            related: None,
            delta_source: DeltaSource::default(),
            edges: Edges::NONE,
            rect: Rect::default(),
        }
    }

    pub fn interacting(&self) -> bool {
        self.interacting
    }

    /// The currently active resize edges, possibly linked by a modifier.
    pub fn edges(&self) -> Edges {
        self.edges
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn prev_event(&self) -> Option<&InteractionEvent> {
        self.prev_event.as_ref()
    }

    /// Sets the related element reported on subsequent events (drag-enter
    /// style relationships maintained by the embedder).
    pub fn set_related(&mut self, related: Option<ElementId>) {
        self.related = related;
    }

    /// The embedder re-queries element geometry between samples and pushes
    /// the fresh rect here.
    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    /// Records a pointer going down. Its down-time seeds `t0` when an
    /// interaction starts from this pointer.
    pub fn pointer_down(&mut self, raw: &RawPointer, sample: CoordinateSample) {
        if let Some(record) = self.pointers.iter_mut().find(|r| r.id == raw.id) {
            record.down_time = sample.time_stamp;
            record.button = raw.button;
        } else {
            self.pointers.push(PointerRecord {
                id: raw.id,
                down_time: sample.time_stamp,
                button: raw.button,
            });
        }
        if !self.interacting {
            self.coords.advance(sample);
        }
    }

    /// Forgets a lifted pointer.
    pub fn pointer_up(&mut self, id: PointerId) {
        self.pointers.retain(|r| r.id != id);
    }

    /// Begins an interaction at the given sample.
    ///
    /// Runs every modifier's `start` hook (assigning back any replacement
    /// edge set), then the `set` pass over the starting coordinates, then
    /// derives the start event.
    pub fn start(
        &mut self,
        action: ActionKind,
        config: TargetConfig,
        rect: Rect,
        edges: Edges,
        raw: &RawPointer,
        sample: CoordinateSample,
    ) -> InteractionEvent {
        if self.interacting {
            self.cancel();
        }

        if !self.pointers.iter().any(|r| r.id == raw.id) {
            self.pointer_down(raw, sample);
        }

        self.action = action;
        self.target = config.element;
        self.delta_source = config.delta_source.unwrap_or_default();
        self.rect = rect;
        self.edges = edges;
        self.coords.rebase(sample);

        self.page_velocity.reset();
        self.client_velocity.reset();
        self.page_velocity.add(sample.time_stamp, sample.page);
        self.client_velocity.add(sample.time_stamp, sample.client);

        self.run_start_hooks();
        self.run_set_hooks(Phase::Start);
        // The set pass may have adjusted the starting position (e.g. snap);
        // the adjusted sample is the interaction's real starting point.
        let adjusted = self.coords.cur;
        self.coords.rebase(adjusted);

        self.interacting = true;
        debug!(
            "interaction start: {} on element {} at ({}, {})",
            action.as_str(),
            config.element,
            adjusted.page.x,
            adjusted.page.y
        );

        let event = self.derive(raw, Phase::Start);
        self.prev_event = Some(event.clone());
        event
    }

    /// Feeds a move sample through the pipeline and derives a move event.
    ///
    /// Returns `None` when no interaction is live; the sample still rolls
    /// the coordinate buffers so a later `start` sees current positions.
    pub fn pointer_move(
        &mut self,
        raw: &RawPointer,
        sample: CoordinateSample,
    ) -> Option<InteractionEvent> {
        self.coords.advance(sample);

        if !self.interacting {
            return None;
        }

        self.page_velocity.add(sample.time_stamp, sample.page);
        self.client_velocity.add(sample.time_stamp, sample.client);

        self.run_set_hooks(Phase::Move);

        let event = self.derive(raw, Phase::Move);
        self.prev_event = Some(event.clone());
        Some(event)
    }

    /// Derives an inertia-start event without closing the interaction.
    ///
    /// Reachable only while ending an interaction whose embedder decided
    /// post-release momentum should run; the embedder keeps feeding simulated
    /// moves afterwards and finally calls [`end`](Self::end).
    pub fn inertia_start(&mut self, raw: &RawPointer) -> Option<InteractionEvent> {
        if !self.interacting {
            return None;
        }

        let event = self.derive(raw, Phase::InertiaStart);
        self.prev_event = Some(event.clone());
        Some(event)
    }

    /// Ends the interaction: runs the `end` hooks, derives the end event
    /// (position frozen at the previous event, timestamp from the sample),
    /// and releases per-interaction state.
    pub fn end(
        &mut self,
        raw: &RawPointer,
        sample: Option<CoordinateSample>,
    ) -> Option<InteractionEvent> {
        if !self.interacting {
            return None;
        }

        if let Some(sample) = sample {
            self.coords.advance(sample);
        }

        self.run_end_hooks();

        let event = self.derive(raw, Phase::End);
        debug!(
            "interaction end: {} after {}ms",
            self.action.as_str(),
            event.duration()
        );

        self.interacting = false;
        self.prev_event = None;
        Some(event)
    }

    /// Aborts the interaction at any phase.
    ///
    /// The `end` hooks still run so modifier status objects are released and
    /// nothing leaks into a later interaction reusing this pipeline.
    pub fn cancel(&mut self) {
        if !self.interacting {
            return;
        }

        debug!("interaction cancelled: {}", self.action.as_str());
        self.run_end_hooks();
        self.interacting = false;
        self.prev_event = None;
    }

    fn run_start_hooks(&mut self) {
        let start_page = self.coords.start.page;
        let mut working = start_page;
        let mut arg = ModifierArg {
            action: self.action,
            phase: Phase::Start,
            edges: self.edges,
            rect: &mut self.rect,
            coords: &mut working,
            page_coords: start_page,
            start_coords: start_page,
        };
        if let Some(edges) = self.pipeline.start(&mut arg) {
            self.edges = edges;
        }
    }

    fn run_set_hooks(&mut self, phase: Phase) {
        let raw_page = self.coords.cur.page;
        let mut working = raw_page;
        let mut arg = ModifierArg {
            action: self.action,
            phase,
            edges: self.edges,
            rect: &mut self.rect,
            coords: &mut working,
            page_coords: raw_page,
            start_coords: self.coords.start.page,
        };
        self.pipeline.set(&mut arg);

        // Page and client stay in lockstep: the client point shifts by the
        // same amount the pipeline moved the page point.
        let shift = working - raw_page;
        self.coords.cur.page = working;
        self.coords.cur.client += shift;
    }

    fn run_end_hooks(&mut self) {
        let raw_page = self.coords.cur.page;
        let mut working = raw_page;
        let mut arg = ModifierArg {
            action: self.action,
            phase: Phase::End,
            edges: self.edges,
            rect: &mut self.rect,
            coords: &mut working,
            page_coords: raw_page,
            start_coords: self.coords.start.page,
        };
        self.pipeline.end(&mut arg);
    }

    fn derive(&self, raw: &RawPointer, phase: Phase) -> InteractionEvent {
        let origin = self.origin.origin(self.target, self.action);
        let velocity = match self.delta_source {
            DeltaSource::Page => self.page_velocity.velocity(),
            DeltaSource::Client => self.client_velocity.velocity(),
        };
        let down_time = self
            .pointers
            .last()
            .map(|record| record.down_time)
            .unwrap_or(self.coords.start.time_stamp);

        let ctx = DeriveContext {
            action: self.action,
            target: self.target,
            related: self.related,
            delta_source: self.delta_source,
            origin,
            coords: &self.coords,
            velocity,
            down_time,
            prev: self.prev_event.as_ref(),
        };
        InteractionEvent::derive(ctx, raw, phase)
    }
}
