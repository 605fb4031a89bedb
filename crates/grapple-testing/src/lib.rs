//! Testing utilities for Grapple
//!
//! Builds synthetic pointer sample streams and drives them through a full
//! interaction, so integration tests read as gestures instead of as session
//! bookkeeping.

use grapple_core::{
    ActionKind, CoordinateSample, InteractionEvent, InteractionSession, PointerButton, RawPointer,
    TargetConfig,
};
use grapple_geometry::{Edges, Point, Rect};

/// A scripted single-pointer gesture: press, moves, release.
#[derive(Clone, Debug)]
pub struct SampleStream {
    raw: RawPointer,
    press: (Point, u64),
    moves: Vec<(Point, u64)>,
    release_time: u64,
    client_offset: Point,
}

impl SampleStream {
    /// Starts a stream with the primary button going down at `position`.
    pub fn press(position: Point, time: u64) -> Self {
        Self {
            raw: RawPointer::new(0).with_button(PointerButton::Primary),
            press: (position, time),
            moves: Vec::new(),
            release_time: time,
            client_offset: Point::ZERO,
        }
    }

    /// Appends a move sample. Times must be non-decreasing.
    pub fn move_to(mut self, position: Point, time: u64) -> Self {
        self.moves.push((position, time));
        self.release_time = time;
        self
    }

    /// Sets when the pointer lifts; defaults to the last sample's time.
    pub fn release_at(mut self, time: u64) -> Self {
        self.release_time = time;
        self
    }

    /// Offsets every sample's client point from its page point, emulating a
    /// scrolled viewport.
    pub fn with_client_offset(mut self, offset: Point) -> Self {
        self.client_offset = offset;
        self
    }

    pub fn raw(&self) -> RawPointer {
        self.raw
    }

    fn sample(&self, position: Point, time: u64) -> CoordinateSample {
        CoordinateSample::new(position, position + self.client_offset, time)
    }
}

/// Drives a whole scripted interaction through `session` and collects every
/// derived event: one start, one per move, one end.
pub fn drive(
    session: &mut InteractionSession,
    action: ActionKind,
    config: TargetConfig,
    rect: Rect,
    edges: Edges,
    stream: &SampleStream,
) -> Vec<InteractionEvent> {
    let raw = stream.raw;
    let press = stream.sample(stream.press.0, stream.press.1);

    session.pointer_down(&raw, press);
    let mut events = vec![session.start(action, config, rect, edges, &raw, press)];

    let mut last_position = stream.press.0;
    for &(position, time) in &stream.moves {
        last_position = position;
        let event = session
            .pointer_move(&raw, stream.sample(position, time))
            .expect("interaction is live");
        events.push(event);
    }

    let end_sample = stream.sample(last_position, stream.release_time);
    let event = session
        .end(&raw, Some(end_sample))
        .expect("interaction is live");
    events.push(event);
    session.pointer_up(raw.id);

    events
}

/// Convenience for the common case: a plain drag over an empty pipeline
/// target with no resize edges.
pub fn drive_drag(
    session: &mut InteractionSession,
    config: TargetConfig,
    stream: &SampleStream,
) -> Vec<InteractionEvent> {
    drive(
        session,
        ActionKind::Drag,
        config,
        Rect::default(),
        Edges::NONE,
        stream,
    )
}
