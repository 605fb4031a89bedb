//! Coordinate samples and the session's rolling coordinate state.

use grapple_geometry::Point;

/// Which coordinate basis drives delta and velocity computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DeltaSource {
    #[default]
    Page,
    Client,
}

/// A timestamped position record, produced by the pointer-capture layer.
///
/// `page` and `client` are always both present even if only one is used
/// downstream; `time_stamp` is monotonically non-decreasing within one
/// interaction.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct CoordinateSample {
    pub page: Point,
    pub client: Point,
    pub time_stamp: u64,
}

impl CoordinateSample {
    pub fn new(page: Point, client: Point, time_stamp: u64) -> Self {
        Self {
            page,
            client,
            time_stamp,
        }
    }

    /// Builds a sample whose page and client coordinates coincide, for the
    /// common unscrolled case.
    pub fn at(position: Point, time_stamp: u64) -> Self {
        Self {
            page: position,
            client: position,
            time_stamp,
        }
    }

    pub fn point(&self, source: DeltaSource) -> Point {
        match source {
            DeltaSource::Page => self.page,
            DeltaSource::Client => self.client,
        }
    }
}

/// Inter-sample difference: per-axis movement on both bases plus the time
/// between the two samples.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct SampleDelta {
    pub page: Point,
    pub client: Point,
    pub dt: u64,
}

/// Rolling coordinate state owned by one session.
///
/// `start` is frozen when the interaction begins; `prev`/`cur` roll forward
/// with each incoming sample and `delta` always describes the step between
/// them.
#[derive(Clone, Copy, Debug, Default)]
pub struct CoordsInfo {
    pub start: CoordinateSample,
    pub prev: CoordinateSample,
    pub cur: CoordinateSample,
    pub delta: SampleDelta,
}

impl CoordsInfo {
    /// Rolls the buffers forward to a new sample.
    pub fn advance(&mut self, sample: CoordinateSample) {
        self.prev = self.cur;
        self.cur = sample;
        self.delta = SampleDelta {
            page: sample.page - self.prev.page,
            client: sample.client - self.prev.client,
            dt: sample.time_stamp.saturating_sub(self.prev.time_stamp),
        };
    }

    /// Pins every buffer to the given sample, as happens when an interaction
    /// begins.
    pub fn rebase(&mut self, sample: CoordinateSample) {
        self.start = sample;
        self.prev = sample;
        self.cur = sample;
        self.delta = SampleDelta::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_tracks_prev_and_delta() {
        let mut coords = CoordsInfo::default();
        coords.rebase(CoordinateSample::at(Point::new(10.0, 10.0), 100));
        coords.advance(CoordinateSample::at(Point::new(15.0, 10.0), 150));

        assert_eq!(coords.prev.page, Point::new(10.0, 10.0));
        assert_eq!(coords.cur.page, Point::new(15.0, 10.0));
        assert_eq!(coords.delta.page, Point::new(5.0, 0.0));
        assert_eq!(coords.delta.dt, 50);
    }

    #[test]
    fn rebase_zeroes_the_delta() {
        let mut coords = CoordsInfo::default();
        coords.advance(CoordinateSample::at(Point::new(5.0, 5.0), 10));
        coords.rebase(CoordinateSample::at(Point::new(7.0, 7.0), 20));

        assert_eq!(coords.start, coords.cur);
        assert_eq!(coords.delta, SampleDelta::default());
    }
}
