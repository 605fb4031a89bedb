//! Impulse-strategy velocity estimation over a rolling sample window.
//!
//! The session keeps one 2-D tracker per coordinate basis and feeds it every
//! raw sample; event derivation reads the smoothed estimate without touching
//! tracker state.

use grapple_geometry::Point;

/// Ring buffer size for velocity samples.
const HISTORY_SIZE: usize = 20;

/// Only samples within the last 100ms contribute to the estimate.
const HORIZON_MS: u64 = 100;

/// If no sample arrives for this long, assume the pointer has stopped.
pub const ASSUME_STOPPED_MS: u64 = 40;

#[derive(Clone, Copy, Default)]
struct PositionAtTime {
    time_ms: u64,
    position: f32,
}

/// Single-axis velocity tracker.
///
/// Velocity is recovered from the kinetic energy accumulated over the recent
/// window rather than from a straight two-point difference, which keeps the
/// estimate stable across jittery sample spacing.
#[derive(Clone)]
pub struct VelocityTracker1D {
    samples: [Option<PositionAtTime>; HISTORY_SIZE],
    index: usize,
}

impl Default for VelocityTracker1D {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityTracker1D {
    pub fn new() -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            index: 0,
        }
    }

    /// Records a position at the given millisecond timestamp.
    pub fn add(&mut self, time_ms: u64, position: f32) {
        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some(PositionAtTime { time_ms, position });
    }

    /// Smoothed velocity in units/second.
    ///
    /// Returns 0.0 with fewer than two usable samples or after a
    /// stopped-pointer gap.
    pub fn velocity(&self) -> f32 {
        let mut positions = [0.0f32; HISTORY_SIZE];
        let mut times = [0.0f32; HISTORY_SIZE];
        let mut sample_count = 0;

        let newest = match self.samples[self.index] {
            Some(sample) => sample,
            None => return 0.0,
        };

        let mut current_index = self.index;
        let mut previous_time = newest.time_ms;

        while let Some(sample) = self.samples[current_index] {
            let age = (newest.time_ms - sample.time_ms) as f32;
            let gap = previous_time.abs_diff(sample.time_ms) as f32;
            previous_time = sample.time_ms;

            if age > HORIZON_MS as f32 || gap > ASSUME_STOPPED_MS as f32 {
                break;
            }

            positions[sample_count] = sample.position;
            times[sample_count] = -age;

            current_index = if current_index == 0 {
                HISTORY_SIZE - 1
            } else {
                current_index - 1
            };

            sample_count += 1;
            if sample_count >= HISTORY_SIZE {
                break;
            }
        }

        if sample_count < 2 {
            return 0.0;
        }

        impulse_velocity(&positions, &times, sample_count) * 1000.0
    }

    /// Clears all tracked data, as happens when an interaction starts.
    pub fn reset(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.index = 0;
    }
}

/// Paired trackers for one coordinate basis.
#[derive(Clone, Default)]
pub struct VelocityTracker2D {
    x: VelocityTracker1D,
    y: VelocityTracker1D,
}

impl VelocityTracker2D {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, time_ms: u64, position: Point) {
        self.x.add(time_ms, position.x);
        self.y.add(time_ms, position.y);
    }

    pub fn velocity(&self) -> Point {
        Point::new(self.x.velocity(), self.y.velocity())
    }

    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
    }
}

/// Recovers velocity from the work done over the sample window, oldest
/// interval first.
fn impulse_velocity(
    positions: &[f32; HISTORY_SIZE],
    times: &[f32; HISTORY_SIZE],
    sample_count: usize,
) -> f32 {
    if sample_count < 2 {
        return 0.0;
    }

    let mut work = 0.0f32;
    let start = sample_count - 1;
    let mut next_time = times[start];

    for i in (1..=start).rev() {
        let current_time = next_time;
        next_time = times[i - 1];
        if current_time == next_time {
            continue;
        }

        let step = positions[i] - positions[i - 1];
        let v_curr = step / (current_time - next_time);
        let v_prev = kinetic_energy_to_velocity(work);
        work += (v_curr - v_prev) * v_curr.abs();
        if i == start {
            work *= 0.5;
        }
    }

    kinetic_energy_to_velocity(work)
}

/// E = 0.5 * m * v^2 with m = 1, sign carried through.
#[inline]
fn kinetic_energy_to_velocity(kinetic_energy: f32) -> f32 {
    kinetic_energy.signum() * (2.0 * kinetic_energy.abs()).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tracker_returns_zero() {
        let tracker = VelocityTracker1D::new();
        assert_eq!(tracker.velocity(), 0.0);
    }

    #[test]
    fn single_point_returns_zero() {
        let mut tracker = VelocityTracker1D::new();
        tracker.add(0, 100.0);
        assert_eq!(tracker.velocity(), 0.0);
    }

    #[test]
    fn constant_motion_recovers_its_velocity() {
        let mut tracker = VelocityTracker1D::new();
        // 100 px per 10ms = 10000 px/s
        tracker.add(0, 0.0);
        tracker.add(10, 100.0);
        tracker.add(20, 200.0);
        tracker.add(30, 300.0);

        let velocity = tracker.velocity();
        assert!(
            (velocity - 10000.0).abs() < 1000.0,
            "expected ~10000, got {velocity}"
        );
    }

    #[test]
    fn backwards_motion_is_negative() {
        let mut tracker = VelocityTracker1D::new();
        tracker.add(0, 300.0);
        tracker.add(10, 200.0);
        tracker.add(20, 100.0);

        assert!(tracker.velocity() < 0.0);
    }

    #[test]
    fn reset_discards_history() {
        let mut tracker = VelocityTracker1D::new();
        tracker.add(0, 0.0);
        tracker.add(10, 100.0);
        tracker.reset();
        assert_eq!(tracker.velocity(), 0.0);
    }

    #[test]
    fn gap_over_stopped_threshold_returns_zero() {
        let mut tracker = VelocityTracker1D::new();
        tracker.add(0, 0.0);
        tracker.add(ASSUME_STOPPED_MS + 1, 100.0);

        assert_eq!(tracker.velocity(), 0.0);
    }

    #[test]
    fn samples_past_the_horizon_are_ignored() {
        let mut tracker = VelocityTracker1D::new();
        tracker.add(0, 0.0);
        tracker.add(150, 100.0);
        tracker.add(160, 200.0);
        tracker.add(170, 300.0);

        assert!(tracker.velocity().abs() > 0.0);
    }

    #[test]
    fn paired_tracker_reports_both_axes() {
        let mut tracker = VelocityTracker2D::new();
        tracker.add(0, Point::new(0.0, 0.0));
        tracker.add(10, Point::new(10.0, -20.0));
        tracker.add(20, Point::new(20.0, -40.0));

        let velocity = tracker.velocity();
        assert!(velocity.x > 0.0);
        assert!(velocity.y < 0.0);
    }
}
