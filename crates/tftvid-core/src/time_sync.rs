use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

/// Microseconds elapsed since this process started, off a monotonic
/// `Instant` anchor rather than a wall clock — the original source reads
/// `av_gettime()` (wall-clock), but only deltas between calls ever feed
/// into the pacing math, so a monotonic source is strictly safer against
/// clock steps without changing any observable timing.
fn now_us() -> i64 {
    static START: OnceLock<Instant> = OnceLock::new();
    let start = START.get_or_init(Instant::now);
    start.elapsed().as_micros() as i64
}

/// Maps decoded-frame presentation timestamps onto wall-clock deadlines.
///
/// `reset_pts_base_us` anchors a new `(uniTimeStartUs, ptsBaseUs)` pair;
/// `frame_time_us` converts a frame's pts into the wall-clock instant (in
/// the same `now_us()` timebase) at which it should be presented, scaled
/// by the current playback speed. `pts_base_us` starts at the sentinel
/// `-1` so the Presenter can detect "unset" and anchor off the first
/// frame it sees after a seek or at startup.
pub struct TimeSync {
    uni_time_start_us: AtomicI64,
    pts_base_us: AtomicI64,
}

impl Default for TimeSync {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSync {
    pub fn new() -> Self {
        TimeSync {
            uni_time_start_us: AtomicI64::new(0),
            pts_base_us: AtomicI64::new(-1),
        }
    }

    pub fn is_unset(&self) -> bool {
        self.pts_base_us.load(Ordering::Acquire) < 0
    }

    /// Anchors the clock so that `pts_us` now maps to "now".
    pub fn reset_pts_base_us(&self, pts_us: i64) {
        self.uni_time_start_us.store(now_us(), Ordering::Release);
        self.pts_base_us.store(pts_us, Ordering::Release);
    }

    /// Returns the wall-clock instant (in `now_us()`'s timebase) at which
    /// `pts_us` should be presented, given the current `speed`. Auto-
    /// anchors off `pts_us` if the clock has never been set.
    pub fn frame_time_us(&self, pts_us: i64, speed: f64) -> i64 {
        if self.is_unset() {
            self.reset_pts_base_us(pts_us);
        }
        let start = self.uni_time_start_us.load(Ordering::Acquire);
        let base = self.pts_base_us.load(Ordering::Acquire);
        let delta = (pts_us - base) as f64 / speed;
        start + delta.round() as i64
    }

    pub fn now_us() -> i64 {
        now_us()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_clock_reports_unset() {
        let ts = TimeSync::new();
        assert!(ts.is_unset());
    }

    #[test]
    fn reset_anchors_pts_to_now() {
        let ts = TimeSync::new();
        let before = TimeSync::now_us();
        ts.reset_pts_base_us(1_000_000);
        assert!(!ts.is_unset());
        // the frame at exactly the anchor pts should map back to ~now
        let t = ts.frame_time_us(1_000_000, 1.0);
        assert!((t - before).abs() < 5_000, "t={t} before={before}");
    }

    #[test]
    fn later_pts_maps_later_at_unit_speed() {
        let ts = TimeSync::new();
        ts.reset_pts_base_us(0);
        let t0 = ts.frame_time_us(0, 1.0);
        let t1 = ts.frame_time_us(500_000, 1.0);
        assert_eq!(t1 - t0, 500_000);
    }

    #[test]
    fn half_speed_doubles_the_wall_clock_gap() {
        let ts = TimeSync::new();
        ts.reset_pts_base_us(0);
        let t0 = ts.frame_time_us(0, 0.5);
        let t1 = ts.frame_time_us(500_000, 0.5);
        assert_eq!(t1 - t0, 1_000_000);
    }

    #[test]
    fn auto_anchors_on_first_use_when_unset() {
        let ts = TimeSync::new();
        let before = TimeSync::now_us();
        let t = ts.frame_time_us(42, 1.0);
        assert!(!ts.is_unset());
        assert!((t - before).abs() < 5_000);
    }
}
