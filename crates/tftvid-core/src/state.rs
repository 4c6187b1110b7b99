use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};

/// Coarse lifecycle of a loaded player, observed by the CLI layer and by
/// tests; the pipeline threads themselves only look at `ControlState`'s
/// finer-grained flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerLifecycle {
    Idle,
    Loaded,
    Playing,
    Paused,
    Stopped,
}

/// The atomic control surface shared by all four pipeline threads:
/// `running`/`flushing` gate the queues (see [`crate::Queue`]), the
/// rest carry the interactive control protocol (pause, seek, speed) and
/// the current playback position for status reporting.
///
/// `speed_factor` is stored as the bit pattern of an `f64` in an
/// `AtomicU64` — there is no `AtomicF64` in `std`, and a `Mutex<f64>`
/// would serialize every Presenter tick against the Controller for a
/// single read-mostly value.
pub struct ControlState {
    pub running: AtomicBool,
    pub flushing: AtomicBool,
    pub paused: AtomicBool,
    pub seek_request: AtomicBool,
    pub reset_time_request: AtomicBool,
    /// Set by the Demuxer during a seek's flush sequence; consumed
    /// (compare-and-swap) by the Decoder thread, which calls the
    /// decoder's own `flush()` before decoding the next post-seek
    /// packet. Needed because the Demuxer only holds the container, not
    /// the decoder context — the two live on different threads.
    pub decoder_flush_request: AtomicBool,
    pub seek_target_us: AtomicI64,
    pub current_pts_us: AtomicI64,
    speed_factor_bits: AtomicU64,
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlState {
    pub fn new() -> Self {
        ControlState {
            running: AtomicBool::new(true),
            flushing: AtomicBool::new(false),
            paused: AtomicBool::new(false),
            seek_request: AtomicBool::new(false),
            reset_time_request: AtomicBool::new(false),
            decoder_flush_request: AtomicBool::new(false),
            seek_target_us: AtomicI64::new(0),
            current_pts_us: AtomicI64::new(0),
            speed_factor_bits: AtomicU64::new(1.0f64.to_bits()),
        }
    }

    pub fn speed_factor(&self) -> f64 {
        f64::from_bits(self.speed_factor_bits.load(Ordering::Acquire))
    }

    /// Clamped to a floor of 0.1, matching the original control surface's
    /// `[` key (speed never goes to zero or negative).
    pub fn set_speed_factor(&self, speed: f64) {
        let clamped = speed.max(0.1);
        self.speed_factor_bits
            .store(clamped.to_bits(), Ordering::Release);
    }

    pub fn request_seek(&self, target_us: i64) {
        self.seek_target_us.store(target_us.max(0), Ordering::Release);
        self.seek_request.store(true, Ordering::Release);
    }

    pub fn toggle_paused(&self) {
        self.paused.fetch_xor(true, Ordering::AcqRel);
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_factor_round_trips_through_bit_storage() {
        let cs = ControlState::new();
        assert_eq!(cs.speed_factor(), 1.0);
        cs.set_speed_factor(1.7);
        assert!((cs.speed_factor() - 1.7).abs() < f64::EPSILON);
    }

    #[test]
    fn set_speed_factor_floors_at_one_tenth() {
        let cs = ControlState::new();
        cs.set_speed_factor(-3.0);
        assert_eq!(cs.speed_factor(), 0.1);
        cs.set_speed_factor(0.05);
        assert_eq!(cs.speed_factor(), 0.1);
    }

    #[test]
    fn request_seek_clamps_negative_targets_to_zero() {
        let cs = ControlState::new();
        cs.request_seek(-500);
        assert_eq!(cs.seek_target_us.load(Ordering::Acquire), 0);
        assert!(cs.seek_request.load(Ordering::Acquire));
    }

    #[test]
    fn toggle_paused_flips_each_call() {
        let cs = ControlState::new();
        assert!(!cs.paused.load(Ordering::Acquire));
        cs.toggle_paused();
        assert!(cs.paused.load(Ordering::Acquire));
        cs.toggle_paused();
        assert!(!cs.paused.load(Ordering::Acquire));
    }

    #[test]
    fn decoder_flush_request_starts_clear() {
        let cs = ControlState::new();
        assert!(!cs.decoder_flush_request.load(Ordering::Acquire));
    }
}
