// crates/tftvid-media/src/helpers/seek.rs
//
// Seek-target conversion, split out the way velocut-media's
// helpers/seek.rs wraps ffmpeg's seek so the policy (what timebase, what
// range direction) lives in one place instead of at every call site.

use ffmpeg_the_third::Rational;

/// Converts a `ControlState::seek_target_us` microsecond target into the
/// video stream's own time base — the same conversion
/// `av_rescale_q(seekTargetUs, {1, 1000000}, streamVideo->time_base)`
/// performs before `av_seek_frame`.
pub fn target_us_to_stream_ts(target_us: i64, time_base: Rational) -> i64 {
    (target_us * time_base.denominator() as i64) / (1_000_000 * time_base.numerator() as i64)
}

/// A backward-seeking range (`..=ts`) lands on the keyframe at or before
/// `ts`, matching `AVSEEK_FLAG_BACKWARD` in the original — forward seeks
/// would skip ahead to the next keyframe and silently drift past the
/// requested position.
pub fn seek_range(ts: i64) -> std::ops::RangeToInclusive<i64> {
    ..=ts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_microseconds_into_stream_ticks() {
        let tb = Rational::new(1, 30_000);
        assert_eq!(target_us_to_stream_ts(1_000_000, tb), 30_000);
    }

    #[test]
    fn zero_target_converts_to_zero() {
        let tb = Rational::new(1, 25);
        assert_eq!(target_us_to_stream_ts(0, tb), 0);
    }
}
