// crates/tftvid-media/src/decode.rs
//
// Decoder/rescaler thread: pulls EncodedPackets, decodes, and rescales
// every frame to the panel's fixed DisplayArea in RGB565BE — ported from
// VideoPlayer::loopDecodeVideo. Unlike the original (which stores the
// raw codec-timebase pts on the AVFrame and lets the Presenter convert
// it), this converts pts to microseconds here, once, since DecodedFrame
// is a DTO of our own rather than a mirror of AVFrame.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use ffmpeg_the_third as ffmpeg;
use ffmpeg::format::Pixel;
use ffmpeg::software::scaling::{context::Context as SwsContext, flag::Flags};
use ffmpeg::Rational;

use tftvid_core::{ControlState, DecodedFrame};

use crate::{FrameQueue, PacketQueue};

fn pts_to_us(pts: i64, time_base: Rational) -> i64 {
    (pts * 1_000_000 * time_base.numerator() as i64) / time_base.denominator() as i64
}

/// First defined of {frame pts, frame best-effort timestamp, packet pts},
/// matching `loopDecodeVideo`'s pts-selection order exactly.
fn select_pts(frame: &ffmpeg::util::frame::video::Video, packet_pts: Option<i64>) -> Option<i64> {
    frame.pts().or(frame.timestamp()).or(packet_pts)
}

/// Runs the decode/rescale loop until `control.running` goes false. Exits
/// the current packet batch early (without decoding it) whenever
/// `flushing` is observed, matching `loopDecodeVideo`'s wait predicate
/// (`!flushing && !queuePacketVideo.empty()`).
pub fn run(
    mut decoder: ffmpeg::decoder::video::Video,
    time_base: Rational,
    dst_width: u32,
    dst_height: u32,
    packet_queue: Arc<PacketQueue>,
    frame_queue: Arc<FrameQueue>,
    control: Arc<ControlState>,
) {
    let mut scaler = match SwsContext::get(
        decoder.format(),
        decoder.width(),
        decoder.height(),
        Pixel::RGB565BE,
        dst_width,
        dst_height,
        Flags::BICUBIC,
    ) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("[decode] failed to build scaler: {e}");
            return;
        }
    };

    while control.running.load(Ordering::Acquire) {
        let Some(packet) = packet_queue.pop_wait(&control.running, &control.flushing) else {
            break;
        };

        // Checked after popping (not before) so a flush requested while
        // this thread was blocked inside `pop_wait` is still honored
        // before the first post-seek packet reaches the decoder.
        if control.decoder_flush_request.swap(false, Ordering::AcqRel) {
            decoder.flush();
        }

        let packet_pts = packet.pts();

        if decoder.send_packet(&packet).is_err() {
            eprintln!("[decode] failed to send packet to decoder");
            continue;
        }

        let mut raw = ffmpeg::util::frame::video::Video::empty();
        while decoder.receive_frame(&mut raw).is_ok() {
            let pts = select_pts(&raw, packet_pts);

            let mut scaled = ffmpeg::util::frame::video::Video::empty();
            if scaler.run(&raw, &mut scaled).is_err() {
                eprintln!("[decode] scale failed, dropping frame");
                continue;
            }

            let stride = scaled.stride(0);
            let data = scaled.data(0)[..stride * dst_height as usize].to_vec();

            let frame = DecodedFrame {
                pts_us: pts.map(|p| pts_to_us(p, time_base)),
                width: dst_width,
                height: dst_height,
                stride,
                pixels: data,
            };

            if !frame_queue.push_wait(frame, &control.running, &control.flushing) {
                return;
            }
        }
    }

    frame_queue.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pts_conversion_matches_microsecond_timebase_identity() {
        assert_eq!(pts_to_us(1_000_000, Rational::new(1, 1_000_000)), 1_000_000);
    }

    #[test]
    fn pts_conversion_scales_from_stream_timebase() {
        // 30000 ticks at 1/30000 timebase == 1 second == 1_000_000 µs
        assert_eq!(pts_to_us(30_000, Rational::new(1, 30_000)), 1_000_000);
    }

    #[test]
    fn select_pts_prefers_frame_pts_over_best_effort_and_packet() {
        let mut frame = ffmpeg::util::frame::video::Video::empty();
        frame.set_pts(Some(42));
        assert_eq!(select_pts(&frame, Some(99)), Some(42));
    }

    #[test]
    fn select_pts_falls_back_to_packet_pts_when_frame_has_none() {
        let frame = ffmpeg::util::frame::video::Video::empty();
        assert_eq!(select_pts(&frame, Some(7)), Some(7));
    }

    #[test]
    fn select_pts_is_none_when_nothing_is_defined() {
        let frame = ffmpeg::util::frame::video::Video::empty();
        assert_eq!(select_pts(&frame, None), None);
    }
}
