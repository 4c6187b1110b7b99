// crates/tftvid-media/src/demux.rs
//
// Stream selection (ported from VideoPlayer::load's scoring loop) and the
// Demuxer thread's read/flush loop (ported from loopDemux).

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use ffmpeg_the_third as ffmpeg;
use ffmpeg::media::Type;
use ffmpeg::Rational;

use tftvid_core::ControlState;

use crate::{FrameQueue, PacketQueue};

/// Disposition bit used to prefer a stream explicitly marked "default" by
/// the container, mirroring `AV_DISPOSITION_DEFAULT` in the original.
const DEFAULT_DISPOSITION_BONUS: i64 = 100;

/// Result of scanning a container's streams for the best video track,
/// with the best audio/subtitle tracks kept only for diagnostic logging
/// (decoding them is out of scope — see `spec.md`'s audio/subtitle
/// Non-goals).
pub struct LoadedStreams {
    pub video_stream_index: usize,
    pub audio_stream_index: Option<usize>,
    pub subtitle_stream_index: Option<usize>,
    pub width: u32,
    pub height: u32,
    pub time_base: Rational,
    pub duration_us: i64,
}

/// Reads codecpar width/height/sample_rate through the raw parameters
/// pointer, matching `velocut-media`'s `probe.rs`/`decode.rs`, which do
/// the same thing — `ffmpeg-the-third`'s safe `Parameters` API doesn't
/// expose these fields directly.
unsafe fn raw_dims(params: &ffmpeg::codec::Parameters) -> (u32, u32, i32) {
    let p = params.as_ptr();
    ((*p).width as u32, (*p).height as u32, (*p).sample_rate)
}

fn video_score(is_default: bool, width: u32, height: u32) -> i64 {
    let mut score = if is_default { DEFAULT_DISPOSITION_BONUS } else { 0 };
    score += (width as i64 * height as i64) / 1000;
    score
}

fn audio_score(is_default: bool, sample_rate: i32) -> i64 {
    let mut score = if is_default { DEFAULT_DISPOSITION_BONUS } else { 0 };
    if sample_rate > 0 {
        score += sample_rate as i64 / 1000;
    }
    score
}

/// Scores every stream the way `VideoPlayer::load` does (default-
/// disposition bonus plus resolution or sample-rate) and picks the best
/// video stream; audio/subtitle picks are recorded but never decoded.
pub fn select_streams(ictx: &ffmpeg::format::context::Input) -> anyhow::Result<LoadedStreams> {
    let mut best_video: Option<(i64, usize)> = None;
    let mut best_audio: Option<(i64, usize)> = None;
    let mut best_subtitle: Option<usize> = None;

    for stream in ictx.streams() {
        let params = stream.parameters();
        let is_default = stream
            .disposition()
            .contains(ffmpeg::format::stream::Disposition::DEFAULT);

        match params.medium() {
            Type::Video => {
                let (w, h, _) = unsafe { raw_dims(&params) };
                let score = video_score(is_default, w, h);
                if best_video.map(|(s, _)| score > s).unwrap_or(true) {
                    best_video = Some((score, stream.index()));
                }
            }
            Type::Audio => {
                let (_, _, sample_rate) = unsafe { raw_dims(&params) };
                let score = audio_score(is_default, sample_rate);
                if best_audio.map(|(s, _)| score > s).unwrap_or(true) {
                    best_audio = Some((score, stream.index()));
                }
            }
            Type::Subtitle => {
                if best_subtitle.is_none() {
                    best_subtitle = Some(stream.index());
                }
            }
            _ => {}
        }
    }

    let (_, video_stream_index) =
        best_video.ok_or_else(|| anyhow::anyhow!("no valid video stream found"))?;

    if let Some((_, idx)) = best_audio {
        log::info!("Audio stream found: #{idx}");
    }

    let stream = ictx.stream(video_stream_index).unwrap();
    let params = stream.parameters();
    let (width, height, _) = unsafe { raw_dims(&params) };
    let time_base = stream.time_base();
    let duration_us = ictx.duration();

    log::info!("Selected video stream: #{video_stream_index} ({width}x{height})");

    Ok(LoadedStreams {
        video_stream_index,
        audio_stream_index: best_audio.map(|(_, i)| i),
        subtitle_stream_index: best_subtitle,
        width,
        height,
        time_base,
        duration_us,
    })
}

/// Runs the demux loop until `control.running` goes false or the stream
/// ends: pulls packets for the video stream into `packet_queue`, and on
/// `seek_request` performs the flush-seek-resume sequence from
/// `loopDemux` (flush both queues, seek, and request the decoder thread
/// flush its own internal buffers via `decoder_flush_request`, since the
/// Demuxer thread never owns the decoder context itself).
pub fn run(
    mut ictx: ffmpeg::format::context::Input,
    video_stream_index: usize,
    time_base: Rational,
    packet_queue: Arc<PacketQueue>,
    frame_queue: Arc<FrameQueue>,
    control: Arc<ControlState>,
) {
    'outer: while control.running.load(Ordering::Acquire) {
        if control.seek_request.load(Ordering::Acquire) {
            control.flushing.store(true, Ordering::Release);
            std::thread::sleep(Duration::from_millis(10));
            packet_queue.clear();
            frame_queue.clear();

            let target_us = control.seek_target_us.load(Ordering::Acquire);
            let target_ts = crate::helpers::seek::target_us_to_stream_ts(target_us, time_base);
            if let Err(e) = ictx.seek(target_ts, crate::helpers::seek::seek_range(target_ts)) {
                eprintln!("[demux] seek failed: {e}");
            }

            control.decoder_flush_request.store(true, Ordering::Release);
            control.reset_time_request.store(true, Ordering::Release);
            control.seek_request.store(false, Ordering::Release);
            control.flushing.store(false, Ordering::Release);
            eprintln!("[demux] seek request handled");
            continue;
        }

        let mut packets = ictx.packets();
        loop {
            if control.seek_request.load(Ordering::Acquire) {
                continue 'outer;
            }
            match packets.next() {
                Some(Ok((stream, packet))) => {
                    if stream.index() != video_stream_index {
                        continue;
                    }
                    if !packet_queue.push_wait(packet, &control.running, &control.flushing) {
                        break 'outer;
                    }
                }
                Some(Err(e)) => {
                    eprintln!("[demux] read error, stopping: {e}");
                    break 'outer;
                }
                None => {
                    eprintln!("[demux] end of stream");
                    break 'outer;
                }
            }
        }
    }

    packet_queue.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_disposition_outweighs_resolution_difference() {
        // a non-default 4K stream still loses to a default-flagged SD one
        // whenever the resolution gap is under the 100-point bonus.
        let sd_default = video_score(true, 720, 480);
        let hd_not_default = video_score(false, 1920, 1080);
        assert!(sd_default > hd_not_default);
    }

    #[test]
    fn higher_resolution_wins_when_disposition_is_equal() {
        let sd = video_score(false, 720, 480);
        let hd = video_score(false, 1920, 1080);
        assert!(hd > sd);
    }

    #[test]
    fn audio_score_ignores_invalid_sample_rate() {
        assert_eq!(audio_score(false, -1), 0);
        assert_eq!(audio_score(false, 48_000), 48);
    }
}
