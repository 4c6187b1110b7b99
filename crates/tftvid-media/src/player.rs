// crates/tftvid-media/src/player.rs
//
// Player: owns the loaded stream/decoder/panel and spawns/joins the four
// pipeline threads — ported from the VideoPlayer class's
// load/play/wait/stop/pauseResume/seek*/setSpeed public surface.

use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::JoinHandle;

use ffmpeg_the_third as ffmpeg;

use tftvid_core::{ControlState, DisplayArea, DisplayBlit, Orientation, TimeSync};

use crate::{codec_select, controller, decode, demux, presenter, FrameQueue, PacketQueue};

/// Seek step for the left/right arrow keys, matching the original's
/// `seekUsForward`/`seekUsBackward` (5 seconds).
const SEEK_STEP_US: i64 = 5_000_000;

const PACKET_QUEUE_CAPACITY: usize = 10;
const FRAME_QUEUE_CAPACITY: usize = 10;

struct LoadedPipeline {
    ictx: ffmpeg::format::context::Input,
    decoder: ffmpeg::decoder::video::Video,
    video_stream_index: usize,
    time_base: ffmpeg::Rational,
    display_area: DisplayArea,
    panel: Box<dyn DisplayBlit>,
}

/// A single load/play/stop cycle of the pipeline. `play()` consumes the
/// loaded decode context by moving it into the worker threads, so — like
/// the CLI tool this backs — a `Player` plays one file once; loading a
/// second file means constructing a new `Player`.
pub struct Player {
    control: Arc<ControlState>,
    time_sync: Arc<TimeSync>,
    packet_queue: Arc<PacketQueue>,
    frame_queue: Arc<FrameQueue>,
    duration_us: i64,
    threads: Vec<JoinHandle<()>>,
    pending: Option<LoadedPipeline>,
}

impl Player {
    /// Opens `path`, selects the best video stream, opens a decoder
    /// (hardware-first, see `codec_select`), and asks `panel` to adapt its
    /// draw rectangle to the decoded frame size and `orientation`.
    pub fn load(path: &Path, mut panel: Box<dyn DisplayBlit>, orientation: Orientation) -> anyhow::Result<Player> {
        let ictx = ffmpeg::format::input(path)?;
        let streams = demux::select_streams(&ictx)?;

        let decoder = codec_select::open_video_decoder(&ictx, streams.video_stream_index)?;

        let display_area = panel.range_adapt(decoder.width(), decoder.height(), orientation)?;

        Ok(Player {
            control: Arc::new(ControlState::new()),
            time_sync: Arc::new(TimeSync::new()),
            packet_queue: Arc::new(PacketQueue::new(PACKET_QUEUE_CAPACITY)),
            frame_queue: Arc::new(FrameQueue::new(FRAME_QUEUE_CAPACITY)),
            duration_us: streams.duration_us,
            threads: Vec::new(),
            pending: Some(LoadedPipeline {
                ictx,
                decoder,
                video_stream_index: streams.video_stream_index,
                time_base: streams.time_base,
                display_area,
                panel,
            }),
        })
    }

    pub fn duration_us(&self) -> i64 {
        self.duration_us
    }

    /// Spawns the four pipeline threads. No-op if already playing.
    pub fn play(&mut self) -> anyhow::Result<()> {
        if self.control.running.load(Ordering::Acquire) && !self.threads.is_empty() {
            return Ok(());
        }
        let pipeline = self
            .pending
            .take()
            .ok_or_else(|| anyhow::anyhow!("player already played; load() again to replay"))?;

        self.control.running.store(true, Ordering::Release);
        self.control.paused.store(false, Ordering::Release);

        eprintln!("[player] starting video playback threads");

        let demux_control = self.control.clone();
        let demux_packets = self.packet_queue.clone();
        let demux_frames = self.frame_queue.clone();
        self.threads.push(std::thread::spawn(move || {
            demux::run(
                pipeline.ictx,
                pipeline.video_stream_index,
                pipeline.time_base,
                demux_packets,
                demux_frames,
                demux_control,
            );
        }));

        let decode_control = self.control.clone();
        let decode_packets = self.packet_queue.clone();
        let decode_frames = self.frame_queue.clone();
        let time_base = pipeline.time_base;
        let dst_w = pipeline.display_area.width;
        let dst_h = pipeline.display_area.height;
        self.threads.push(std::thread::spawn(move || {
            decode::run(
                pipeline.decoder,
                time_base,
                dst_w,
                dst_h,
                decode_packets,
                decode_frames,
                decode_control,
            );
        }));

        let present_control = self.control.clone();
        let present_frames = self.frame_queue.clone();
        let present_time_sync = self.time_sync.clone();
        let panel = pipeline.panel;
        self.threads.push(std::thread::spawn(move || {
            presenter::run(panel, present_frames, present_control, present_time_sync);
        }));

        let control_control = self.control.clone();
        let duration_us = self.duration_us;
        self.threads.push(std::thread::spawn(move || {
            controller::run(control_control, SEEK_STEP_US, SEEK_STEP_US, duration_us);
        }));

        Ok(())
    }

    /// Blocks until all four threads exit on their own (end of stream, or
    /// an external `stop()`/SIGINT).
    pub fn wait(&mut self) {
        for handle in self.threads.drain(..) {
            let _ = handle.join();
        }
    }

    /// Signals all threads to exit and joins them. Returns once every
    /// thread has actually stopped — bounded by the controller's ~100ms
    /// poll quantum, the presenter's 10ms pause-poll, and the queues'
    /// 20ms condvar wait ticks.
    pub fn stop(&mut self) {
        if !self.control.running.swap(false, Ordering::AcqRel) {
            return;
        }
        self.control.paused.store(false, Ordering::Release);
        self.packet_queue.clear();
        self.frame_queue.clear();
        self.wait();
    }

    pub fn pause_resume(&self) {
        self.control.toggle_paused();
        self.control.reset_time_request.store(true, Ordering::Release);
    }

    pub fn seek_forward(&self, delta_us: i64) {
        self.control.reset_time_request.store(true, Ordering::Release);
        let current = self.control.current_pts_us.load(Ordering::Acquire);
        let next = (current + delta_us).clamp(0, self.duration_us.max(0));
        self.control.request_seek(next);
    }

    pub fn seek_backward(&self, delta_us: i64) {
        self.control.reset_time_request.store(true, Ordering::Release);
        let current = self.control.current_pts_us.load(Ordering::Acquire);
        let next = (current - delta_us).clamp(0, self.duration_us.max(0));
        self.control.request_seek(next);
    }

    /// Adjusts playback speed by `delta` (floored at 0.1x) and returns the
    /// new speed, mirroring the original's `setSpeed` return value.
    pub fn set_speed(&self, delta: f64) -> f64 {
        self.control.reset_time_request.store(true, Ordering::Release);
        let next = self.control.speed_factor() + delta;
        self.control.set_speed_factor(next);
        self.control.speed_factor()
    }

    pub fn current_pts_us(&self) -> i64 {
        self.control.current_pts_us.load(Ordering::Acquire)
    }

    pub fn is_running(&self) -> bool {
        self.control.running.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_speed_floors_at_one_tenth_and_returns_new_value() {
        let control = ControlState::new();
        control.set_speed_factor(0.15);
        control.set_speed_factor(control.speed_factor() - 1.0);
        assert_eq!(control.speed_factor(), 0.1);
    }
}
