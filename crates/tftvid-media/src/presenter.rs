// crates/tftvid-media/src/presenter.rs
//
// Presenter thread: paces decoded frames against the TimeSync clock and
// blits them through the DisplayBlit trait — ported from
// VideoPlayer::loopDisplayVideo, including the fixed per-row copy (the
// original advances the destination pointer by `heightDisplay *
// bytesPerPixel` per row instead of `widthDisplay * bytesPerPixel`,
// which corrupts every frame whose stride differs from width * 2).

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use tftvid_core::{ControlState, DecodedFrame, DisplayBlit, TimeSync};

use crate::FrameQueue;

pub fn run(
    mut panel: Box<dyn DisplayBlit>,
    frame_queue: Arc<FrameQueue>,
    control: Arc<ControlState>,
    time_sync: Arc<TimeSync>,
) {
    control.reset_time_request.store(true, Ordering::Release);

    while control.running.load(Ordering::Acquire) {
        while control.paused.load(Ordering::Acquire) {
            if !control.running.load(Ordering::Acquire) {
                return;
            }
            std::thread::sleep(Duration::from_millis(10));
        }

        let Some(frame) = frame_queue.pop_wait(&control.running, &control.flushing) else {
            break;
        };

        let Some(pts_us) = frame.pts_us else {
            eprintln!("[present] frame has no defined pts, dropping");
            continue;
        };

        control.current_pts_us.store(pts_us, Ordering::Release);

        if control.reset_time_request.swap(false, Ordering::AcqRel) {
            time_sync.reset_pts_base_us(pts_us);
        }

        let target_us = time_sync.frame_time_us(pts_us, control.speed_factor());
        let now_us = TimeSync::now_us();
        if target_us > now_us {
            std::thread::sleep(Duration::from_micros((target_us - now_us) as u64));
        }

        if let Err(e) = blit_frame(panel.as_mut(), &frame) {
            eprintln!("[present] blit failed: {e}");
            continue;
        }
    }
}

/// Copies `frame`'s stride-padded pixel buffer into a tightly packed
/// `width * height * bytes_per_pixel` buffer, row by row, then writes it
/// through `panel`. The destination offset for row `y` is
/// `y * width * bytes_per_pixel` — the corrected stride math.
fn blit_frame(panel: &mut dyn DisplayBlit, frame: &DecodedFrame) -> anyhow::Result<()> {
    let bpp = DecodedFrame::BYTES_PER_PIXEL;
    let row_bytes = frame.width as usize * bpp;
    let mut buffer = vec![0u8; row_bytes * frame.height as usize];

    if frame.stride == row_bytes {
        buffer.copy_from_slice(&frame.pixels[..buffer.len()]);
    } else {
        for y in 0..frame.height {
            let src_off = frame.row_offset(y);
            let dst_off = y as usize * row_bytes;
            buffer[dst_off..dst_off + row_bytes]
                .copy_from_slice(&frame.pixels[src_off..src_off + row_bytes]);
        }
    }

    panel.start_write()?;
    panel.write_data(&buffer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tftvid_core::display_area::{DisplayArea, Orientation};

    struct RecordingPanel {
        written: Vec<Vec<u8>>,
    }

    impl DisplayBlit for RecordingPanel {
        fn range_adapt(&mut self, src_w: u32, src_h: u32, orientation: Orientation) -> anyhow::Result<DisplayArea> {
            Ok(DisplayArea::compute(128, 160, src_w, src_h, orientation))
        }
        fn start_write(&mut self) -> anyhow::Result<()> {
            Ok(())
        }
        fn write_data(&mut self, data: &[u8]) -> anyhow::Result<()> {
            self.written.push(data.to_vec());
            Ok(())
        }
    }

    #[test]
    fn blit_frame_strips_stride_padding_advancing_by_width_not_height() {
        // 2x2 frame, stride padded to 3 pixels/row (6 bytes) so the bug
        // this guards against (advancing by height * bpp) would read the
        // wrong bytes entirely.
        let width = 2u32;
        let height = 2u32;
        let stride = 3 * DecodedFrame::BYTES_PER_PIXEL;
        let mut pixels = vec![0u8; stride * height as usize];
        // row 0: 0x11,0x22 ; row 1: 0x33,0x44 (as u16 pairs), padding zero
        pixels[0] = 0x11;
        pixels[1] = 0x11;
        pixels[2] = 0x22;
        pixels[3] = 0x22;
        pixels[stride] = 0x33;
        pixels[stride + 1] = 0x33;
        pixels[stride + 2] = 0x44;
        pixels[stride + 3] = 0x44;

        let frame = DecodedFrame { pts_us: Some(0), width, height, stride, pixels };
        let mut panel = RecordingPanel { written: vec![] };
        blit_frame(&mut panel, &frame).unwrap();

        let expected = vec![0x11, 0x11, 0x22, 0x22, 0x33, 0x33, 0x44, 0x44];
        assert_eq!(panel.written[0], expected);
    }

    #[test]
    fn run_drops_frames_with_no_defined_pts_without_blitting_them() {
        use std::sync::atomic::Ordering;
        use std::sync::Arc;
        use tftvid_core::TimeSync;

        let frame_queue: Arc<crate::FrameQueue> = Arc::new(tftvid_core::Queue::new(4));
        let control = Arc::new(ControlState::new());
        let time_sync = Arc::new(TimeSync::new());

        let undefined = DecodedFrame { pts_us: None, width: 1, height: 1, stride: 2, pixels: vec![0, 0] };
        let defined = DecodedFrame { pts_us: Some(10), width: 1, height: 1, stride: 2, pixels: vec![1, 2] };
        assert!(frame_queue.push_wait(undefined, &control.running, &control.flushing));
        assert!(frame_queue.push_wait(defined, &control.running, &control.flushing));

        let fq = frame_queue.clone();
        let c = control.clone();
        let ts = time_sync.clone();
        let handle = std::thread::spawn(move || {
            run(Box::new(RecordingPanel { written: vec![] }), fq, c, ts);
        });

        // wait for the queue to drain (both frames popped), then stop.
        while !frame_queue.is_empty() {
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        std::thread::sleep(std::time::Duration::from_millis(20));
        control.running.store(false, Ordering::Release);
        frame_queue.clear();
        handle.join().unwrap();

        assert_eq!(control.current_pts_us.load(Ordering::Acquire), 10);
    }
}
