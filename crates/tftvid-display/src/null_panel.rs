// crates/tftvid-display/src/null_panel.rs
//
// Headless DisplayBlit used by tests and --dry-run: records every write
// instead of touching hardware.

use tftvid_core::{DisplayArea, DisplayBlit, Orientation};

/// Records blits into an in-memory buffer instead of driving real SPI
/// hardware. `last_frame` always holds the most recently completed
/// write; `frames_written` counts completed frames for assertions.
#[derive(Default)]
pub struct NullPanel {
    native_width: u32,
    native_height: u32,
    pub last_frame: Vec<u8>,
    pub frames_written: usize,
    in_progress: Vec<u8>,
}

impl NullPanel {
    pub fn new(native_width: u32, native_height: u32) -> Self {
        NullPanel {
            native_width,
            native_height,
            ..Default::default()
        }
    }
}

impl DisplayBlit for NullPanel {
    fn range_adapt(&mut self, src_w: u32, src_h: u32, orientation: Orientation) -> anyhow::Result<DisplayArea> {
        Ok(DisplayArea::compute(self.native_width, self.native_height, src_w, src_h, orientation))
    }

    fn start_write(&mut self) -> anyhow::Result<()> {
        self.in_progress.clear();
        Ok(())
    }

    fn write_data(&mut self, data: &[u8]) -> anyhow::Result<()> {
        self.in_progress.extend_from_slice(data);
        self.last_frame = self.in_progress.clone();
        self.frames_written += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_adapt_matches_standalone_computation() {
        let mut panel = NullPanel::new(128, 160);
        let area = panel.range_adapt(320, 240, Orientation::Landscape).unwrap();
        assert_eq!(area.width, 160);
        assert_eq!(area.height, 120);
    }

    #[test]
    fn write_data_accumulates_within_a_frame_and_counts_frames() {
        let mut panel = NullPanel::new(128, 160);
        panel.start_write().unwrap();
        panel.write_data(&[1, 2, 3]).unwrap();
        panel.write_data(&[4, 5]).unwrap();
        assert_eq!(panel.last_frame, vec![1, 2, 3, 4, 5]);
        assert_eq!(panel.frames_written, 2);

        panel.start_write().unwrap();
        panel.write_data(&[9]).unwrap();
        assert_eq!(panel.last_frame, vec![9]);
        assert_eq!(panel.frames_written, 3);
    }
}
