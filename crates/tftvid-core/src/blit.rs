use crate::display_area::{DisplayArea, Orientation};

/// The narrow surface the Presenter needs from a panel driver. Deliberately
/// excludes the panel's init sequence, gamma tables, and MADCTL wiring —
/// those are `tftvid-display`'s concern, not the pipeline's; the Presenter
/// only ever needs to ask "what's my draw rectangle" and "accept these
/// bytes".
pub trait DisplayBlit: Send {
    /// Computes (and, for hardware panels, programs) the centered draw
    /// rectangle for a `src_w` x `src_h` frame at the given orientation.
    fn range_adapt(&mut self, src_w: u32, src_h: u32, orientation: Orientation) -> anyhow::Result<DisplayArea>;

    /// Begins a pixel-data write to the rectangle last set by
    /// `range_adapt`.
    fn start_write(&mut self) -> anyhow::Result<()>;

    /// Streams packed RGB565 pixel bytes for the current write. May be
    /// called multiple times per frame; implementations that have a
    /// maximum transfer size chunk internally.
    fn write_data(&mut self, data: &[u8]) -> anyhow::Result<()>;
}
