/// A rescaled, packed RGB565 (big-endian) video frame ready for the
/// Presenter. `stride` is the decoder's row pitch in bytes, which can
/// exceed `width * 2` due to alignment padding — the Presenter is what
/// strips that padding out when it blits row by row.
///
/// `pts_us` is `None` when none of {frame pts, best-effort timestamp,
/// packet pts} were defined for this frame — the Presenter must skip
/// such a frame rather than blit it without a timing anchor.
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    pub pts_us: Option<i64>,
    pub width: u32,
    pub height: u32,
    pub stride: usize,
    pub pixels: Vec<u8>,
}

impl DecodedFrame {
    pub const BYTES_PER_PIXEL: usize = 2;

    /// Byte offset of the start of row `y` within `pixels`.
    pub fn row_offset(&self, y: u32) -> usize {
        y as usize * self.stride
    }
}
