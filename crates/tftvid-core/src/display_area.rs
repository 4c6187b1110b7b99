/// Panel rotation, matching the four orientations the ST7735S MADCTL
/// register supports. The byte-level register values live with the
/// panel driver; this crate only needs to know whether width/height are
/// swapped relative to the native panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    PortraitInverted,
    Landscape,
    LandscapeInverted,
}

impl Orientation {
    fn swaps_axes(self) -> bool {
        matches!(self, Orientation::Landscape | Orientation::LandscapeInverted)
    }
}

/// The centered sub-rectangle of the panel that a decoded frame is
/// scaled to fit, aspect-preserving. `x_start`/`y_start`/`x_end`/`y_end`
/// are panel-local pixel coordinates (end-exclusive); `width`/`height`
/// are the scaled frame's dimensions, i.e. `x_end - x_start` and
/// `y_end - y_start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayArea {
    pub x_start: u32,
    pub x_end: u32,
    pub y_start: u32,
    pub y_end: u32,
    pub width: u32,
    pub height: u32,
}

impl DisplayArea {
    /// Computes the centered, aspect-preserving fit of a `src_w` x
    /// `src_h` source frame inside a panel whose *native* (unrotated)
    /// dimensions are `panel_w` x `panel_h`. `orientation` swaps the
    /// effective width/height before fitting, matching the original
    /// source's `rangeAdapt` behavior for landscape rotations.
    pub fn compute(panel_w: u32, panel_h: u32, src_w: u32, src_h: u32, orientation: Orientation) -> DisplayArea {
        let (eff_w, eff_h) = if orientation.swaps_axes() {
            (panel_w.max(panel_h), panel_w.min(panel_h))
        } else {
            (panel_w.min(panel_h), panel_w.max(panel_h))
        };

        let scale = (eff_w as f64 / src_w as f64).min(eff_h as f64 / src_h as f64);
        let mut out_w = (src_w as f64 * scale).round() as u32;
        let mut out_h = (src_h as f64 * scale).round() as u32;
        out_w = out_w.clamp(2, eff_w) & !1;
        out_h = out_h.clamp(2, eff_h) & !1;

        let x_start = (eff_w - out_w) / 2;
        let y_start = (eff_h - out_h) / 2;

        DisplayArea {
            x_start,
            x_end: x_start + out_w,
            y_start,
            y_end: y_start + out_h,
            width: out_w,
            height: out_h,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_4_3_source_into_landscape_panel_centered() {
        // native panel is 128x160 portrait; landscape rotates it to 160x128.
        let area = DisplayArea::compute(128, 160, 320, 240, Orientation::Landscape);
        assert_eq!(area.width, 160);
        assert_eq!(area.height, 120);
        assert_eq!(area.x_start, 0);
        assert_eq!(area.x_end, 160);
        assert_eq!(area.y_start, 4);
        assert_eq!(area.y_end, 124);
    }

    #[test]
    fn fits_square_source_into_portrait_panel_centered() {
        let area = DisplayArea::compute(128, 160, 240, 240, Orientation::Portrait);
        assert_eq!(area.width, 128);
        assert_eq!(area.height, 128);
        assert_eq!(area.x_start, 0);
        assert_eq!(area.y_start, 16);
        assert_eq!(area.y_end, 144);
    }

    #[test]
    fn inverted_orientations_swap_axes_like_their_upright_counterpart() {
        let a = DisplayArea::compute(128, 160, 320, 240, Orientation::Landscape);
        let b = DisplayArea::compute(128, 160, 320, 240, Orientation::LandscapeInverted);
        assert_eq!(a, b);
    }
}
