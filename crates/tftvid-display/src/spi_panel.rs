// crates/tftvid-display/src/spi_panel.rs
//
// Real SPI/GPIO-backed panel driver, narrowed to exactly the surface
// `DisplayBlit` needs. Grounded in `original_source/include/st7735s.hpp`'s
// public surface and its Raspberry Pi wiring ("/dev/spidevN.M",
// "gpiochipN" + line offset for RST/DC) — but deliberately stops short of
// the full gamma-table/MADCTL/sleep-out init sequence, which is the
// display driver's own concern and out of scope here (spec.md names it
// explicitly as a narrow, out-of-core collaborator).

use std::io::Write;

use gpio_cdev::{Chip, LineHandle, LineRequestFlags};
use spidev::{SpiModeFlags, Spidev, SpidevOptions};

use tftvid_core::{DisplayArea, DisplayBlit, Orientation};

/// `maxSPIChunkSize` in the original: the SPI controller's DMA transfer
/// limit, so a full-frame write gets split into 4 KiB chunks.
const MAX_SPI_CHUNK_BYTES: usize = 4096;

/// Column/row address set + memory write, the minimal ST7735S command
/// trio needed to target a write at a specific rectangle. The rest of
/// the command set (gamma, MADCTL, sleep-out, ...) is out of scope.
const CMD_CASET: u8 = 0x2A;
const CMD_RASET: u8 = 0x2B;
const CMD_RAMWR: u8 = 0x2C;

pub struct SpiPanel {
    spi: Spidev,
    gpio_dc: LineHandle,
    native_width: u32,
    native_height: u32,
}

impl SpiPanel {
    /// Opens the SPI device and DC/RST GPIO lines. `spi_dev` should look
    /// like `/dev/spidev3.0`; `gpio_chip_*` like `gpiochip3`, matching the
    /// original's constructor arguments.
    pub fn open(
        spi_dev: &str,
        gpio_chip_rst: &str,
        gpio_offset_rst: u32,
        gpio_chip_dc: &str,
        gpio_offset_dc: u32,
    ) -> anyhow::Result<Self> {
        let mut spi = Spidev::open(spi_dev)?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(32_000_000)
            .mode(SpiModeFlags::SPI_MODE_0)
            .build();
        spi.configure(&options)?;

        let gpio_rst = Chip::new(gpio_chip_rst)?
            .get_line(gpio_offset_rst)?
            .request(LineRequestFlags::OUTPUT, 0, "tftvid-rst")?;
        let gpio_dc = Chip::new(gpio_chip_dc)?
            .get_line(gpio_offset_dc)?
            .request(LineRequestFlags::OUTPUT, 0, "tftvid-dc")?;

        // Hardware reset pulse.
        gpio_rst.set_value(0)?;
        std::thread::sleep(std::time::Duration::from_millis(10));
        gpio_rst.set_value(1)?;
        std::thread::sleep(std::time::Duration::from_millis(120));

        Ok(SpiPanel {
            spi,
            gpio_dc,
            native_width: 128,
            native_height: 160,
        })
    }

    fn write_cmd(&mut self, cmd: u8) -> anyhow::Result<()> {
        self.gpio_dc.set_value(0)?;
        self.spi.write_all(&[cmd])?;
        Ok(())
    }

    fn write_raw_data(&mut self, data: &[u8]) -> anyhow::Result<()> {
        self.gpio_dc.set_value(1)?;
        for chunk in data.chunks(MAX_SPI_CHUNK_BYTES) {
            self.spi.write_all(chunk)?;
        }
        Ok(())
    }

    fn set_window(&mut self, area: DisplayArea) -> anyhow::Result<()> {
        let x_end = area.x_end.saturating_sub(1);
        let y_end = area.y_end.saturating_sub(1);

        self.write_cmd(CMD_CASET)?;
        self.write_raw_data(&[0, area.x_start as u8, 0, x_end as u8])?;

        self.write_cmd(CMD_RASET)?;
        self.write_raw_data(&[0, area.y_start as u8, 0, y_end as u8])?;

        Ok(())
    }
}

impl DisplayBlit for SpiPanel {
    fn range_adapt(&mut self, src_w: u32, src_h: u32, orientation: Orientation) -> anyhow::Result<DisplayArea> {
        let area = DisplayArea::compute(self.native_width, self.native_height, src_w, src_h, orientation);
        self.set_window(area)?;
        Ok(area)
    }

    fn start_write(&mut self) -> anyhow::Result<()> {
        self.write_cmd(CMD_RAMWR)
    }

    fn write_data(&mut self, data: &[u8]) -> anyhow::Result<()> {
        self.write_raw_data(data)
    }
}
