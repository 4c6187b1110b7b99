//! The out-of-core display collaborator: a real SPI/GPIO panel driver
//! narrowed to exactly the surface the Presenter needs
//! ([`tftvid_core::DisplayBlit`]), plus a headless recording double for
//! tests and `--dry-run`.

pub mod null_panel;
pub mod spi_panel;

pub use null_panel::NullPanel;
pub use spi_panel::SpiPanel;
