// crates/tftvid-cli/src/main.rs
//
// CLI entry point: argument parsing, logging setup, SIGINT → graceful
// stop wiring. The teacher (velocut) is a GUI app with no equivalent
// layer; this follows the pack's clap+anyhow CLI idiom instead (see
// DESIGN.md).

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use tftvid_core::Orientation;
use tftvid_display::{NullPanel, SpiPanel};
use tftvid_media::Player;

/// Plays a video file on an SPI-attached ST7735S color LCD.
#[derive(Parser)]
#[command(name = "tftvid", version, about)]
struct Cli {
    /// Video file to play.
    path: PathBuf,

    /// Panel rotation.
    #[arg(long, value_enum, default_value_t = OrientationArg::Landscape)]
    orientation: OrientationArg,

    /// Skip hardware entirely and run against a headless panel —
    /// useful for exercising the pipeline off-board.
    #[arg(long)]
    dry_run: bool,

    #[arg(long, default_value = "/dev/spidev3.0")]
    spi_dev: String,

    #[arg(long, default_value = "gpiochip3")]
    gpio_chip_rst: String,

    #[arg(long, default_value_t = 8)]
    gpio_offset_rst: u32,

    #[arg(long, default_value = "gpiochip3")]
    gpio_chip_dc: String,

    #[arg(long, default_value_t = 17)]
    gpio_offset_dc: u32,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    PortraitInverted,
    Landscape,
    LandscapeInverted,
}

impl From<OrientationArg> for Orientation {
    fn from(a: OrientationArg) -> Orientation {
        match a {
            OrientationArg::Portrait => Orientation::Portrait,
            OrientationArg::PortraitInverted => Orientation::PortraitInverted,
            OrientationArg::Landscape => Orientation::Landscape,
            OrientationArg::LandscapeInverted => Orientation::LandscapeInverted,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // `Cli::parse()` would exit(2) on a usage error via clap's default
    // behavior; spec.md §6 wants exit code 1 for bad usage (reserving 0
    // for `--help`/`--version`, which clap also routes through here).
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(
            e.kind(),
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
        ) => {
            e.exit();
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let panel: Box<dyn tftvid_core::DisplayBlit> = if cli.dry_run {
        log::info!("--dry-run: using a headless panel, no SPI/GPIO access");
        Box::new(NullPanel::new(128, 160))
    } else {
        Box::new(SpiPanel::open(
            &cli.spi_dev,
            &cli.gpio_chip_rst,
            cli.gpio_offset_rst,
            &cli.gpio_chip_dc,
            cli.gpio_offset_dc,
        )?)
    };

    log::info!("loading {}", cli.path.display());
    let mut player = Player::load(&cli.path, panel, cli.orientation.into())?;

    let term = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&term))?;

    player.play()?;
    log::info!("playing — space: pause, [ ]: speed, arrows: seek ±5s, Ctrl-C: quit");

    while player.is_running() && !term.load(Ordering::Relaxed) {
        std::thread::sleep(Duration::from_millis(100));
    }

    if term.load(Ordering::Relaxed) {
        log::info!("received interrupt, stopping");
        player.stop();
    } else {
        player.wait();
    }

    Ok(())
}
