use std::path::PathBuf;

use clap::Parser;

/// Pick colors out of an image and copy their hex codes from a swatch grid.
///
/// Drop an image file onto the running window (terminals deliver the drop
/// as a paste of the file path), then click a swatch or select it with the
/// arrow keys and press Enter to copy its hex code.
#[derive(Parser, Debug)]
#[command(name = "quickpalette", version, about)]
pub struct Args {
    /// Image to scan at startup (optional; you can also drop one later)
    pub image: Option<PathBuf>,

    /// Number of grid rows
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u16).range(1..=64))]
    pub rows: u16,

    /// Number of grid columns
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u16).range(1..=64))]
    pub cols: u16,

    /// Start with a grid of generated placeholder colors instead of an
    /// empty one
    #[arg(long)]
    pub demo: bool,
}
