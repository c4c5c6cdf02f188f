use anyhow::Result;
use clap::Parser;

use quickpalette::cli::Args;
use quickpalette::clipboard::SystemClipboard;
use quickpalette::pipeline::assign::SwatchGrid;
use quickpalette::pipeline::extract::{extract_palette, load_image};
use quickpalette::tui::{self, App};

fn main() -> Result<()> {
    let args = Args::parse();

    let (rows, cols) = (args.rows as usize, args.cols as usize);
    let mut grid = if args.demo {
        SwatchGrid::with_demo_colors(rows, cols)
    } else {
        SwatchGrid::new(rows, cols)
    };

    // A startup image is scanned before the terminal is touched, so decode
    // failures here are ordinary fatal errors rather than status-line ones.
    if let Some(path) = &args.image {
        let image = load_image(path)?;
        let palette = extract_palette(&image, grid.capacity());
        grid.bind(&palette);
    }

    let app = App::new(grid, SystemClipboard::new()?);
    tui::run(app)
}
