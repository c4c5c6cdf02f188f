use std::path::Path;

use anyhow::{Context, Result};
use image::RgbaImage;

use crate::color::Color;

/// Ordered list of distinct colors pulled from an image, first-seen order.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Color> + '_ {
        self.colors.iter().copied()
    }

    /// True if any accepted color passes the grayscale proximity test
    /// against `color`. Always compares against accepted entries directly,
    /// never an average.
    fn contains_similar(&self, color: Color) -> bool {
        self.colors.iter().any(|c| c.is_similar(color))
    }
}

#[cfg(test)]
impl FromIterator<Color> for Palette {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        Self {
            colors: iter.into_iter().collect(),
        }
    }
}

/// Decode an image file to RGBA at full resolution.
///
/// The scan visits pixels in row-major order, so no resizing happens here:
/// downscaling would change which colors are seen first.
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).with_context(|| {
        if !path.exists() {
            format!("file not found: {}", path.display())
        } else {
            format!(
                "unsupported or corrupt image: {}. Supported formats: PNG, JPEG, WebP, BMP, TIFF, GIF",
                path.display()
            )
        }
    })?;
    Ok(img.to_rgba8())
}

/// Scan the image top-to-bottom, left-to-right, collecting colors that are
/// not similar to any color accepted so far.
///
/// Stops as soon as `max_colors` have been accepted, so the result is the
/// first `max_colors` distinct-by-luminance colors in scan order, not the
/// most representative colors of the whole image.
pub fn extract_palette(image: &RgbaImage, max_colors: usize) -> Palette {
    let mut palette = Palette::default();

    for pixel in image.pixels() {
        if palette.len() >= max_colors {
            break;
        }
        let [r, g, b, a] = pixel.0;
        let color = Color::new(a, r, g, b);
        if !palette.contains_similar(color) {
            palette.colors.push(color);
        }
    }

    palette
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    fn solid_image(width: u32, height: u32, rgb: [u8; 3]) -> RgbaImage {
        RgbaImage::from_fn(width, height, |_, _| {
            image::Rgba([rgb[0], rgb[1], rgb[2], 255])
        })
    }

    // --- load_image tests ---

    #[test]
    fn load_png_keeps_dimensions() {
        let path = fixture_path("8x4_load.png");
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        solid_image(8, 4, [128, 128, 128]).save(&path).unwrap();

        let img = load_image(&path).unwrap();
        assert_eq!(img.width(), 8);
        assert_eq!(img.height(), 4);
    }

    #[test]
    fn load_file_not_found() {
        let result = load_image(Path::new("/nonexistent/image.png"));
        let err = result.unwrap_err().to_string();
        assert!(
            err.contains("file not found") || err.contains("No such file"),
            "expected file-not-found error, got: {err}"
        );
    }

    #[test]
    fn load_unsupported_format() {
        let path = fixture_path("not_an_image.txt");
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, "this is not an image").unwrap();

        let result = load_image(&path);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(
            err.contains("unsupported") || err.contains("Unsupported"),
            "expected unsupported format error, got: {err}"
        );
    }

    // --- extract_palette tests ---

    #[test]
    fn uniform_image_yields_one_color() {
        let img = solid_image(16, 16, [200, 50, 50]);
        let palette = extract_palette(&img, 64);
        assert_eq!(palette.len(), 1);
        assert_eq!(palette.get(0), Some(Color::opaque(200, 50, 50)));
    }

    #[test]
    fn empty_image_yields_empty_palette() {
        let img = RgbaImage::new(0, 0);
        let palette = extract_palette(&img, 64);
        assert!(palette.is_empty());
    }

    #[test]
    fn zero_max_colors_yields_empty_palette() {
        let img = solid_image(4, 4, [10, 20, 30]);
        let palette = extract_palette(&img, 0);
        assert!(palette.is_empty());
    }

    #[test]
    fn scan_order_is_row_major() {
        // Row 0: red, red. Row 1: blue, green.
        let img = RgbaImage::from_fn(2, 2, |x, y| match (x, y) {
            (_, 0) => image::Rgba([255, 0, 0, 255]),
            (0, 1) => image::Rgba([0, 0, 255, 255]),
            _ => image::Rgba([0, 255, 0, 255]),
        });

        let palette = extract_palette(&img, 64);
        assert_eq!(palette.len(), 3);
        assert_eq!(palette.get(0), Some(Color::opaque(255, 0, 0)));
        assert_eq!(palette.get(1), Some(Color::opaque(0, 0, 255)));
        assert_eq!(palette.get(2), Some(Color::opaque(0, 255, 0)));
    }

    #[test]
    fn caps_at_max_colors() {
        // A 16x16 gray ramp has 256 distinct luminance values.
        let img = RgbaImage::from_fn(16, 16, |x, y| {
            let v = (y * 16 + x) as u8;
            image::Rgba([v, v, v, 255])
        });

        let palette = extract_palette(&img, 5);
        assert_eq!(palette.len(), 5);
    }

    #[test]
    fn stops_scanning_once_full() {
        // First two pixels fill the palette; the rest would add more
        // distinct colors if the scan kept going.
        let img = RgbaImage::from_fn(8, 1, |x, _| {
            let v = (x as u8) * 30;
            image::Rgba([v, v, v, 255])
        });

        let palette = extract_palette(&img, 2);
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.get(0), Some(Color::opaque(0, 0, 0)));
        assert_eq!(palette.get(1), Some(Color::opaque(30, 30, 30)));
    }

    #[test]
    fn similar_colors_are_deduplicated() {
        // Gray 100 and gray 102 differ by under 1% of 255.
        let img = RgbaImage::from_fn(2, 1, |x, _| {
            let v = if x == 0 { 100 } else { 102 };
            image::Rgba([v, v, v, 255])
        });

        let palette = extract_palette(&img, 64);
        assert_eq!(palette.len(), 1);
        assert_eq!(palette.get(0), Some(Color::opaque(100, 100, 100)));
    }

    #[test]
    fn comparison_is_against_accepted_entries_not_running_average() {
        // Grays 100, 102, 104: 102 is within threshold of accepted 100 and
        // is rejected; 104 is 4 units from 100, beyond threshold, and is
        // accepted even though it is within threshold of the rejected 102.
        let img = RgbaImage::from_fn(3, 1, |x, _| {
            let v = 100 + (x as u8) * 2;
            image::Rgba([v, v, v, 255])
        });

        let palette = extract_palette(&img, 64);
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.get(0), Some(Color::opaque(100, 100, 100)));
        assert_eq!(palette.get(1), Some(Color::opaque(104, 104, 104)));
    }

    #[test]
    fn alpha_is_preserved_on_accepted_colors() {
        let img = RgbaImage::from_fn(1, 1, |_, _| image::Rgba([10, 20, 30, 77]));
        let palette = extract_palette(&img, 64);
        assert_eq!(palette.get(0), Some(Color::new(77, 10, 20, 30)));
    }
}
