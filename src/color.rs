use anyhow::{bail, Result};
use palette::Srgb;

/// Luma weights for the red, green, and blue channels (Rec. 601).
/// One formula drives both the similarity test and the label contrast choice.
const LUMA_R: f32 = 0.30;
const LUMA_G: f32 = 0.59;
const LUMA_B: f32 = 0.11;

/// Two colors count as the same swatch when their normalized luminance
/// difference is below this percentage.
pub const SIMILARITY_THRESHOLD_PCT: f32 = 1.0;

/// Alpha applied to a swatch background while the pointer hovers it,
/// composited over the black window background.
const HOVER_ALPHA: u8 = 204;

/// Core color type: 8 bits per channel, alpha included.
/// The alpha channel is carried through the pipeline but never serialized
/// into the hex form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    /// Fully opaque color from RGB components.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { a: 255, r, g, b }
    }

    /// Parse a hex color string like `#FF8800` or `ff8800`. Alpha is 255.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 {
            bail!(
                "invalid hex color: expected 6 hex digits, got {}",
                hex.len()
            );
        }
        let r = u8::from_str_radix(&hex[0..2], 16)?;
        let g = u8::from_str_radix(&hex[2..4], 16)?;
        let b = u8::from_str_radix(&hex[4..6], 16)?;
        Ok(Self::opaque(r, g, b))
    }

    /// Serialize to uppercase hex `#RRGGBB`. Alpha is dropped.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Convert to `palette::Srgb<u8>` (alpha dropped).
    pub fn to_srgb_u8(self) -> Srgb<u8> {
        Srgb::new(self.r, self.g, self.b)
    }

    /// Create an opaque color from `palette::Srgb<u8>`.
    pub fn from_srgb_u8(srgb: Srgb<u8>) -> Self {
        Self::opaque(srgb.red, srgb.green, srgb.blue)
    }

    /// Rec. 601 luma on 0-255 channel values. Range [0, 255].
    pub fn gray(self) -> f32 {
        LUMA_R * self.r as f32 + LUMA_G * self.g as f32 + LUMA_B * self.b as f32
    }

    /// Perceived brightness in [0, 1].
    pub fn brightness(self) -> f32 {
        self.gray() / 255.0
    }

    /// Grayscale proximity test: true when the normalized luminance
    /// difference is under [`SIMILARITY_THRESHOLD_PCT`].
    pub fn is_similar(self, other: Color) -> bool {
        let difference = (self.gray() - other.gray()).abs() * 100.0 / 255.0;
        difference < SIMILARITY_THRESHOLD_PCT
    }

    /// Label color readable against this background: white on dark swatches,
    /// black on light ones.
    pub fn label_color(self) -> Color {
        if self.brightness() < 0.5 {
            Color::opaque(255, 255, 255)
        } else {
            Color::opaque(0, 0, 0)
        }
    }

    /// Hover variant: this color at alpha 204/255 over the black background.
    pub fn dimmed(self) -> Color {
        let blend = |c: u8| (c as u16 * HOVER_ALPHA as u16 / 255) as u8;
        Color::opaque(blend(self.r), blend(self.g), blend(self.b))
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}
