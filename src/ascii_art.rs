//! # ASCII Art Module
//!
//! Converts an image into rows of characters picked from a ramp by
//! luminance, bounded so the result always fits in one chat message.
//!
//! ## Algorithm
//!
//! 1. Convert to 8-bit luminance
//! 2. Derive the row count from the original aspect ratio, squashed by the
//!    glyph height factor (at least one row)
//! 3. Nearest-neighbour resize to exactly `width` × `rows`
//! 4. Map each pixel `p` to `ramp[p * len / 256]`
//! 5. Emit rows of exactly `width` characters, each ending in `\n`, keeping
//!    only as many rows as the message ceiling allows

use image::imageops::{self, FilterType};
use image::DynamicImage;
use tracing::debug;

use crate::config::AsciiSettings;
use crate::errors::BotError;

/// Built-in ramp, darkest to lightest
pub const DEFAULT_RAMP: &str = "@%#*+=-:. ";

/// Ordered characters from darkest to lightest, never empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ramp(Vec<char>);

impl Ramp {
    /// Build a ramp from its characters, `None` when there are none
    pub fn new(chars: &str) -> Option<Self> {
        let chars: Vec<char> = chars.chars().collect();
        (!chars.is_empty()).then_some(Self(chars))
    }

    /// Ramp built from text typed by a user: a trailing space is appended so
    /// the lightest level is always blank and the ramp is never empty.
    pub fn from_user_text(text: &str) -> Self {
        let mut chars: Vec<char> = text.chars().collect();
        chars.push(' ');
        Self(chars)
    }

    /// Number of quantization levels
    pub fn levels(&self) -> usize {
        self.0.len()
    }

    /// Quantization index of an intensity: `floor(p * len / 256)`
    pub fn index(&self, intensity: u8) -> usize {
        (intensity as usize * self.0.len() / 256).min(self.0.len() - 1)
    }

    /// Character for an intensity
    pub fn glyph(&self, intensity: u8) -> char {
        self.0[self.index(intensity)]
    }

    pub fn as_string(&self) -> String {
        self.0.iter().collect()
    }
}

impl Default for Ramp {
    fn default() -> Self {
        Self(DEFAULT_RAMP.chars().collect())
    }
}

/// Largest number of rows whose text still fits the message ceiling
pub fn max_rows(settings: &AsciiSettings) -> usize {
    let line = settings.width as usize + 1;
    let max_chars = settings.message_limit.saturating_sub(line);
    max_chars / line
}

/// Number of rows the image is resized to before truncation
pub fn target_height(width: u32, height: u32, settings: &AsciiSettings) -> u32 {
    let aspect_ratio = height as f64 / width as f64;
    let rows = (aspect_ratio * settings.width as f64 * settings.height_factor).floor();
    (rows as u32).max(1)
}

/// Render an image as ASCII art.
///
/// Deterministic for identical input. The result has at most
/// [`max_rows`] rows of exactly `settings.width` characters.
pub fn render(image: &DynamicImage, ramp: &Ramp, settings: &AsciiSettings) -> Result<String, BotError> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(BotError::DegenerateGeometry(format!("empty image {width}x{height}")));
    }
    if settings.width == 0 {
        return Err(BotError::DegenerateGeometry("render width is zero".to_string()));
    }
    let row_limit = max_rows(settings);
    if row_limit == 0 {
        return Err(BotError::DegenerateGeometry(format!(
            "width {} leaves no room under a {}-character limit",
            settings.width, settings.message_limit
        )));
    }

    let luma = image.to_luma8();
    let rows = target_height(width, height, settings);
    let resized = imageops::resize(&luma, settings.width, rows, FilterType::Nearest);

    let kept_rows = (rows as usize).min(row_limit);
    let mut art = String::with_capacity(kept_rows * (settings.width as usize + 1));
    for y in 0..kept_rows as u32 {
        for x in 0..settings.width {
            art.push(ramp.glyph(resized.get_pixel(x, y).0[0]));
        }
        art.push('\n');
    }

    debug!(
        source_width = width,
        source_height = height,
        rows = kept_rows,
        truncated = rows as usize > kept_rows,
        "Rendered ASCII art"
    );

    Ok(art)
}

/// Wrap rendered art in a MarkdownV2 code fence no longer than `limit` characters.
///
/// Backticks and backslashes are escaped as the format requires; if escaping
/// pushes the message over the limit, whole rows are dropped from the end.
pub fn fence_markdown(art: &str, limit: usize) -> String {
    const OPEN: &str = "```\n";
    const CLOSE: &str = "\n```";

    let mut body = String::new();
    let mut used = OPEN.chars().count() + CLOSE.chars().count();

    for line in art.split_inclusive('\n') {
        let escaped = escape_code(line);
        let cost = escaped.chars().count();
        if used + cost > limit {
            break;
        }
        used += cost;
        body.push_str(&escaped);
    }

    format!("{OPEN}{body}{CLOSE}")
}

fn escape_code(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == '`' || ch == '\\' {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn test_index_bounds_for_every_intensity() {
        for ramp in [Ramp::default(), Ramp::new("#").unwrap(), Ramp::from_user_text("AB")] {
            for p in 0..=255u8 {
                assert!(ramp.index(p) < ramp.levels());
            }
            assert_eq!(ramp.index(0), 0);
            assert_eq!(ramp.index(255), ramp.levels() - 1);
        }
    }

    #[test]
    fn test_index_matches_floor_formula() {
        let ramp = Ramp::default();
        assert_eq!(ramp.index(25), 0);
        assert_eq!(ramp.index(26), 1);
        assert_eq!(ramp.index(128), 5);
    }

    #[test]
    fn test_empty_ramp_is_rejected() {
        assert_eq!(Ramp::new(""), None);
        assert_eq!(Ramp::from_user_text("").as_string(), " ");
    }

    #[test]
    fn test_max_rows_for_default_settings() {
        // (4000 - 41) / 41
        assert_eq!(max_rows(&AsciiSettings::default()), 96);
    }

    #[test]
    fn test_very_wide_image_gets_one_row() {
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(1000, 2, Luma([0])));
        let art = render(&image, &Ramp::default(), &AsciiSettings::default()).unwrap();
        assert_eq!(art, format!("{}\n", "@".repeat(40)));
    }

    #[test]
    fn test_zero_sized_image_is_degenerate() {
        let image = DynamicImage::ImageLuma8(GrayImage::new(0, 10));
        assert!(matches!(
            render(&image, &Ramp::default(), &AsciiSettings::default()),
            Err(BotError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_fence_escapes_and_respects_limit() {
        let fenced = fence_markdown("a`b\\\n", 4000);
        assert_eq!(fenced, "```\na\\`b\\\\\n\n```");

        let art = "\\\\\\\\\n".repeat(10);
        let fenced = fence_markdown(&art, 30);
        assert!(fenced.chars().count() <= 30);
        assert!(fenced.starts_with("```\n") && fenced.ends_with("\n```"));
    }
}
