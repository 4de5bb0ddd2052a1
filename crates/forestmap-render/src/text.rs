//! Label fonts and text measurement.
//!
//! Layout sizes site boxes from measured label widths, never from guesses, so
//! the measurer is a hard dependency of the layout pass. The deterministic
//! measurer keeps layouts machine-independent for tests and headless output;
//! an embedder with a real rasterizer substitutes its own implementation.

use unicode_width::UnicodeWidthStr;

/// The fixed set of label font tiers. Which tier a label uses is decided per
/// frame by the zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontSize {
    Huge,
    Big,
    Small,
}

impl FontSize {
    /// Pixel height of the tier.
    pub fn px(self) -> f64 {
        match self {
            FontSize::Huge => 60.0,
            FontSize::Big => 36.0,
            FontSize::Small => 18.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
}

pub trait TextMeasurer {
    fn measure(&self, text: &str, font: FontSize) -> TextMetrics;
}

/// Width estimation from terminal cell counts: monospace-like, deterministic
/// across platforms.
#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer {
    /// Advance per cell as a fraction of the font pixel size; 0 means the
    /// default of 0.6.
    pub char_width_factor: f64,
    /// Line height as a fraction of the font pixel size; 0 means the default
    /// of 1.2.
    pub line_height_factor: f64,
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, font: FontSize) -> TextMetrics {
        let char_width_factor = if self.char_width_factor == 0.0 {
            0.6
        } else {
            self.char_width_factor
        };
        let line_height_factor = if self.line_height_factor == 0.0 {
            1.2
        } else {
            self.line_height_factor
        };

        let cells = text.width() as f64;
        TextMetrics {
            width: cells * font.px() * char_width_factor,
            height: font.px() * line_height_factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_scales_with_cell_count_and_font_tier() {
        let m = DeterministicTextMeasurer::default();
        let short = m.measure("dc01", FontSize::Huge);
        let long = m.measure("dc01.corp.example.com", FontSize::Huge);
        assert!(long.width > short.width);

        let small = m.measure("dc01", FontSize::Small);
        assert!(small.width < short.width);
        assert_eq!(short.height, 72.0);
    }

    #[test]
    fn empty_text_has_zero_width_but_a_line_height() {
        let m = DeterministicTextMeasurer::default();
        let metrics = m.measure("", FontSize::Big);
        assert_eq!(metrics.width, 0.0);
        assert!(metrics.height > 0.0);
    }

    #[test]
    fn wide_glyphs_count_as_two_cells() {
        let m = DeterministicTextMeasurer::default();
        let ascii = m.measure("ab", FontSize::Small);
        let cjk = m.measure("東京", FontSize::Small);
        assert_eq!(cjk.width, ascii.width * 2.0);
    }
}
