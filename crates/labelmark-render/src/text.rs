use crate::font::FontDescriptor;
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextExtent {
    pub width: f64,
    pub height: f64,
    pub line_count: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum MeasureError {
    #[error("text measurement failed: {message}")]
    Backend { message: String },
}

pub trait TextMeasurer {
    fn measure(&self, font: &FontDescriptor, text: &str) -> Result<TextExtent, MeasureError>;
}

/// Font-independent estimate: every display column is `char_width_factor` em wide and every
/// line is `line_height_factor` em tall.
#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl DeterministicTextMeasurer {
    /// Never empty: an empty text is one empty line.
    pub fn normalized_text_lines(text: &str) -> Vec<&str> {
        text.split('\n').collect()
    }
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, font: &FontDescriptor, text: &str) -> Result<TextExtent, MeasureError> {
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

        let lines = Self::normalized_text_lines(text);
        let font_size = font.size_px().max(1.0);
        let mut max_columns = 0usize;
        for line in &lines {
            max_columns = max_columns.max(line.trim_end_matches('\r').width());
        }

        let width = max_columns as f64 * font_size * char_width_factor;
        let height = lines.len() as f64 * font_size * line_height_factor;
        Ok(TextExtent {
            width,
            height,
            line_count: lines.len(),
        })
    }
}
