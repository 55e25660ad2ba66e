use super::TextMeasurer;

/// Fallback text measurer.
///
/// This implementation does not rely on any font engine.
/// It uses a simple heuristic based on font size and character count.
/// Intended for testing, bring-up, and environments without font support.
#[derive(Debug, Clone, Copy)]
pub struct FallbackTextMeasurer {
    /// Average glyph advance as a fraction of the font size
    pub char_width_ratio: f32,
    /// Line height as a multiple of the font size
    pub line_height_ratio: f32,
}

impl Default for FallbackTextMeasurer {
    fn default() -> Self {
        Self {
            char_width_ratio: 0.6,
            line_height_ratio: 1.2,
        }
    }
}

impl TextMeasurer for FallbackTextMeasurer {
    fn measure_width(&self, text: &str, _family: &str, size: u32) -> u32 {
        // 改行は考慮しない（一行テキストのみ）
        let chars = text.chars().filter(|c| !c.is_control()).count() as f32;
        (chars * size as f32 * self.char_width_ratio).ceil() as u32
    }

    fn measure_line_height(&self, _family: &str, size: u32) -> u32 {
        (size as f32 * self.line_height_ratio).ceil() as u32
    }
}
