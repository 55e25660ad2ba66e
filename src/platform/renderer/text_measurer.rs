use crate::engine::bridge::text::{TextMeasureError, TextMeasurer};
use crate::platform::font::ResolvedFont;
use fontdue::Font as FontDue;

/// CSS reference pixel density
const REFERENCE_DPI: f32 = 96.0;
const POINTS_PER_INCH: f32 = 72.0;

/// Points → physical pixels.
///
/// Computed once from the monitor's scale factor before any measuring or
/// rendering happens, then shared by the measurer and the rasterizer so the
/// two agree on every size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayScale {
    pub pixels_per_point: f32,
}

impl DisplayScale {
    pub fn from_scale_factor(scale_factor: f64) -> Self {
        let scale_factor = if scale_factor.is_finite() && scale_factor > 0.0 {
            scale_factor as f32
        } else {
            1.0
        };
        Self {
            pixels_per_point: scale_factor * REFERENCE_DPI / POINTS_PER_INCH,
        }
    }

    /// 1 pt = 1 px
    pub fn identity() -> Self {
        Self {
            pixels_per_point: 1.0,
        }
    }

    pub fn to_pixels(&self, points: u32) -> f32 {
        points as f32 * self.pixels_per_point
    }
}

impl Default for DisplayScale {
    fn default() -> Self {
        Self::from_scale_factor(1.0)
    }
}

/// テキスト計測のプラットフォーム側実装
///
/// Bound to a single resolved face; the `family` argument of the trait is
/// only used for logging.
pub struct PlatformTextMeasurer {
    font: FontDue,
    family: String,
    scale: DisplayScale,
}

impl PlatformTextMeasurer {
    pub fn new(font: &ResolvedFont, scale: DisplayScale) -> Result<Self, TextMeasureError> {
        let settings = fontdue::FontSettings {
            collection_index: font.index,
            ..fontdue::FontSettings::default()
        };
        let parsed = FontDue::from_bytes(&font.data[..], settings)
            .map_err(|e| TextMeasureError::FontLoadError(format!("{}: {}", font.family, e)))?;
        Ok(Self {
            font: parsed,
            family: font.family.clone(),
            scale,
        })
    }

    /// バイト列からフォントを読み込んで初期化
    pub fn from_bytes(
        family: &str,
        bytes: Vec<u8>,
        scale: DisplayScale,
    ) -> Result<Self, TextMeasureError> {
        let font = FontDue::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| TextMeasureError::FontLoadError(format!("{family}: {e}")))?;
        Ok(Self {
            font,
            family: family.to_string(),
            scale,
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn scale(&self) -> DisplayScale {
        self.scale
    }

    /// モニタ移動などで倍率が変わったとき
    pub fn set_scale(&mut self, scale: DisplayScale) {
        self.scale = scale;
    }

    pub fn font(&self) -> &FontDue {
        &self.font
    }

    /// Font size in points → rasterization size in pixels.
    pub fn pixel_size(&self, size: u32) -> f32 {
        self.scale.to_pixels(size)
    }

    /// 一行分の送り幅（カーニング込み、浮動小数）
    pub fn advance_width_px(&self, text: &str, px: f32) -> f32 {
        text_advance(&self.font, text, px)
    }

    /// ascent - descent + line_gap
    pub fn line_height_px(&self, px: f32) -> f32 {
        line_height(&self.font, px)
    }
}

fn text_advance(font: &FontDue, text: &str, px: f32) -> f32 {
    let mut width = 0.0;
    let mut prev: Option<char> = None;
    for ch in text.chars() {
        if ch.is_control() {
            continue;
        }
        if let Some(p) = prev {
            width += font.horizontal_kern(p, ch, px).unwrap_or(0.0);
        }
        width += font.metrics(ch, px).advance_width;
        prev = Some(ch);
    }
    width.max(0.0)
}

fn line_height(font: &FontDue, px: f32) -> f32 {
    match font.horizontal_line_metrics(px) {
        Some(m) => m.ascent - m.descent + m.line_gap,
        // メトリクスが無いフォントは経験値で
        None => px * 1.2,
    }
}

impl TextMeasurer for PlatformTextMeasurer {
    fn measure_width(&self, text: &str, _family: &str, size: u32) -> u32 {
        self.advance_width_px(text, self.pixel_size(size)).ceil() as u32
    }

    fn measure_line_height(&self, _family: &str, size: u32) -> u32 {
        self.line_height_px(self.pixel_size(size)).ceil().max(0.0) as u32
    }
}
