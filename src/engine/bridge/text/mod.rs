//! Text measurement abstraction for font fitting and rendering.
//!
//! # Overview
//!
//! This module defines the interface between the font-fit search and
//! platform-specific text measurement implementations.
//!
//! # Responsibilities
//!
//! - Report the pixel width of a string at a given font family and size
//! - Report the pixel line height (ascent + descent + line gap) of a font
//! - Provide a backend-agnostic measurement abstraction
//!
//! # Non-Responsibilities
//!
//! - Font discovery or family fallback
//! - Rasterization or draw command generation
//! - Caching (callers may cache, the fitter never does)
//!
//! # Data Flow
//!
//! ```text
//! FitRequest → FontFitter → TextMeasurer → Measurement
//! ```

use std::fmt;

/* ============================
 * Measure Result
 * ============================ */

/// Dimensions of a string rendered at one font size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Measurement {
    /// Advance width in pixels
    pub width: u32,

    /// Line height in pixels
    pub line_height: u32,
}

/* ============================
 * Errors
 * ============================ */

/// Errors raised while building a measurer.
///
/// Measuring itself never fails; once a measurer exists every query
/// returns a value.
#[derive(Debug, Clone)]
pub enum TextMeasureError {
    /// フォントの読み込みエラー
    FontLoadError(String),
}

impl fmt::Display for TextMeasureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FontLoadError(s) => write!(f, "Font load error: {s}"),
        }
    }
}

impl std::error::Error for TextMeasureError {}

/* ============================
 * Trait
 * ============================ */

/// Reports rendered text dimensions for a font family and size.
///
/// Width and line height must use the same unit. The fitter assumes
/// both are non-decreasing in `size`.
pub trait TextMeasurer: Send + Sync {
    fn measure_width(&self, text: &str, family: &str, size: u32) -> u32;

    fn measure_line_height(&self, family: &str, size: u32) -> u32;

    fn measure(&self, text: &str, family: &str, size: u32) -> Measurement {
        Measurement {
            width: self.measure_width(text, family, size),
            line_height: self.measure_line_height(family, size),
        }
    }
}

/* ============================
 * Fallback
 * ============================ */

pub mod fallback;
pub use fallback::FallbackTextMeasurer;
