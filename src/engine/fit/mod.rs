//! Font-fit search.
//!
//! Finds the largest integer font size whose rendered text fits inside an
//! available area. The search asks a measurer for the width and line height
//! of the text at candidate sizes and bisects on the answer.
//!
//! The search assumes that measured width and line height never decrease as
//! the size grows. With a measurer that breaks this (hinting quirks, odd
//! fallback glyphs) the result is still a size that fits along the search
//! path, but not necessarily the largest one in the range.

use std::fmt;

use crate::engine::bridge::text::{Measurement, TextMeasurer};

/// Errors produced when building a [`FitRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FitError {
    InvalidArgument(String),
}

impl fmt::Display for FitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitError::InvalidArgument(msg) => write!(f, "invalid fit request: {msg}"),
        }
    }
}

impl std::error::Error for FitError {}

/// One font-fit query. Validated on construction and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FitRequest {
    text: String,
    min_size: u32,
    max_size: u32,
    available_width: u32,
    available_height: u32,
}

impl FitRequest {
    pub fn new(
        text: impl Into<String>,
        min_size: u32,
        max_size: u32,
        available_width: u32,
        available_height: u32,
    ) -> Result<Self, FitError> {
        if min_size == 0 {
            return Err(FitError::InvalidArgument(
                "minimum size must be at least 1".to_string(),
            ));
        }
        if min_size > max_size {
            return Err(FitError::InvalidArgument(format!(
                "minimum size {min_size} exceeds maximum size {max_size}"
            )));
        }
        if available_width == 0 || available_height == 0 {
            return Err(FitError::InvalidArgument(format!(
                "available area {available_width}x{available_height} is empty"
            )));
        }

        Ok(Self {
            text: text.into(),
            min_size,
            max_size,
            available_width,
            available_height,
        })
    }

    /// Build a request for a screen, keeping `padding` pixels free on each axis.
    pub fn for_screen(
        text: impl Into<String>,
        screen_width: u32,
        screen_height: u32,
        padding: u32,
        min_size: u32,
        max_size: u32,
    ) -> Result<Self, FitError> {
        if padding >= screen_width || padding >= screen_height {
            return Err(FitError::InvalidArgument(format!(
                "padding {padding} leaves no room on a {screen_width}x{screen_height} screen"
            )));
        }
        Self::new(
            text,
            min_size,
            max_size,
            screen_width - padding,
            screen_height - padding,
        )
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn min_size(&self) -> u32 {
        self.min_size
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    pub fn available_width(&self) -> u32 {
        self.available_width
    }

    pub fn available_height(&self) -> u32 {
        self.available_height
    }

    /// Both the width and the line height have to fit.
    pub fn fits(&self, m: Measurement) -> bool {
        m.width <= self.available_width && m.line_height <= self.available_height
    }
}

/// Largest size in `[min_size, max_size]` whose measurement fits the request.
///
/// Returns `min_size` when nothing fits: there is no smaller size to fall
/// back to. When `min_size == max_size` the measurer is never called.
/// The measurer is invoked at most `ceil(log2(max_size - min_size)) + 1` times.
pub fn fit<F>(request: &FitRequest, mut measure: F) -> u32
where
    F: FnMut(u32) -> Measurement,
{
    let mut lo = request.min_size;
    let mut hi = request.max_size;

    while lo < hi {
        // upper mid, so `hi - lo == 1` still makes progress
        let mid = lo + (hi - lo + 1) / 2;
        let m = measure(mid);
        let fits = request.fits(m);
        log::debug!(
            "fit: size={} width={} line_height={} fits={}",
            mid,
            m.width,
            m.line_height,
            fits
        );
        if fits {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }

    lo
}

/// [`fit`] driven by a [`TextMeasurer`] bound to `family`.
pub fn fit_with_measurer(request: &FitRequest, family: &str, measurer: &dyn TextMeasurer) -> u32 {
    let size = fit(request, |size| measurer.measure(request.text(), family, size));
    log::info!(
        "fit: chose size {} for {:?} in {}x{} ({})",
        size,
        request.text(),
        request.available_width(),
        request.available_height(),
        family
    );
    size
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn linear(width_per_size: u32, height_per_size: u32) -> impl Fn(u32) -> Measurement {
        move |s| Measurement {
            width: s * width_per_size,
            line_height: s * height_per_size,
        }
    }

    fn ceil_log2(w: u32) -> u32 {
        u32::BITS - (w - 1).leading_zeros()
    }

    #[test]
    fn picks_largest_size_under_width_limit() {
        let req = FitRequest::new("x", 1, 100, 505, 1000).unwrap();
        assert_eq!(fit(&req, linear(10, 1)), 50);
    }

    #[test]
    fn height_alone_can_limit_the_size() {
        let req = FitRequest::new("x", 1, 800, 10_000, 300).unwrap();
        // 2 px of line height per size -> 150
        assert_eq!(fit(&req, linear(1, 2)), 150);
    }

    #[test]
    fn returns_min_when_nothing_fits() {
        let req = FitRequest::new("x", 1, 10, 50, 50).unwrap();
        let size = fit(&req, |_| Measurement {
            width: 1_000,
            line_height: 1_000,
        });
        assert_eq!(size, 1);

        let req = FitRequest::new("x", 7, 90, 50, 50).unwrap();
        assert_eq!(fit(&req, linear(100, 100)), 7);
    }

    #[test]
    fn degenerate_range_never_measures() {
        let req = FitRequest::new("x", 5, 5, 1, 1).unwrap();
        let calls = Cell::new(0);
        let size = fit(&req, |_| {
            calls.set(calls.get() + 1);
            Measurement {
                width: u32::MAX,
                line_height: u32::MAX,
            }
        });
        assert_eq!(size, 5);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn empty_text_takes_the_maximum() {
        let req = FitRequest::new("", 1, 800, 1920, 1080).unwrap();
        let size = fit(&req, |s| Measurement {
            width: 0,
            line_height: s.min(1080),
        });
        assert_eq!(size, 800);
    }

    #[test]
    fn result_is_the_true_maximum_for_monotonic_measurers() {
        for threshold in [1u32, 2, 3, 17, 63, 64, 65, 99, 100] {
            let req = FitRequest::new("x", 1, 100, threshold, u32::MAX).unwrap();
            let measure = linear(1, 0);
            let s = fit(&req, &measure);
            assert!(req.fits(measure(s)));
            assert!(s == req.max_size() || !req.fits(measure(s + 1)));
        }
    }

    #[test]
    fn measurer_calls_are_logarithmic() {
        for (min, max) in [(1u32, 2u32), (1, 3), (1, 100), (1, 800), (10, 11), (3, 1024)] {
            for threshold in [0u32, min, (min + max) / 2, max, max + 1] {
                let req = FitRequest::new("x", min, max, threshold.max(1), u32::MAX).unwrap();
                let calls = Cell::new(0);
                fit(&req, |s| {
                    calls.set(calls.get() + 1);
                    Measurement {
                        width: if threshold == 0 { u32::MAX } else { s },
                        line_height: 0,
                    }
                });
                let bound = ceil_log2(max - min) + 1;
                assert!(
                    calls.get() <= bound,
                    "{} calls for range {min}..={max}, bound {bound}",
                    calls.get()
                );
            }
        }
    }

    #[test]
    fn rejects_invalid_requests() {
        assert!(matches!(
            FitRequest::new("x", 0, 10, 10, 10),
            Err(FitError::InvalidArgument(_))
        ));
        assert!(FitRequest::new("x", 11, 10, 10, 10).is_err());
        assert!(FitRequest::new("x", 1, 10, 0, 10).is_err());
        assert!(FitRequest::new("x", 1, 10, 10, 0).is_err());
    }

    #[test]
    fn screen_request_subtracts_padding() {
        let req = FitRequest::for_screen("x", 1920, 1080, 40, 1, 800).unwrap();
        assert_eq!(req.available_width(), 1880);
        assert_eq!(req.available_height(), 1040);
        assert!(FitRequest::for_screen("x", 30, 1080, 40, 1, 800).is_err());
    }

    #[test]
    fn works_through_a_text_measurer() {
        use crate::engine::bridge::text::FallbackTextMeasurer;

        let measurer = FallbackTextMeasurer::default();
        let req = FitRequest::for_screen("Hello", 1920, 1080, 40, 1, 800).unwrap();
        let size = fit_with_measurer(&req, "Arial", &measurer);
        assert!(req.fits(measurer.measure("Hello", "Arial", size)));
        assert!(!req.fits(measurer.measure("Hello", "Arial", size + 1)));
    }
}
