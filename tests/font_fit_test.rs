use std::sync::atomic::{AtomicUsize, Ordering};

use textsaver::engine::bridge::text::{FallbackTextMeasurer, TextMeasurer};
use textsaver::{FitError, FitRequest, Measurement, fit, fit_with_measurer};

/// 幅 = size * 10, 行の高さ = size の等幅計測器（呼び出し回数を数える）
#[derive(Default)]
struct CountingMeasurer {
    calls: AtomicUsize,
}

impl TextMeasurer for CountingMeasurer {
    fn measure_width(&self, text: &str, _family: &str, size: u32) -> u32 {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if text.is_empty() { 0 } else { size * 10 }
    }

    fn measure_line_height(&self, _family: &str, size: u32) -> u32 {
        size
    }
}

#[test]
fn scenario_width_bound_gives_50() {
    let req = FitRequest::new("x", 1, 100, 505, 1000).unwrap();
    let size = fit(&req, |s| Measurement {
        width: s * 10,
        line_height: s,
    });
    assert_eq!(size, 50);
}

#[test]
fn scenario_nothing_fits_gives_floor() {
    let req = FitRequest::new("x", 1, 10, 100, 100).unwrap();
    let size = fit(&req, |_| Measurement {
        width: 101,
        line_height: 101,
    });
    assert_eq!(size, 1);
}

#[test]
fn scenario_single_size_range() {
    let req = FitRequest::new("anything", 5, 5, 100, 100).unwrap();
    assert_eq!(fit(&req, |_| Measurement::default()), 5);
    assert_eq!(
        fit(&req, |_| Measurement {
            width: u32::MAX,
            line_height: u32::MAX,
        }),
        5
    );
}

#[test]
fn measurer_trait_drives_the_search() {
    let measurer = CountingMeasurer::default();
    let req = FitRequest::new("Hello", 1, 800, 1880, 1040).unwrap();
    let size = fit_with_measurer(&req, "Arial", &measurer);

    assert_eq!(size, 188);
    // ceil(log2(799)) + 1
    assert!(measurer.calls.load(Ordering::Relaxed) <= 11);
}

#[test]
fn empty_text_is_limited_by_line_height_only() {
    let measurer = CountingMeasurer::default();
    let req = FitRequest::new("", 1, 800, 1880, 1040).unwrap();
    assert_eq!(fit_with_measurer(&req, "Arial", &measurer), 800);

    let fallback = FallbackTextMeasurer::default();
    let req = FitRequest::new("", 1, 800, 1880, 10_000).unwrap();
    assert_eq!(fit_with_measurer(&req, "Arial", &fallback), 800);
}

#[test]
fn longer_text_never_gets_a_larger_size() {
    let measurer = FallbackTextMeasurer::default();
    let mut last = u32::MAX;
    for text in ["A", "AB", "Hello", "Hello, world", "The quick brown fox jumps over the lazy dog"] {
        let req = FitRequest::for_screen(text, 1920, 1080, 40, 1, 800).unwrap();
        let size = fit_with_measurer(&req, "Arial", &measurer);
        assert!(size <= last, "{text:?} got {size}, previous {last}");
        last = size;
    }
}

#[test]
fn invalid_requests_are_rejected() {
    assert_eq!(
        FitRequest::new("x", 10, 9, 100, 100).unwrap_err().to_string(),
        "invalid fit request: minimum size 10 exceeds maximum size 9"
    );
    assert!(matches!(
        FitRequest::for_screen("x", 40, 40, 40, 1, 800),
        Err(FitError::InvalidArgument(_))
    ));
}
