use textsaver::engine::bridge::text::TextMeasurer;
use textsaver::platform::renderer::text_measurer::{DisplayScale, PlatformTextMeasurer};
use textsaver::{FitRequest, fit_with_measurer};

fn system_measurer() -> Option<PlatformTextMeasurer> {
    let candidates = [
        "C:\\Windows\\Fonts\\arial.ttf",
        "C:\\Windows\\Fonts\\segoeui.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
    ];

    // 存在するフォントパスを探す
    let path = candidates
        .iter()
        .find(|p| std::path::Path::new(p).exists())?;
    let bytes = std::fs::read(path).expect("read font");
    Some(PlatformTextMeasurer::from_bytes("sys", bytes, DisplayScale::identity()).expect("create measurer"))
}

#[test]
fn platform_measurer_reports_positive_sizes() {
    let Some(pm) = system_measurer() else {
        eprintln!("skipping PlatformTextMeasurer test: no system font found");
        return;
    };

    let w = pm.measure_width("Hello, world!", "sys", 16);
    let h = pm.measure_line_height("sys", 16);
    println!("measured w={} h={}", w, h);
    assert!(w > 0);
    assert!(h >= 16);
    assert_eq!(pm.measure_width("", "sys", 400), 0);
}

#[test]
fn platform_measurer_is_monotonic_in_size() {
    let Some(pm) = system_measurer() else {
        eprintln!("skipping monotonic test: no system font found");
        return;
    };

    let mut last = (0, 0);
    for size in (1..=400).step_by(7) {
        let m = pm.measure("Screensaver", "sys", size);
        assert!(m.width >= last.0, "width shrank at {size}");
        assert!(m.line_height >= last.1, "line height shrank at {size}");
        last = (m.width, m.line_height);
    }
}

#[test]
fn fit_with_platform_measurer_is_tight() {
    let Some(pm) = system_measurer() else {
        eprintln!("skipping fit test: no system font found");
        return;
    };

    let req = FitRequest::for_screen("Lunch break", 1920, 1080, 40, 1, 800).unwrap();
    let size = fit_with_measurer(&req, "sys", &pm);
    assert!(size > 1 && size < 800);
    assert!(req.fits(pm.measure(req.text(), "sys", size)));
    assert!(!req.fits(pm.measure(req.text(), "sys", size + 1)));
}

#[test]
fn display_scale_shrinks_the_chosen_size() {
    let Some(mut pm) = system_measurer() else {
        eprintln!("skipping scale test: no system font found");
        return;
    };

    let req = FitRequest::for_screen("Away", 1920, 1080, 40, 1, 800).unwrap();
    let at_1x = fit_with_measurer(&req, "sys", &pm);
    pm.set_scale(DisplayScale::from_scale_factor(2.0));
    let at_2x = fit_with_measurer(&req, "sys", &pm);
    assert!(at_2x < at_1x, "2x: {at_2x}, 1x: {at_1x}");
}
