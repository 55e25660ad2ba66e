//! `textsaver` CLI: show text fullscreen until a key press or mouse movement.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use textsaver::engine::color::Color;
use textsaver::platform::font::FontResolver;
use textsaver::platform::renderer::text_measurer::DisplayScale;
use textsaver::saver::{SaverApp, SaverConfig, WindowMode};

#[derive(Parser)]
#[command(version, about = "Simple screensaver maker")]
struct Cli {
    /// Background color (name or hex)
    #[arg(long, default_value = "black")]
    color: String,

    /// Text to display
    #[arg(long, default_value = "")]
    text: String,

    /// Font family (e.g. "Segoe UI", "Helvetica")
    #[arg(long, default_value = "Arial")]
    font: String,

    /// Color of the text (name or hex). If omitted, a readable color is chosen automatically
    #[arg(long)]
    textcolor: Option<String>,

    /// fullscreen = wm-managed; borderless = no title-bar/borders
    #[arg(long, default_value = "borderless", value_parser = parse_mode)]
    mode: WindowMode,

    /// Pixels kept free around the text on each axis
    #[arg(long, default_value_t = 40)]
    padding: u32,

    /// Largest font size to try, in points
    #[arg(long = "max-size", default_value_t = 800)]
    max_size: u32,

    /// Render one frame to this image file instead of opening a window
    #[arg(long, value_name = "PATH")]
    snapshot: Option<PathBuf>,

    /// Frame size for --snapshot
    #[arg(long, default_value = "1920x1080", value_parser = parse_size)]
    size: (u32, u32),
}

fn parse_mode(s: &str) -> Result<WindowMode, String> {
    s.parse()
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("invalid size \"{s}\": expected WIDTHxHEIGHT"))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("invalid width: {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("invalid height: {e}"))?;
    if w == 0 || h == 0 {
        return Err(format!("invalid size \"{s}\": must be non-zero"));
    }
    Ok((w, h))
}

/// 不正な色は警告してデフォルトに戻す
fn color_or(value: &str, default: Color, what: &str) -> Color {
    Color::parse(value).unwrap_or_else(|| {
        log::warn!("unknown {} color \"{}\"; using {:?}", what, value, default);
        default
    })
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let defaults = SaverConfig::default();

    let background = color_or(&cli.color, defaults.background, "background");
    let text_color = cli
        .textcolor
        .as_deref()
        .map(|c| color_or(c, background.contrasting(), "text"));

    let config = SaverConfig {
        text: cli.text,
        font_family: cli.font,
        background,
        text_color,
        mode: cli.mode,
        padding: cli.padding,
        max_size: cli.max_size,
        ..defaults
    };

    let font = FontResolver::new().resolve(&config.font_family, &config.fallback_family)?;
    if let Some(warning) = font.substitution_warning(&config.font_family) {
        eprintln!("{warning}");
    }

    // 実際の倍率はウィンドウを開くときにモニタから取り直す
    let saver = SaverApp::new(config, &font, DisplayScale::default())?;
    match cli.snapshot {
        Some(path) => {
            let (width, height) = cli.size;
            saver.snapshot(width, height, &path)
        }
        None => saver.run(),
    }
}
