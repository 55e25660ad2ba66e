//! CPU rasterization of draw commands into an RGBA frame.
//!
//! Glyph coverage comes from fontdue and is blended over whatever is already
//! in the frame. The frame is what the GPU presenter uploads and what the
//! snapshot mode writes to disk.

use fontdue::Font as FontDue;
use image::{Rgba, RgbaImage};

use crate::engine::color::Color;
use crate::engine::renderer_model::DrawCommand;

/// 描画命令を順番に実行してフレームを作る
pub fn rasterize(font: &FontDue, commands: &[DrawCommand], width: u32, height: u32) -> RgbaImage {
    let mut frame = RgbaImage::new(width, height);
    for command in commands {
        match command {
            DrawCommand::DrawRect {
                x,
                y,
                width: w,
                height: h,
                color,
            } => fill_rect(&mut frame, *x, *y, *w, *h, *color),
            DrawCommand::DrawText {
                x,
                y,
                text,
                size_px,
                color,
            } => draw_text(&mut frame, font, *x, *y, text, *size_px, *color),
        }
    }
    frame
}

pub fn fill_rect(frame: &mut RgbaImage, x: f32, y: f32, w: f32, h: f32, color: Color) {
    let (fw, fh) = frame.dimensions();
    let x0 = x.max(0.0).round() as u32;
    let y0 = y.max(0.0).round() as u32;
    let x1 = ((x + w).round().max(0.0) as u32).min(fw);
    let y1 = ((y + h).round().max(0.0) as u32).min(fh);

    for py in y0..y1 {
        for px in x0..x1 {
            blend(frame.get_pixel_mut(px, py), color, 255);
        }
    }
}

/// `(x, y)` is the top of the line box; the baseline sits one ascent below.
pub fn draw_text(
    frame: &mut RgbaImage,
    font: &FontDue,
    x: f32,
    y: f32,
    text: &str,
    size_px: f32,
    color: Color,
) {
    let (fw, fh) = (frame.width() as i64, frame.height() as i64);
    let ascent = font
        .horizontal_line_metrics(size_px)
        .map(|m| m.ascent)
        .unwrap_or(size_px * 0.8);
    let baseline = y + ascent;

    let mut pen_x = x;
    let mut prev: Option<char> = None;
    for ch in text.chars() {
        if ch.is_control() {
            continue;
        }
        if let Some(p) = prev {
            pen_x += font.horizontal_kern(p, ch, size_px).unwrap_or(0.0);
        }
        prev = Some(ch);

        let (metrics, bitmap) = font.rasterize(ch, size_px);
        let gx = (pen_x + metrics.xmin as f32).round() as i64;
        // ymin はベースラインからビットマップ下端までの距離（上向き正）
        let gy = (baseline - metrics.height as f32 - metrics.ymin as f32).round() as i64;

        for row in 0..metrics.height {
            let py = gy + row as i64;
            if py < 0 || py >= fh {
                continue;
            }
            for col in 0..metrics.width {
                let px = gx + col as i64;
                if px < 0 || px >= fw {
                    continue;
                }
                let coverage = bitmap[row * metrics.width + col];
                if coverage > 0 {
                    blend(frame.get_pixel_mut(px as u32, py as u32), color, coverage);
                }
            }
        }

        pen_x += metrics.advance_width;
    }

    log::trace!("raster: drew {:?} at {:.1}px, pen ended at {:.1}", text, size_px, pen_x);
}

/// Source-over with `coverage` scaling the color's own alpha.
fn blend(dst: &mut Rgba<u8>, color: Color, coverage: u8) {
    let a = color.3 as u32 * coverage as u32 / 255;
    let mix = |d: u8, s: u8| ((s as u32 * a + d as u32 * (255 - a)) / 255) as u8;
    dst.0 = [
        mix(dst.0[0], color.0),
        mix(dst.0[1], color.1),
        mix(dst.0[2], color.2),
        (a + dst.0[3] as u32 * (255 - a) / 255) as u8,
    ];
}
