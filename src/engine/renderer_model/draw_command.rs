use crate::engine::bridge::text::Measurement;
use crate::engine::color::Color;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    DrawRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    /// `(x, y)` is the top-left corner of the line box.
    DrawText {
        x: f32,
        y: f32,
        text: String,
        size_px: f32,
        color: Color,
    },
}

/// A single string centered on a solid background.
#[derive(Debug, Clone)]
pub struct TextScene {
    pub screen_width: u32,
    pub screen_height: u32,
    pub background: Color,
    pub text: String,
    pub text_color: Color,
    pub size_px: f32,
    pub measurement: Measurement,
}

impl TextScene {
    /// Top-left of the text's line box, clamped to the screen origin.
    pub fn text_origin(&self) -> (f32, f32) {
        let x = (self.screen_width as f32 - self.measurement.width as f32) / 2.0;
        let y = (self.screen_height as f32 - self.measurement.line_height as f32) / 2.0;
        (x.max(0.0).floor(), y.max(0.0).floor())
    }
}

/// TextScene → DrawCommand
pub fn generate_draw_commands(scene: &TextScene) -> Vec<DrawCommand> {
    let mut commands = vec![DrawCommand::DrawRect {
        x: 0.0,
        y: 0.0,
        width: scene.screen_width as f32,
        height: scene.screen_height as f32,
        color: scene.background,
    }];

    // 空文字は背景だけ
    if !scene.text.is_empty() {
        let (x, y) = scene.text_origin();
        commands.push(DrawCommand::DrawText {
            x,
            y,
            text: scene.text.clone(),
            size_px: scene.size_px,
            color: scene.text_color,
        });
    }

    commands
}
