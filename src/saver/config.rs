use std::fmt;
use std::str::FromStr;

use crate::engine::color::Color;

/// How the window covers the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowMode {
    /// Window-manager managed fullscreen.
    Fullscreen,
    /// Undecorated, always-on-top window sized to the monitor.
    #[default]
    Borderless,
}

impl FromStr for WindowMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fullscreen" => Ok(WindowMode::Fullscreen),
            "borderless" => Ok(WindowMode::Borderless),
            _ => Err(format!(
                "unknown mode \"{s}\": expected \"fullscreen\" or \"borderless\""
            )),
        }
    }
}

impl fmt::Display for WindowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowMode::Fullscreen => write!(f, "fullscreen"),
            WindowMode::Borderless => write!(f, "borderless"),
        }
    }
}

/// Host-side settings. Nothing here is persisted.
#[derive(Debug, Clone)]
pub struct SaverConfig {
    pub text: String,
    /// 要求されたフォントファミリ
    pub font_family: String,
    /// 見つからなかった場合のファミリ
    pub fallback_family: String,
    pub background: Color,
    /// None のときは背景色から自動で選ぶ
    pub text_color: Option<Color>,
    pub mode: WindowMode,
    /// Pixels kept free on each axis of the screen
    pub padding: u32,
    /// Font size search range, in points
    pub min_size: u32,
    pub max_size: u32,
}

impl Default for SaverConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_family: "Arial".to_string(),
            fallback_family: "Arial".to_string(),
            background: Color::BLACK,
            text_color: None,
            mode: WindowMode::default(),
            padding: 40,
            min_size: 1,
            max_size: 800,
        }
    }
}

impl SaverConfig {
    /// Explicit text color, or whichever of black/white contrasts with the background.
    pub fn text_color(&self) -> Color {
        self.text_color
            .unwrap_or_else(|| self.background.contrasting())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("Fullscreen".parse(), Ok(WindowMode::Fullscreen));
        assert_eq!("borderless".parse(), Ok(WindowMode::Borderless));
        assert!("windowed".parse::<WindowMode>().is_err());
    }

    #[test]
    fn text_color_defaults_to_contrast() {
        let mut config = SaverConfig {
            background: Color::WHITE,
            ..Default::default()
        };
        assert_eq!(config.text_color(), Color::BLACK);

        config.background = Color::BLACK;
        assert_eq!(config.text_color(), Color::WHITE);

        config.text_color = Some(Color::rgb(255, 0, 0));
        assert_eq!(config.text_color(), Color::rgb(255, 0, 0));
    }
}
