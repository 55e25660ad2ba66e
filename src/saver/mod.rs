//! The screensaver host: owns configuration, the resolved font and the
//! measurer, lays out the single centered string and reacts to input.

pub mod config;
pub mod dismiss;

pub use config::{SaverConfig, WindowMode};
pub use dismiss::{DismissGuard, UserInput};

use anyhow::Result;
use image::RgbaImage;
use std::path::Path;
use winit::event::WindowEvent;

use crate::engine::bridge::text::TextMeasurer;
use crate::engine::fit::{FitError, FitRequest, fit_with_measurer};
use crate::engine::renderer_model::{TextScene, generate_draw_commands};
use crate::platform::font::ResolvedFont;
use crate::platform::renderer::gpu::GpuRenderer;
use crate::platform::renderer::raster::rasterize;
use crate::platform::renderer::text_measurer::{DisplayScale, PlatformTextMeasurer};

pub enum SaverCommand {
    Exit,
    RequestRedraw,
    None,
}

pub struct SaverApp {
    config: SaverConfig,
    measurer: PlatformTextMeasurer,
    /// 現在のサーフェスサイズで描いたフレーム
    frame: Option<RgbaImage>,
    dismiss: DismissGuard,
    /// 連続した描画失敗の回数
    render_failures: u32,
}

/// Redraws retried after consecutive surface errors before giving up.
const MAX_RENDER_RETRIES: u32 = 3;

impl SaverApp {
    pub fn new(config: SaverConfig, font: &ResolvedFont, scale: DisplayScale) -> Result<Self> {
        // 範囲だけ先に検証しておく
        FitRequest::new("", config.min_size, config.max_size, 1, 1)?;
        let measurer = PlatformTextMeasurer::new(font, scale)?;
        Ok(Self {
            config,
            measurer,
            frame: None,
            dismiss: DismissGuard::default(),
            render_failures: 0,
        })
    }

    pub fn config(&self) -> &SaverConfig {
        &self.config
    }

    pub fn measurer(&self) -> &PlatformTextMeasurer {
        &self.measurer
    }

    /// The HiDPI adjustment; must run before the first layout.
    pub fn set_scale(&mut self, scale: DisplayScale) {
        if self.measurer.scale() != scale {
            log::info!("display scale: {:.3} px/pt", scale.pixels_per_point);
            self.measurer.set_scale(scale);
            self.frame = None;
        }
    }

    /// Fit the text to a `width` x `height` screen and center it.
    pub fn layout(&self, width: u32, height: u32) -> Result<TextScene, FitError> {
        let request = FitRequest::for_screen(
            self.config.text.as_str(),
            width,
            height,
            self.config.padding,
            self.config.min_size,
            self.config.max_size,
        )?;
        let family = self.measurer.family();
        let size = fit_with_measurer(&request, family, &self.measurer);
        let measurement = self.measurer.measure(request.text(), family, size);

        Ok(TextScene {
            screen_width: width,
            screen_height: height,
            background: self.config.background,
            text: self.config.text.clone(),
            text_color: self.config.text_color(),
            size_px: self.measurer.pixel_size(size),
            measurement,
        })
    }

    /// Rasterize a full frame. Screens too small for the padding get the
    /// background only.
    pub fn render_frame(&self, width: u32, height: u32) -> RgbaImage {
        let scene = self.layout(width, height).unwrap_or_else(|e| {
            log::warn!("layout skipped: {}", e);
            TextScene {
                screen_width: width,
                screen_height: height,
                background: self.config.background,
                text: String::new(),
                text_color: self.config.text_color(),
                size_px: 0.0,
                measurement: Default::default(),
            }
        });
        self.rasterize_scene(&scene)
    }

    fn rasterize_scene(&self, scene: &TextScene) -> RgbaImage {
        let commands = generate_draw_commands(scene);
        rasterize(
            self.measurer.font(),
            &commands,
            scene.screen_width,
            scene.screen_height,
        )
    }

    /// Render one frame without opening a window and write it as an image.
    pub fn snapshot(&self, width: u32, height: u32, path: &Path) -> Result<()> {
        // ここではパディング不足をエラーとして扱う
        let scene = self.layout(width, height)?;
        let frame = self.rasterize_scene(&scene);
        frame.save(path)?;
        log::info!("snapshot written to {}", path.display());
        Ok(())
    }

    /// Open the window and block until the saver is dismissed.
    pub fn run(self) -> Result<()> {
        crate::platform::system::app::run(self)
    }

    pub fn handle_window_event(
        &mut self,
        event: WindowEvent,
        gpu: &mut GpuRenderer,
    ) -> SaverCommand {
        if self.dismisses_on(&event) {
            return SaverCommand::Exit;
        }
        match event {
            WindowEvent::Resized(size) => {
                gpu.resize(size);
                self.frame = None;
                SaverCommand::RequestRedraw
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.set_scale(DisplayScale::from_scale_factor(scale_factor));
                SaverCommand::RequestRedraw
            }
            WindowEvent::RedrawRequested => {
                let size = gpu.size();
                let stale = self
                    .frame
                    .as_ref()
                    .is_none_or(|f| f.dimensions() != (size.width, size.height));
                if stale && size.width > 0 && size.height > 0 {
                    self.frame = Some(self.render_frame(size.width, size.height));
                }
                let Some(frame) = &self.frame else {
                    return SaverCommand::None;
                };
                match gpu.render(frame, self.config.background) {
                    Ok(()) => {
                        self.render_failures = 0;
                        SaverCommand::None
                    }
                    Err(e) => {
                        // Lost / Outdated は再設定して描き直す
                        log::error!("render error: {}", e);
                        gpu.reconfigure();
                        self.render_failures += 1;
                        if self.render_failures <= MAX_RENDER_RETRIES {
                            SaverCommand::RequestRedraw
                        } else {
                            SaverCommand::None
                        }
                    }
                }
            }
            _ => SaverCommand::None,
        }
    }

    /// Dismissal rules: close requests, key and button presses, the wheel,
    /// and pointer motion past the anchor tolerance.
    pub fn dismisses_on(&mut self, event: &WindowEvent) -> bool {
        let Some(input) = UserInput::from_window_event(event) else {
            return false;
        };
        let dismissed = self.dismiss.dismisses(input);
        if dismissed {
            log::debug!("dismissed by {:?}", input);
        }
        dismissed
    }

    /// Called when a new window is shown.
    pub(crate) fn window_opened(&mut self) {
        self.dismiss.reset();
        self.frame = None;
    }
}
