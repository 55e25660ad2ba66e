use anyhow::{Result, anyhow};
use image::RgbaImage;
use std::borrow::Cow;
use std::sync::Arc;
use winit::window::Window;

use crate::engine::color::Color;

/// フレームをウィンドウのサーフェスに転送する
///
/// The frame is rasterized on the CPU; the GPU side only copies it into the
/// swapchain texture. Surfaces that cannot be copied into are cleared to the
/// background color instead.
pub struct GpuRenderer {
    /// GPUの描画対象
    surface: wgpu::Surface<'static>,
    /// GPUの論理デバイス
    device: wgpu::Device,
    /// コマンド送信用キュー
    queue: wgpu::Queue,
    /// サーフェス設定、解像度・フォーマットなどのフレームバッファ設定
    config: wgpu::SurfaceConfiguration,
    /// WindowSize
    size: winit::dpi::PhysicalSize<u32>,
    /// サーフェスに直接コピーできるか
    copyable: bool,
}

impl GpuRenderer {
    /// 新しいGPUレンダラーを作成
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::default();

        // OSウィンドウとGPUの描画対象（サーフェス）を関連付ける
        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("textsaver device"),
                ..Default::default()
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = choose_format(&surface_caps.formats)
            .ok_or_else(|| anyhow!("surface reports no formats"))?;

        let copyable = pixel_order(surface_format).is_some()
            && surface_caps.usages.contains(wgpu::TextureUsages::COPY_DST);
        let mut usage = wgpu::TextureUsages::RENDER_ATTACHMENT;
        if copyable {
            usage |= wgpu::TextureUsages::COPY_DST;
        } else {
            log::warn!(
                "surface format {:?} does not accept copies; only the background will be shown",
                surface_format
            );
        }

        let config = wgpu::SurfaceConfiguration {
            usage,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "gpu: {} ({:?}) {}x{} {:?}",
            adapter.get_info().name,
            adapter.get_info().backend,
            config.width,
            config.height,
            config.format
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            copyable,
        })
    }

    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.size
    }

    /// ウィンドウサイズが変更された時の処理
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reconfigure with the current size, e.g. after the surface was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// フレームを描画
    ///
    /// `frame` must match the surface size; a mismatched frame (a resize in
    /// flight) is skipped and the background is shown for that frame.
    pub fn render(&mut self, frame: &RgbaImage, background: Color) -> Result<()> {
        let output = self.surface.get_current_texture()?;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        let order = pixel_order(self.config.format);
        let fits = frame.width() == self.config.width && frame.height() == self.config.height;

        match order {
            Some(order) if self.copyable && fits => {
                let bytes: Cow<'_, [u8]> = match order {
                    PixelOrder::Rgba => Cow::Borrowed(frame.as_raw()),
                    PixelOrder::Bgra => Cow::Owned(rgba_to_bgra(frame.as_raw())),
                };
                self.queue.write_texture(
                    wgpu::TexelCopyTextureInfo {
                        texture: &output.texture,
                        mip_level: 0,
                        origin: wgpu::Origin3d::ZERO,
                        aspect: wgpu::TextureAspect::All,
                    },
                    &bytes,
                    wgpu::TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(4 * self.config.width),
                        rows_per_image: Some(self.config.height),
                    },
                    wgpu::Extent3d {
                        width: self.config.width,
                        height: self.config.height,
                        depth_or_array_layers: 1,
                    },
                );
            }
            _ => {
                if !fits {
                    log::debug!(
                        "gpu: frame {}x{} does not match surface {}x{}",
                        frame.width(),
                        frame.height(),
                        self.config.width,
                        self.config.height
                    );
                }
                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                // 背景色でクリアするだけのパス
                let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Clear Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(clear_color(
                                background,
                                self.config.format.is_srgb(),
                            )),
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    ..Default::default()
                });
            }
        }

        // コマンドをGPUに送信
        self.queue.submit(std::iter::once(encoder.finish()));

        // フレームを画面に表示
        output.present();

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PixelOrder {
    Rgba,
    Bgra,
}

fn pixel_order(format: wgpu::TextureFormat) -> Option<PixelOrder> {
    match format {
        wgpu::TextureFormat::Rgba8Unorm | wgpu::TextureFormat::Rgba8UnormSrgb => {
            Some(PixelOrder::Rgba)
        }
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb => {
            Some(PixelOrder::Bgra)
        }
        _ => None,
    }
}

/// CPU 側のフレームは RGBA8 / BGRA8 のみ詰め替えられる
///
/// sRGB variants come first, then any other 8-bit format, then whatever the
/// surface offers (background-only).
fn choose_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| f.is_srgb() && pixel_order(*f).is_some())
        .or_else(|| formats.iter().copied().find(|f| pixel_order(*f).is_some()))
        .or_else(|| formats.first().copied())
}

/// Clear values are linear; an sRGB target re-encodes them on store, so the
/// 8-bit color has to be decoded first to land on the same bytes as the frame.
fn clear_color(color: Color, srgb_target: bool) -> wgpu::Color {
    let [r, g, b, a] = color.to_f32_array();
    let channel = |c: f32| {
        let c = c as f64;
        if !srgb_target {
            c
        } else if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    wgpu::Color {
        r: channel(r),
        g: channel(g),
        b: channel(b),
        a: a as f64,
    }
}

fn rgba_to_bgra(rgba: &[u8]) -> Vec<u8> {
    let mut out = rgba.to_vec();
    for px in out.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
    out
}
