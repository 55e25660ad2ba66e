use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::monitor::MonitorHandle;
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId, WindowLevel};

use crate::platform::renderer::gpu::GpuRenderer;
use crate::platform::renderer::text_measurer::DisplayScale;
use crate::saver::{SaverApp, SaverCommand, WindowMode};

pub struct State {
    pub window: Arc<Window>,
    pub gpu_renderer: GpuRenderer,
}

pub struct App {
    state: Option<State>,
    saver_app: SaverApp,
    /// resumed() は Result を返せないので、ここに退避して終了する
    error: Option<anyhow::Error>,
}

impl App {
    pub fn new(saver_app: SaverApp) -> Self {
        Self {
            state: None,
            saver_app,
            error: None,
        }
    }

    fn open_window(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<State> {
        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());

        // HiDPI: 計測前に倍率を決める
        if let Some(m) = &monitor {
            self.saver_app
                .set_scale(DisplayScale::from_scale_factor(m.scale_factor()));
        }

        let attributes = window_attributes(self.saver_app.config().mode, monitor);
        let window = Arc::new(event_loop.create_window(attributes)?);
        window.set_cursor_visible(false);

        let gpu_renderer = pollster::block_on(GpuRenderer::new(window.clone()))?;
        Ok(State {
            window,
            gpu_renderer,
        })
    }
}

fn window_attributes(mode: WindowMode, monitor: Option<MonitorHandle>) -> WindowAttributes {
    let attributes = Window::default_attributes().with_title("textsaver");
    match (mode, monitor) {
        (WindowMode::Fullscreen, monitor) => {
            attributes.with_fullscreen(Some(Fullscreen::Borderless(monitor)))
        }
        (WindowMode::Borderless, Some(monitor)) => attributes
            .with_decorations(false)
            .with_window_level(WindowLevel::AlwaysOnTop)
            .with_inner_size(monitor.size())
            .with_position(monitor.position()),
        // モニタ情報が無いときは WM に任せる
        (WindowMode::Borderless, None) => attributes
            .with_decorations(false)
            .with_window_level(WindowLevel::AlwaysOnTop)
            .with_fullscreen(Some(Fullscreen::Borderless(None))),
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match self.open_window(event_loop) {
            Ok(state) => {
                let size = state.window.inner_size();
                log::info!(
                    "window opened: {}x{} ({})",
                    size.width,
                    size.height,
                    self.saver_app.config().mode
                );
                self.saver_app.window_opened();
                state.window.request_redraw();
                self.state = Some(state);
            }
            Err(e) => {
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        match self
            .saver_app
            .handle_window_event(event, &mut state.gpu_renderer)
        {
            SaverCommand::Exit => event_loop.exit(),
            SaverCommand::RequestRedraw => state.window.request_redraw(),
            SaverCommand::None => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // ウィンドウと GPU リソースを解放
        self.state = None;
    }
}

/// Run the event loop until the saver is dismissed.
pub fn run(saver_app: SaverApp) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(saver_app);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
