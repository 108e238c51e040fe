use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use raw_window_handle::{HasDisplayHandle, RawDisplayHandle};
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::WindowEvent as WinitEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::surface::Extent;

use super::{WindowEvent, WindowHost};

/// Upper bound on one pump while waiting for the window to be created.
const CREATE_POLL_TIMEOUT: Duration = Duration::from_millis(10);

/// Window creation parameters.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    /// Outer position in physical pixels; `None` lets the platform decide.
    pub position: Option<(i32, i32)>,
    /// Inner size in physical pixels.
    pub size: Extent,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "lumen".to_string(),
            position: None,
            size: Extent::new(200, 200),
            resizable: true,
        }
    }
}

/// `WindowHost` backed by a winit window in pump-events mode.
///
/// winit normally owns the thread through `run_app`. Pumping instead lets the
/// frame loop stay in charge: each drain cycle pumps the platform queue once
/// with a zero timeout and then hands out the translated events.
pub struct WinitHost {
    // Field order is drop order: the window goes before its event loop.
    window: Arc<Window>,
    state: HostState,
    event_loop: EventLoop<()>,
    pumped: bool,
}

struct HostState {
    config: WindowConfig,
    window: Option<Arc<Window>>,
    pending: VecDeque<WindowEvent>,
    create_error: Option<String>,
}

impl WinitHost {
    /// Creates the event loop and the window, pumping until the window exists.
    pub fn open(config: WindowConfig) -> Result<Self> {
        let mut event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = HostState {
            config,
            window: None,
            pending: VecDeque::new(),
            create_error: None,
        };

        while state.window.is_none() {
            let status = event_loop.pump_app_events(Some(CREATE_POLL_TIMEOUT), &mut state);
            if let Some(err) = state.create_error.take() {
                anyhow::bail!("failed to create window: {err}");
            }
            if let PumpStatus::Exit(code) = status {
                anyhow::bail!("event loop exited with code {code} before the window was created");
            }
        }

        let Some(window) = state.window.clone() else {
            anyhow::bail!("event loop resumed without creating a window");
        };

        let host = Self {
            window,
            state,
            event_loop,
            pumped: false,
        };

        let size = host.size();
        log::info!(
            "window created: {}x{} ({})",
            size.width,
            size.height,
            host.native_display_kind().unwrap_or("unknown display")
        );
        Ok(host)
    }

    /// The window, for surface creation.
    pub fn window(&self) -> Arc<Window> {
        Arc::clone(&self.window)
    }

    /// Names the platform display connection behind the window.
    pub fn native_display_kind(&self) -> Result<&'static str> {
        let handle = self
            .window
            .display_handle()
            .context("display handle unavailable")?;

        Ok(match handle.as_raw() {
            RawDisplayHandle::Xlib(_) => "xlib",
            RawDisplayHandle::Xcb(_) => "xcb",
            RawDisplayHandle::Wayland(_) => "wayland",
            RawDisplayHandle::Windows(_) => "windows",
            RawDisplayHandle::AppKit(_) => "appkit",
            RawDisplayHandle::UiKit(_) => "uikit",
            RawDisplayHandle::Android(_) => "android",
            RawDisplayHandle::Web(_) => "web",
            _ => "other",
        })
    }

    fn pump(&mut self) {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.state);
        if let PumpStatus::Exit(code) = status {
            log::debug!("event loop exited with code {code}");
            self.state.pending.push_back(WindowEvent::Quit);
        }
    }
}

impl WindowHost for WinitHost {
    fn poll_event(&mut self) -> Option<WindowEvent> {
        if !self.pumped {
            self.pump();
            self.pumped = true;
        }

        let event = self.state.pending.pop_front();
        if event.is_none() {
            // Drained: the next cycle pumps again.
            self.pumped = false;
        }
        event
    }

    fn size(&self) -> Extent {
        let size = self.window.inner_size();
        Extent::new(size.width, size.height)
    }
}

impl ApplicationHandler for HostState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let mut attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.size.width,
                self.config.size.height,
            ))
            .with_resizable(self.config.resizable);

        if let Some((x, y)) = self.config.position {
            attrs = attrs.with_position(PhysicalPosition::new(x, y));
        }

        match event_loop.create_window(attrs) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(e) => self.create_error = Some(e.to_string()),
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WinitEvent) {
        let translated = match event {
            WinitEvent::CloseRequested | WinitEvent::Destroyed => WindowEvent::Quit,
            WinitEvent::Resized(size) => WindowEvent::Resized {
                width: size.width,
                height: size.height,
            },
            WinitEvent::ScaleFactorChanged { .. } => match &self.window {
                Some(window) => {
                    let size = window.inner_size();
                    WindowEvent::Resized {
                        width: size.width,
                        height: size.height,
                    }
                }
                None => WindowEvent::Other,
            },
            _ => WindowEvent::Other,
        };

        log::trace!("window event: {translated:?}");
        self.pending.push_back(translated);
    }
}
