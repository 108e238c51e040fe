use std::sync::Arc;

use crate::backend::{AdapterSummary, Backend, DrawPass};
use crate::device::{self, DeviceDiagnostics};
use crate::error::{AcquireError, SessionError};
use crate::render::{self, GpuBuffer, PipelineBuilder};
use crate::surface::{Acquired, SkipReason, SurfaceConfig, SurfaceManager, SurfaceState};
use crate::window::WindowHost;

use super::SessionConfig;

/// What happened to one frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    Presented,
    Skipped(SkipReason),
}

/// Every GPU handle the program uses, owned in one place.
///
/// Created by [`Session::start`] and torn down by `Drop`. Fields are declared
/// in reverse creation order so that handles are released newest first and
/// the surface goes last.
pub struct Session<B: Backend> {
    vertex_buffer: GpuBuffer<B>,
    pipeline: B::RenderPipeline,
    queue: B::Queue,
    device: B::Device,
    adapter: B::Adapter,
    surface: SurfaceManager<B>,

    diagnostics: Arc<DeviceDiagnostics>,
    adapter_summary: AdapterSummary,
    vertex_count: u32,
    clear_color: wgpu::Color,
}

impl<B: Backend> Session<B> {
    /// Negotiates an adapter and device for `surface`, configures the surface
    /// at the window's size, builds the pipeline and uploads the vertices.
    ///
    /// Any failure stops startup. Whatever was created so far is released
    /// as it goes out of scope.
    pub fn start<W>(
        backend: &B,
        surface: B::Surface,
        window: &W,
        config: &SessionConfig,
    ) -> Result<Self, SessionError>
    where
        W: WindowHost + ?Sized,
    {
        let adapter = device::request_adapter(backend, &surface, &config.gpu.adapter_options())?;
        let adapter_summary = backend.adapter_summary(&adapter);
        device::describe_adapter(&adapter_summary);

        let bundle =
            device::request_device(backend, &adapter, &config.gpu.device_request(&config.label))?;

        let caps = backend.surface_capabilities(&surface, &adapter);
        let surface_config = SurfaceConfig::from_capabilities(&caps, &config.gpu, window.size())
            .ok_or(SessionError::NoSurfaceFormat)?;
        let format = surface_config.format;

        let mut surface = SurfaceManager::new(surface);
        surface.configure(backend, &bundle.device, surface_config);
        log::info!(
            "surface: {:?}, {}x{}",
            format,
            window.size().width,
            window.size().height
        );

        let pipeline = PipelineBuilder::new("lumen pipeline", &config.shader, format)
            .vertex_layout(config.vertex_layout.clone())
            .build(backend, &bundle.device)?;

        let vertex_buffer = render::create_buffer_init(
            backend,
            &bundle.device,
            &bundle.queue,
            "lumen vertices",
            &config.vertices,
            wgpu::BufferUsages::VERTEX,
        )?;
        render::notify_when_done(backend, &bundle.queue, "vertex upload");

        Ok(Self {
            vertex_buffer,
            pipeline,
            queue: bundle.queue,
            device: bundle.device,
            adapter,
            surface,
            diagnostics: bundle.diagnostics,
            adapter_summary,
            vertex_count: config.vertex_count(),
            clear_color: config.clear_color,
        })
    }

    pub fn adapter(&self) -> &B::Adapter {
        &self.adapter
    }

    pub fn adapter_summary(&self) -> &AdapterSummary {
        &self.adapter_summary
    }

    pub fn diagnostics(&self) -> &DeviceDiagnostics {
        &self.diagnostics
    }

    pub fn surface_state(&self) -> SurfaceState {
        self.surface.state()
    }

    pub fn surface_config(&self) -> Option<&SurfaceConfig> {
        self.surface.config()
    }

    /// A resize event was seen; the next frame reconfigures the surface.
    pub fn mark_resized(&mut self) {
        self.surface.mark_needs_reconfigure();
    }

    /// Acquires, draws, submits and presents one frame.
    ///
    /// A skipped acquisition records nothing. Fatal acquisition statuses are
    /// returned before any command is recorded.
    pub fn render_frame<W>(&mut self, backend: &B, window: &W) -> Result<FrameOutcome, AcquireError>
    where
        W: WindowHost + ?Sized,
    {
        let frame = match self.surface.acquire_next_frame(backend, &self.device, window)? {
            Acquired::Frame(frame) => frame,
            Acquired::Skipped(reason) => {
                log::trace!("frame skipped: {reason:?}");
                return Ok(FrameOutcome::Skipped(reason));
            }
        };

        let commands = backend.record_pass(
            &self.device,
            &DrawPass {
                label: "lumen frame",
                view: frame.view(),
                clear: self.clear_color,
                pipeline: &self.pipeline,
                vertex_buffer: self.vertex_buffer.raw(),
                vertex_count: self.vertex_count,
            },
        );
        backend.submit(&self.queue, commands);
        frame.present(backend);

        Ok(FrameOutcome::Presented)
    }
}
