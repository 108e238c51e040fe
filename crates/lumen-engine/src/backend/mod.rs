//! GPU backend boundary.
//!
//! `Backend` is the seam between the session logic and the native GPU API.
//! Its associated types are the opaque native handles; the backend value
//! itself plays the role of the process-wide instance.
//!
//! `WgpuBackend` is the production implementation. Tests drive the same
//! session code through a scripted mock.

mod native;
mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use native::WgpuBackend;
pub use types::{
    AcquireStatus, AdapterOptions, AdapterSummary, BackendFailure, BufferDesc, Callback,
    DeviceError, DeviceErrorKind, DeviceRequest, DrawPass, ErrorHandler, PipelineDesc,
    RequestStatus, WorkDoneCallback,
};

use crate::surface::SurfaceConfig;

/// Native GPU operations used by a rendering session.
///
/// Asynchronous requests report through a completion callback, which may fire
/// on any thread, before or after the request call returns. Everything else is
/// synchronous.
pub trait Backend {
    type Surface;
    type Adapter: Send + 'static;
    type Device: Send + 'static;
    type Queue: Send + 'static;
    /// An acquired presentation texture. Dropping it releases it.
    type SurfaceTexture;
    type TextureView;
    type Buffer;
    type ShaderModule;
    type RenderPipeline;
    type CommandBuffer;

    // ── negotiation ───────────────────────────────────────────────────────

    fn request_adapter(
        &self,
        surface: &Self::Surface,
        options: &AdapterOptions,
        callback: Callback<Self::Adapter>,
    );

    fn adapter_summary(&self, adapter: &Self::Adapter) -> AdapterSummary;

    fn request_device(
        &self,
        adapter: &Self::Adapter,
        request: &DeviceRequest,
        callback: Callback<(Self::Device, Self::Queue)>,
    );

    /// Installs the device's uncaptured-error handler for the device lifetime.
    fn set_error_handler(&self, device: &Self::Device, handler: ErrorHandler);

    fn on_submitted_work_done(&self, queue: &Self::Queue, callback: WorkDoneCallback);

    // ── surface ───────────────────────────────────────────────────────────

    fn surface_capabilities(
        &self,
        surface: &Self::Surface,
        adapter: &Self::Adapter,
    ) -> wgpu::SurfaceCapabilities;

    fn configure_surface(
        &self,
        surface: &Self::Surface,
        device: &Self::Device,
        config: &SurfaceConfig,
    );

    fn acquire_texture(
        &self,
        surface: &Self::Surface,
    ) -> Result<Self::SurfaceTexture, AcquireStatus>;

    fn create_view(&self, texture: &Self::SurfaceTexture) -> Self::TextureView;

    /// True when the texture can still be presented but the surface should be reconfigured.
    fn is_suboptimal(&self, texture: &Self::SurfaceTexture) -> bool;

    fn present(&self, texture: Self::SurfaceTexture);

    // ── resources ─────────────────────────────────────────────────────────

    /// Compiles WGSL source. On failure returns the backend's diagnostic text.
    fn create_shader_module(
        &self,
        device: &Self::Device,
        label: &str,
        source: &str,
    ) -> Result<Self::ShaderModule, String>;

    /// Creates a render pipeline. On a validation failure returns the backend's message.
    fn create_render_pipeline(
        &self,
        device: &Self::Device,
        desc: &PipelineDesc<'_, Self>,
    ) -> Result<Self::RenderPipeline, String>;

    fn create_buffer(&self, device: &Self::Device, desc: &BufferDesc<'_>) -> Self::Buffer;

    fn write_buffer(&self, queue: &Self::Queue, buffer: &Self::Buffer, offset: u64, data: &[u8]);

    // ── commands ──────────────────────────────────────────────────────────

    fn record_pass(&self, device: &Self::Device, pass: &DrawPass<'_, Self>) -> Self::CommandBuffer;

    fn submit(&self, queue: &Self::Queue, commands: Self::CommandBuffer);
}
