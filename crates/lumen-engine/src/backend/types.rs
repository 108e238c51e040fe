use std::sync::Arc;

use crate::render::VertexLayout;

use super::Backend;

/// Completion callback for an asynchronous backend request.
pub type Callback<T> = Box<dyn FnOnce(Result<T, BackendFailure>) + Send + 'static>;

/// Handler invoked for device errors that no error scope captured.
///
/// Registered once per device; it stays alive for as long as the device does.
pub type ErrorHandler = Arc<dyn Fn(DeviceError) + Send + Sync + 'static>;

/// One-shot notification fired when previously submitted queue work finishes.
pub type WorkDoneCallback = Box<dyn FnOnce() + Send + 'static>;

/// Status reported by an asynchronous adapter/device request.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RequestStatus {
    Success,
    /// No adapter/device matching the constraints exists.
    Unavailable,
    /// The backend rejected the request.
    Error,
    /// The request ended without a definite answer.
    Unknown,
}

/// Non-success outcome of a backend request: status code plus diagnostic.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BackendFailure {
    pub status: RequestStatus,
    pub message: String,
}

impl BackendFailure {
    pub fn new(status: RequestStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Non-success status of a surface texture acquisition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AcquireStatus {
    Timeout,
    Outdated,
    Lost,
    OutOfMemory,
    DeviceLost,
    /// A status outside the documented set. Treated as fatal.
    Unrecognized,
}

impl AcquireStatus {
    /// Transient statuses are recovered by reconfiguring the surface.
    pub fn is_transient(self) -> bool {
        matches!(self, Self::Timeout | Self::Outdated | Self::Lost)
    }
}

/// Category of an uncaptured device error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DeviceErrorKind {
    Validation,
    OutOfMemory,
    Internal,
    Unknown,
}

/// A device-level error delivered after setup.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DeviceError {
    pub kind: DeviceErrorKind,
    pub message: String,
}

/// Constraints for the adapter request. The compatible surface is passed separately.
#[derive(Debug, Clone)]
pub struct AdapterOptions {
    pub power_preference: wgpu::PowerPreference,
    pub force_fallback_adapter: bool,
}

impl Default for AdapterOptions {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
        }
    }
}

/// Parameters for the device request.
#[derive(Debug, Clone)]
pub struct DeviceRequest {
    pub label: String,
    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,
}

impl Default for DeviceRequest {
    fn default() -> Self {
        Self {
            label: "lumen device".to_string(),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
        }
    }
}

/// Feature/limit information about a negotiated adapter.
#[derive(Debug, Clone)]
pub struct AdapterSummary {
    pub name: String,
    pub backend: String,
    pub device_type: String,
    pub features: wgpu::Features,
    pub limits: wgpu::Limits,
}

/// Buffer creation parameters.
#[derive(Debug, Clone, Copy)]
pub struct BufferDesc<'a> {
    pub label: &'a str,
    pub size: u64,
    pub usage: wgpu::BufferUsages,
}

/// Everything the backend needs to compile one render pipeline.
pub struct PipelineDesc<'a, B: Backend + ?Sized> {
    pub label: &'a str,
    pub module: &'a B::ShaderModule,
    pub vertex_entry: &'a str,
    pub fragment_entry: &'a str,
    pub vertex_layout: &'a VertexLayout,
    pub color_format: wgpu::TextureFormat,
    pub blend: wgpu::BlendState,
    pub primitive: wgpu::PrimitiveState,
    pub multisample: wgpu::MultisampleState,
}

/// One clear-and-draw render pass recorded into a single command buffer.
pub struct DrawPass<'a, B: Backend + ?Sized> {
    pub label: &'a str,
    pub view: &'a B::TextureView,
    pub clear: wgpu::Color,
    pub pipeline: &'a B::RenderPipeline,
    pub vertex_buffer: &'a B::Buffer,
    pub vertex_count: u32,
}
