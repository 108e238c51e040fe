//! Scripted in-memory backend for unit tests (no GPU required).
//!
//! Every native operation is appended to a shared call log so tests can
//! assert ordering. Surface textures and views log their own release on drop.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::surface::SurfaceConfig;

use super::{
    AcquireStatus, AdapterOptions, AdapterSummary, Backend, BackendFailure, BufferDesc, Callback,
    DeviceError, DeviceRequest, DrawPass, ErrorHandler, PipelineDesc, WorkDoneCallback,
};

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Call {
    RequestAdapter,
    RequestDevice,
    SetErrorHandler,
    OnWorkDone,
    Configure { width: u32, height: u32 },
    Acquire,
    CreateView,
    Present,
    ReleaseTexture,
    ReleaseView,
    CreateShader,
    CreatePipeline { format: wgpu::TextureFormat },
    CreateBuffer { size: u64 },
    WriteBuffer { offset: u64, len: usize },
    RecordPass { vertex_count: u32 },
    Submit,
}

type Log = Rc<RefCell<Vec<Call>>>;

#[derive(Debug)]
pub struct MockSurface;
#[derive(Debug)]
pub struct MockAdapter;
#[derive(Debug)]
pub struct MockDevice;
#[derive(Debug)]
pub struct MockQueue;
#[derive(Debug)]
pub struct MockShader;
#[derive(Debug)]
pub struct MockCommandBuffer;

/// Snapshot of the descriptor the pipeline was created from.
#[derive(Debug)]
pub struct MockPipeline {
    pub format: wgpu::TextureFormat,
    pub vertex_entry: String,
    pub fragment_entry: String,
    pub stride: u64,
    pub attributes: Vec<wgpu::VertexAttribute>,
    pub blend: wgpu::BlendState,
    pub primitive: wgpu::PrimitiveState,
    pub multisample: wgpu::MultisampleState,
}

#[derive(Debug)]
pub struct MockBuffer {
    pub size: u64,
}

pub struct MockTexture {
    log: Log,
    live: Rc<Cell<usize>>,
}

impl Drop for MockTexture {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
        self.log.borrow_mut().push(Call::ReleaseTexture);
    }
}

pub struct MockView {
    log: Log,
}

impl Drop for MockView {
    fn drop(&mut self) {
        self.log.borrow_mut().push(Call::ReleaseView);
    }
}

pub struct MockBackend {
    log: Log,
    acquire_script: RefCell<VecDeque<Result<(), AcquireStatus>>>,
    live: Rc<Cell<usize>>,
    max_live: Cell<usize>,
    suboptimal: Cell<bool>,
    adapter_failure: RefCell<Option<BackendFailure>>,
    device_failure: RefCell<Option<BackendFailure>>,
    shader_error: RefCell<Option<String>>,
    pipeline_error: RefCell<Option<String>>,
    clears: RefCell<Vec<wgpu::Color>>,
    drop_adapter_callback: Cell<bool>,
    threaded_callbacks: Cell<bool>,
    error_handler: RefCell<Option<ErrorHandler>>,
    formats: RefCell<Vec<wgpu::TextureFormat>>,
    present_modes: RefCell<Vec<wgpu::PresentMode>>,
    alpha_modes: RefCell<Vec<wgpu::CompositeAlphaMode>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(Vec::new())),
            acquire_script: RefCell::new(VecDeque::new()),
            live: Rc::new(Cell::new(0)),
            max_live: Cell::new(0),
            suboptimal: Cell::new(false),
            adapter_failure: RefCell::new(None),
            device_failure: RefCell::new(None),
            shader_error: RefCell::new(None),
            pipeline_error: RefCell::new(None),
            clears: RefCell::new(Vec::new()),
            drop_adapter_callback: Cell::new(false),
            threaded_callbacks: Cell::new(false),
            error_handler: RefCell::new(None),
            formats: RefCell::new(vec![
                wgpu::TextureFormat::Bgra8Unorm,
                wgpu::TextureFormat::Bgra8UnormSrgb,
            ]),
            present_modes: RefCell::new(vec![wgpu::PresentMode::Fifo]),
            alpha_modes: RefCell::new(vec![wgpu::CompositeAlphaMode::Opaque]),
        }
    }

    // ── scripting ─────────────────────────────────────────────────────────

    /// Queues acquisition outcomes; once exhausted, acquisitions succeed.
    pub fn script_acquire(&self, outcomes: impl IntoIterator<Item = Result<(), AcquireStatus>>) {
        self.acquire_script.borrow_mut().extend(outcomes);
    }

    pub fn set_suboptimal(&self, suboptimal: bool) {
        self.suboptimal.set(suboptimal);
    }

    pub fn fail_adapter(&self, failure: BackendFailure) {
        *self.adapter_failure.borrow_mut() = Some(failure);
    }

    pub fn fail_device(&self, failure: BackendFailure) {
        *self.device_failure.borrow_mut() = Some(failure);
    }

    pub fn fail_shader(&self, message: &str) {
        *self.shader_error.borrow_mut() = Some(message.to_string());
    }

    /// Pipeline creation fails validation with `message`.
    pub fn fail_pipeline(&self, message: &str) {
        *self.pipeline_error.borrow_mut() = Some(message.to_string());
    }

    /// The adapter callback is dropped without ever being invoked.
    pub fn drop_adapter_callback(&self) {
        self.drop_adapter_callback.set(true);
    }

    /// Negotiation callbacks fire from a worker thread after a short delay.
    pub fn use_threaded_callbacks(&self) {
        self.threaded_callbacks.set(true);
    }

    /// Formats the surface reports. An empty list models an incompatible adapter.
    pub fn set_formats(&self, formats: &[wgpu::TextureFormat]) {
        *self.formats.borrow_mut() = formats.to_vec();
    }

    /// Delivers a device error through the registered handler, as the driver would.
    pub fn raise_device_error(&self, error: DeviceError) {
        let handler = self.error_handler.borrow().clone();
        if let Some(handler) = handler {
            handler(error);
        }
    }

    // ── inspection ────────────────────────────────────────────────────────

    pub fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.log.borrow_mut().clear();
    }

    pub fn count(&self, call: &Call) -> usize {
        self.log.borrow().iter().filter(|c| *c == call).count()
    }

    /// Clear colors of every recorded render pass, in order.
    pub fn clears(&self) -> Vec<wgpu::Color> {
        self.clears.borrow().clone()
    }

    pub fn live_textures(&self) -> usize {
        self.live.get()
    }

    pub fn max_live_textures(&self) -> usize {
        self.max_live.get()
    }

    fn record(&self, call: Call) {
        self.log.borrow_mut().push(call);
    }

    fn resolve<T: Send + 'static>(&self, result: Result<T, BackendFailure>, callback: Callback<T>) {
        if self.threaded_callbacks.get() {
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(10));
                callback(result);
            });
        } else {
            callback(result);
        }
    }
}

impl Backend for MockBackend {
    type Surface = MockSurface;
    type Adapter = MockAdapter;
    type Device = MockDevice;
    type Queue = MockQueue;
    type SurfaceTexture = MockTexture;
    type TextureView = MockView;
    type Buffer = MockBuffer;
    type ShaderModule = MockShader;
    type RenderPipeline = MockPipeline;
    type CommandBuffer = MockCommandBuffer;

    fn request_adapter(
        &self,
        _surface: &Self::Surface,
        _options: &AdapterOptions,
        callback: Callback<Self::Adapter>,
    ) {
        self.record(Call::RequestAdapter);
        if self.drop_adapter_callback.get() {
            drop(callback);
            return;
        }
        let result = match self.adapter_failure.borrow().clone() {
            Some(failure) => Err(failure),
            None => Ok(MockAdapter),
        };
        self.resolve(result, callback);
    }

    fn adapter_summary(&self, _adapter: &Self::Adapter) -> AdapterSummary {
        AdapterSummary {
            name: "mock adapter".to_string(),
            backend: "Noop".to_string(),
            device_type: "Cpu".to_string(),
            features: wgpu::Features::empty(),
            limits: wgpu::Limits::downlevel_defaults(),
        }
    }

    fn request_device(
        &self,
        _adapter: &Self::Adapter,
        _request: &DeviceRequest,
        callback: Callback<(Self::Device, Self::Queue)>,
    ) {
        self.record(Call::RequestDevice);
        let result = match self.device_failure.borrow().clone() {
            Some(failure) => Err(failure),
            None => Ok((MockDevice, MockQueue)),
        };
        self.resolve(result, callback);
    }

    fn set_error_handler(&self, _device: &Self::Device, handler: ErrorHandler) {
        self.record(Call::SetErrorHandler);
        *self.error_handler.borrow_mut() = Some(Arc::clone(&handler));
    }

    fn on_submitted_work_done(&self, _queue: &Self::Queue, callback: WorkDoneCallback) {
        self.record(Call::OnWorkDone);
        callback();
    }

    fn surface_capabilities(
        &self,
        _surface: &Self::Surface,
        _adapter: &Self::Adapter,
    ) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats: self.formats.borrow().clone(),
            present_modes: self.present_modes.borrow().clone(),
            alpha_modes: self.alpha_modes.borrow().clone(),
            usages: wgpu::TextureUsages::RENDER_ATTACHMENT,
        }
    }

    fn configure_surface(
        &self,
        _surface: &Self::Surface,
        _device: &Self::Device,
        config: &SurfaceConfig,
    ) {
        self.record(Call::Configure {
            width: config.width,
            height: config.height,
        });
    }

    fn acquire_texture(
        &self,
        _surface: &Self::Surface,
    ) -> Result<Self::SurfaceTexture, AcquireStatus> {
        self.record(Call::Acquire);
        let outcome = self.acquire_script.borrow_mut().pop_front().unwrap_or(Ok(()));
        outcome.map(|()| {
            self.live.set(self.live.get() + 1);
            self.max_live.set(self.max_live.get().max(self.live.get()));
            MockTexture {
                log: Rc::clone(&self.log),
                live: Rc::clone(&self.live),
            }
        })
    }

    fn create_view(&self, _texture: &Self::SurfaceTexture) -> Self::TextureView {
        self.record(Call::CreateView);
        MockView {
            log: Rc::clone(&self.log),
        }
    }

    fn is_suboptimal(&self, _texture: &Self::SurfaceTexture) -> bool {
        self.suboptimal.get()
    }

    fn present(&self, texture: Self::SurfaceTexture) {
        self.record(Call::Present);
        drop(texture);
    }

    fn create_shader_module(
        &self,
        _device: &Self::Device,
        _label: &str,
        _source: &str,
    ) -> Result<Self::ShaderModule, String> {
        self.record(Call::CreateShader);
        match self.shader_error.borrow().clone() {
            Some(message) => Err(message),
            None => Ok(MockShader),
        }
    }

    fn create_render_pipeline(
        &self,
        _device: &Self::Device,
        desc: &PipelineDesc<'_, Self>,
    ) -> Result<Self::RenderPipeline, String> {
        self.record(Call::CreatePipeline {
            format: desc.color_format,
        });
        if let Some(message) = self.pipeline_error.borrow().clone() {
            return Err(message);
        }
        Ok(MockPipeline {
            format: desc.color_format,
            vertex_entry: desc.vertex_entry.to_string(),
            fragment_entry: desc.fragment_entry.to_string(),
            stride: desc.vertex_layout.stride,
            attributes: desc.vertex_layout.attributes.clone(),
            blend: desc.blend,
            primitive: desc.primitive,
            multisample: desc.multisample,
        })
    }

    fn create_buffer(&self, _device: &Self::Device, desc: &BufferDesc<'_>) -> Self::Buffer {
        self.record(Call::CreateBuffer { size: desc.size });
        MockBuffer { size: desc.size }
    }

    fn write_buffer(&self, _queue: &Self::Queue, _buffer: &Self::Buffer, offset: u64, data: &[u8]) {
        self.record(Call::WriteBuffer {
            offset,
            len: data.len(),
        });
    }

    fn record_pass(&self, _device: &Self::Device, pass: &DrawPass<'_, Self>) -> Self::CommandBuffer {
        self.record(Call::RecordPass {
            vertex_count: pass.vertex_count,
        });
        self.clears.borrow_mut().push(pass.clear);
        MockCommandBuffer
    }

    fn submit(&self, _queue: &Self::Queue, _commands: Self::CommandBuffer) {
        self.record(Call::Submit);
    }
}
