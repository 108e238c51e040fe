use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::surface::SurfaceConfig;

use super::{
    AcquireStatus, AdapterOptions, AdapterSummary, Backend, BackendFailure, BufferDesc, Callback,
    DeviceError, DeviceErrorKind, DeviceRequest, DrawPass, ErrorHandler, PipelineDesc,
    RequestStatus, WorkDoneCallback,
};

/// `Backend` implementation on top of wgpu.
///
/// Owns the `wgpu::Instance`. On native targets wgpu resolves adapter and
/// device futures without an external executor, so requests are driven with
/// `pollster` and their callbacks fire before the request call returns.
pub struct WgpuBackend {
    /// wgpu instance used to create the adapter and surface.
    instance: wgpu::Instance,

    /// Set by the device-lost callback; reported by the next acquisition.
    device_lost: Arc<AtomicBool>,
}

impl WgpuBackend {
    pub fn new(backends: wgpu::Backends) -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        Self {
            instance,
            device_lost: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates a surface for a window-like target.
    ///
    /// Pass an owning handle (e.g. `Arc<winit::window::Window>`) so the surface
    /// does not borrow the window.
    pub fn create_surface(
        &self,
        target: impl Into<wgpu::SurfaceTarget<'static>>,
    ) -> Result<wgpu::Surface<'static>, wgpu::CreateSurfaceError> {
        self.instance.create_surface(target)
    }

    pub fn instance(&self) -> &wgpu::Instance {
        &self.instance
    }
}

impl Default for WgpuBackend {
    fn default() -> Self {
        Self::new(wgpu::Backends::all())
    }
}

impl Backend for WgpuBackend {
    type Surface = wgpu::Surface<'static>;
    type Adapter = wgpu::Adapter;
    type Device = wgpu::Device;
    type Queue = wgpu::Queue;
    type SurfaceTexture = wgpu::SurfaceTexture;
    type TextureView = wgpu::TextureView;
    type Buffer = wgpu::Buffer;
    type ShaderModule = wgpu::ShaderModule;
    type RenderPipeline = wgpu::RenderPipeline;
    type CommandBuffer = wgpu::CommandBuffer;

    fn request_adapter(
        &self,
        surface: &Self::Surface,
        options: &AdapterOptions,
        callback: Callback<Self::Adapter>,
    ) {
        let result = pollster::block_on(self.instance.request_adapter(
            &wgpu::RequestAdapterOptions {
                power_preference: options.power_preference,
                compatible_surface: Some(surface),
                force_fallback_adapter: options.force_fallback_adapter,
            },
        ));

        callback(result.map_err(|e| BackendFailure::new(RequestStatus::Unavailable, e.to_string())));
    }

    fn adapter_summary(&self, adapter: &Self::Adapter) -> AdapterSummary {
        let info = adapter.get_info();
        AdapterSummary {
            name: info.name,
            backend: format!("{:?}", info.backend),
            device_type: format!("{:?}", info.device_type),
            features: adapter.features(),
            limits: adapter.limits(),
        }
    }

    fn request_device(
        &self,
        adapter: &Self::Adapter,
        request: &DeviceRequest,
        callback: Callback<(Self::Device, Self::Queue)>,
    ) {
        let result = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some(request.label.as_str()),
            required_features: request.required_features,
            required_limits: request.required_limits.clone(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        }));

        if let Ok((device, _)) = &result {
            let lost = Arc::clone(&self.device_lost);
            device.set_device_lost_callback(move |reason, message| {
                if matches!(reason, wgpu::DeviceLostReason::Destroyed) {
                    log::debug!("device destroyed: {message}");
                } else {
                    log::error!("device lost ({reason:?}): {message}");
                    lost.store(true, Ordering::Release);
                }
            });
        }

        callback(result.map_err(|e| BackendFailure::new(RequestStatus::Error, e.to_string())));
    }

    fn set_error_handler(&self, device: &Self::Device, handler: ErrorHandler) {
        device.on_uncaptured_error(Arc::new(move |err: wgpu::Error| {
            #[allow(unreachable_patterns)]
            let kind = match &err {
                wgpu::Error::OutOfMemory { .. } => DeviceErrorKind::OutOfMemory,
                wgpu::Error::Validation { .. } => DeviceErrorKind::Validation,
                wgpu::Error::Internal { .. } => DeviceErrorKind::Internal,
                _ => DeviceErrorKind::Unknown,
            };
            handler(DeviceError {
                kind,
                message: err.to_string(),
            });
        }));
    }

    fn on_submitted_work_done(&self, queue: &Self::Queue, callback: WorkDoneCallback) {
        queue.on_submitted_work_done(callback);
    }

    fn surface_capabilities(
        &self,
        surface: &Self::Surface,
        adapter: &Self::Adapter,
    ) -> wgpu::SurfaceCapabilities {
        surface.get_capabilities(adapter)
    }

    fn configure_surface(
        &self,
        surface: &Self::Surface,
        device: &Self::Device,
        config: &SurfaceConfig,
    ) {
        surface.configure(
            device,
            &wgpu::SurfaceConfiguration {
                usage: config.usage,
                format: config.format,
                width: config.width,
                height: config.height,
                present_mode: config.present_mode,
                alpha_mode: config.alpha_mode,
                view_formats: vec![],
                desired_maximum_frame_latency: config.desired_maximum_frame_latency,
            },
        );
    }

    #[allow(unreachable_patterns)]
    fn acquire_texture(
        &self,
        surface: &Self::Surface,
    ) -> Result<Self::SurfaceTexture, AcquireStatus> {
        if self.device_lost.load(Ordering::Acquire) {
            return Err(AcquireStatus::DeviceLost);
        }

        surface.get_current_texture().map_err(|err| match err {
            wgpu::SurfaceError::Timeout => AcquireStatus::Timeout,
            wgpu::SurfaceError::Outdated => AcquireStatus::Outdated,
            wgpu::SurfaceError::Lost => AcquireStatus::Lost,
            wgpu::SurfaceError::OutOfMemory => AcquireStatus::OutOfMemory,
            _ => AcquireStatus::Unrecognized,
        })
    }

    fn create_view(&self, texture: &Self::SurfaceTexture) -> Self::TextureView {
        texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn is_suboptimal(&self, texture: &Self::SurfaceTexture) -> bool {
        texture.suboptimal
    }

    fn present(&self, texture: Self::SurfaceTexture) {
        texture.present();
    }

    fn create_shader_module(
        &self,
        device: &Self::Device,
        label: &str,
        source: &str,
    ) -> Result<Self::ShaderModule, String> {
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let info = pollster::block_on(module.get_compilation_info());
        let errors: Vec<String> = info
            .messages
            .iter()
            .filter(|m| matches!(m.message_type, wgpu::CompilationMessageType::Error))
            .map(|m| match &m.location {
                Some(loc) => format!("{}:{}: {}", loc.line_number, loc.line_position, m.message),
                None => m.message.clone(),
            })
            .collect();

        if errors.is_empty() {
            Ok(module)
        } else {
            Err(errors.join("\n"))
        }
    }

    fn create_render_pipeline(
        &self,
        device: &Self::Device,
        desc: &PipelineDesc<'_, Self>,
    ) -> Result<Self::RenderPipeline, String> {
        // Validation errors are captured here instead of reaching the uncaptured handler.
        let error_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            // Derived from the shader; the pipeline has no bind groups.
            layout: None,

            vertex: wgpu::VertexState {
                module: desc.module,
                entry_point: Some(desc.vertex_entry),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: desc.vertex_layout.stride,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &desc.vertex_layout.attributes,
                }],
            },

            fragment: Some(wgpu::FragmentState {
                module: desc.module,
                entry_point: Some(desc.fragment_entry),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: desc.color_format,
                    blend: Some(desc.blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: desc.primitive,
            depth_stencil: None,
            multisample: desc.multisample,
            multiview_mask: None,
            cache: None,
        });

        match pollster::block_on(error_scope.pop()) {
            Some(err) => Err(err.to_string()),
            None => Ok(pipeline),
        }
    }

    fn create_buffer(&self, device: &Self::Device, desc: &BufferDesc<'_>) -> Self::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(desc.label),
            size: desc.size,
            usage: desc.usage,
            mapped_at_creation: false,
        })
    }

    fn write_buffer(&self, queue: &Self::Queue, buffer: &Self::Buffer, offset: u64, data: &[u8]) {
        queue.write_buffer(buffer, offset, data);
    }

    fn record_pass(&self, device: &Self::Device, pass: &DrawPass<'_, Self>) -> Self::CommandBuffer {
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("lumen frame encoder"),
        });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(pass.label),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: pass.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(pass.clear),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(pass.pipeline);
            // wgpu rejects empty buffer slices; with nothing to draw only the clear runs.
            if pass.vertex_count > 0 {
                rpass.set_vertex_buffer(0, pass.vertex_buffer.slice(..));
                rpass.draw(0..pass.vertex_count, 0..1);
            }
        }

        encoder.finish()
    }

    fn submit(&self, queue: &Self::Queue, commands: Self::CommandBuffer) {
        queue.submit(std::iter::once(commands));
    }
}
