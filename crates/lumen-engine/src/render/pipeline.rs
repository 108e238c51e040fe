use crate::backend::{Backend, PipelineDesc};
use crate::error::PipelineError;

use super::VertexLayout;

/// Straight-alpha "over" on color; destination alpha is kept.
pub fn alpha_over_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::Zero,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

fn primitive_state() -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        strip_index_format: None,
        front_face: wgpu::FrontFace::Ccw,
        cull_mode: None,
        polygon_mode: wgpu::PolygonMode::Fill,
        unclipped_depth: false,
        conservative: false,
    }
}

fn multisample_state() -> wgpu::MultisampleState {
    wgpu::MultisampleState {
        count: 1,
        mask: !0,
        alpha_to_coverage_enabled: false,
    }
}

/// Assembles the session's render pipeline from WGSL source.
///
/// The pipeline is built once against the surface format chosen at startup
/// and never updated. Its layout is derived from the shader.
#[derive(Debug, Clone)]
pub struct PipelineBuilder<'a> {
    label: &'a str,
    shader_source: &'a str,
    vertex_entry: &'a str,
    fragment_entry: &'a str,
    vertex_layout: VertexLayout,
    color_format: wgpu::TextureFormat,
    blend: wgpu::BlendState,
}

impl<'a> PipelineBuilder<'a> {
    pub fn new(label: &'a str, shader_source: &'a str, color_format: wgpu::TextureFormat) -> Self {
        Self {
            label,
            shader_source,
            vertex_entry: "vs_main",
            fragment_entry: "fs_main",
            vertex_layout: VertexLayout::position2d(),
            color_format,
            blend: alpha_over_blend(),
        }
    }

    pub fn entry_points(mut self, vertex: &'a str, fragment: &'a str) -> Self {
        self.vertex_entry = vertex;
        self.fragment_entry = fragment;
        self
    }

    pub fn vertex_layout(mut self, layout: VertexLayout) -> Self {
        self.vertex_layout = layout;
        self
    }

    pub fn blend(mut self, blend: wgpu::BlendState) -> Self {
        self.blend = blend;
        self
    }

    /// Validates the vertex layout, compiles the shader and creates the pipeline.
    pub fn build<B: Backend>(
        &self,
        backend: &B,
        device: &B::Device,
    ) -> Result<B::RenderPipeline, PipelineError> {
        self.vertex_layout.validate()?;

        let module = backend
            .create_shader_module(device, self.label, self.shader_source)
            .map_err(|message| {
                log::error!("shader `{}` failed to compile:\n{message}", self.label);
                PipelineError::ShaderCompilation {
                    label: self.label.to_string(),
                    message,
                }
            })?;

        let desc = PipelineDesc::<B> {
            label: self.label,
            module: &module,
            vertex_entry: self.vertex_entry,
            fragment_entry: self.fragment_entry,
            vertex_layout: &self.vertex_layout,
            color_format: self.color_format,
            blend: self.blend,
            primitive: primitive_state(),
            multisample: multisample_state(),
        };

        let pipeline = backend
            .create_render_pipeline(device, &desc)
            .map_err(|message| {
                log::error!("render pipeline `{}` failed validation: {message}", self.label);
                PipelineError::Creation {
                    label: self.label.to_string(),
                    message,
                }
            })?;

        log::debug!(
            "render pipeline `{}` built for {:?}",
            self.label,
            self.color_format
        );
        Ok(pipeline)
    }
}
