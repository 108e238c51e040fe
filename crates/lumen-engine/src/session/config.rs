use std::time::Duration;

use bytemuck::Pod;

use crate::device::GpuInit;
use crate::render::VertexLayout;

/// Everything a [`Session`](super::Session) needs to start and run.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Label given to the device.
    pub label: String,

    pub gpu: GpuInit,

    /// WGSL source with `vs_main` and `fs_main` entry points.
    pub shader: String,

    pub vertex_layout: VertexLayout,

    /// Raw vertex bytes, uploaded once at startup.
    pub vertices: Vec<u8>,

    pub clear_color: wgpu::Color,

    /// Target time between frame starts.
    pub frame_interval: Duration,

    /// Device errors tolerated before the frame loop stops. `None` never stops.
    pub max_device_errors: Option<u64>,
}

impl SessionConfig {
    pub fn new(shader: impl Into<String>) -> Self {
        Self {
            label: "lumen device".to_string(),
            gpu: GpuInit::default(),
            shader: shader.into(),
            vertex_layout: VertexLayout::position2d(),
            vertices: Vec::new(),
            clear_color: wgpu::Color::BLACK,
            frame_interval: Duration::from_millis(16),
            max_device_errors: None,
        }
    }

    pub fn with_vertices<V: Pod>(mut self, vertices: &[V]) -> Self {
        self.vertices = bytemuck::cast_slice(vertices).to_vec();
        self
    }

    pub fn with_clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Number of whole vertices in the payload under the configured stride.
    pub fn vertex_count(&self) -> u32 {
        let count = (self.vertices.len() as u64)
            .checked_div(self.vertex_layout.stride)
            .unwrap_or(0);
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Position2;

    #[test]
    fn vertex_count_follows_stride() {
        let config = SessionConfig::new("").with_vertices(&[
            Position2::new(0.0, 0.0),
            Position2::new(1.0, 0.0),
            Position2::new(0.0, 1.0),
        ]);
        assert_eq!(config.vertices.len(), 24);
        assert_eq!(config.vertex_count(), 3);
    }

    #[test]
    fn zero_stride_counts_nothing() {
        let mut config = SessionConfig::new("").with_vertices(&[Position2::new(0.0, 0.0)]);
        config.vertex_layout.stride = 0;
        assert_eq!(config.vertex_count(), 0);
    }
}
