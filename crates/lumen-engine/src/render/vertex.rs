use bytemuck::{Pod, Zeroable};

use crate::error::PipelineError;

/// A 2D position in clip space.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Position2 {
    pub pos: [f32; 2],
}

impl Position2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { pos: [x, y] }
    }
}

/// Layout of the single per-vertex buffer bound at slot 0.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexLayout {
    pub stride: u64,
    pub attributes: Vec<wgpu::VertexAttribute>,
}

impl VertexLayout {
    pub fn new(stride: u64, attributes: impl Into<Vec<wgpu::VertexAttribute>>) -> Self {
        Self {
            stride,
            attributes: attributes.into(),
        }
    }

    /// One `Float32x2` position at location 0, tightly packed.
    pub fn position2d() -> Self {
        Self::new(
            std::mem::size_of::<Position2>() as u64,
            wgpu::vertex_attr_array![0 => Float32x2],
        )
    }

    /// Checks the layout before anything is handed to the backend.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.stride == 0 {
            return Err(PipelineError::ZeroStride);
        }

        for attr in &self.attributes {
            let end = attr.offset + attr.format.size();
            if end > self.stride {
                return Err(PipelineError::AttributeOutOfStride {
                    location: attr.shader_location,
                    end,
                    stride: self.stride,
                });
            }
        }

        Ok(())
    }
}

impl Default for VertexLayout {
    fn default() -> Self {
        Self::position2d()
    }
}
