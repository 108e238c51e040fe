//! Pipeline construction and buffer uploads.
//!
//! Convention: vertex positions are in clip space; the pipeline has no
//! bind groups and a single vertex buffer at slot 0.

mod pipeline;
mod upload;
mod vertex;

pub use pipeline::{PipelineBuilder, alpha_over_blend};
pub use upload::{GpuBuffer, create_buffer, create_buffer_init, notify_when_done, write_buffer};
pub use vertex::{Position2, VertexLayout};
