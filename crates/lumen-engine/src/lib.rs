//! Lumen engine crate.
//!
//! A single-window rendering core over wgpu: adapter/device negotiation, a
//! resize-aware surface, one render pipeline, vertex uploads and the frame
//! loop that ties them together.

pub mod backend;
pub mod device;
pub mod error;
pub mod logging;
pub mod render;
pub mod session;
pub mod surface;
pub mod sync;
pub mod time;
pub mod window;

pub use error::{
    AcquireError, FrameError, NegotiationError, NegotiationStage, PipelineError, SessionError,
    UploadError,
};
pub use session::{FrameScheduler, Session, SessionConfig};
