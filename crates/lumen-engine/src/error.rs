//! Error types for the engine.
//!
//! Negotiation, pipeline and upload failures surface as [`SessionError`]
//! while a session starts. Once frames are running, [`FrameError`] is the
//! only way the frame loop stops with an error.

use std::fmt;

use thiserror::Error;

use crate::backend::{AcquireStatus, RequestStatus};

/// Which asynchronous request a [`NegotiationError`] came from.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum NegotiationStage {
    Adapter,
    Device,
}

impl fmt::Display for NegotiationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Adapter => "adapter",
            Self::Device => "device",
        })
    }
}

/// An adapter or device request completed with a non-success status.
#[derive(Error, Debug, Clone)]
#[error("{stage} request failed ({status:?}): {message}")]
pub struct NegotiationError {
    pub stage: NegotiationStage,
    pub status: RequestStatus,
    /// The backend's message, unchanged.
    pub message: String,
}

#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum AcquireError {
    #[error("surface acquired before it was configured")]
    Unconfigured,

    /// Out of memory, device lost, or a status this build does not know.
    #[error("fatal surface status: {0:?}")]
    Fatal(AcquireStatus),
}

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum PipelineError {
    #[error("shader module `{label}` failed to compile: {message}")]
    ShaderCompilation { label: String, message: String },

    #[error("render pipeline `{label}` failed validation: {message}")]
    Creation { label: String, message: String },

    #[error("vertex layout has a zero stride")]
    ZeroStride,

    #[error("vertex attribute at location {location} ends at byte {end}, past the stride of {stride}")]
    AttributeOutOfStride { location: u32, end: u64, stride: u64 },
}

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum UploadError {
    #[error("write of {len} bytes at offset {offset} exceeds buffer size {size}")]
    OutOfBounds { offset: u64, len: u64, size: u64 },

    #[error("buffer `{label}` was not created with COPY_DST usage")]
    NotCopyDestination { label: String },

    #[error("write offset {offset} and length {len} must be multiples of 4")]
    Misaligned { offset: u64, len: u64 },

    #[error("buffer `{label}` would be empty")]
    Empty { label: String },
}

/// Failure while starting a [`Session`](crate::session::Session).
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Negotiation(#[from] NegotiationError),

    #[error("surface reports no formats compatible with the adapter")]
    NoSurfaceFormat,

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Upload(#[from] UploadError),
}

/// Condition that ends the frame loop with an error.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum FrameError {
    #[error(transparent)]
    Surface(#[from] AcquireError),

    #[error("device reported {count} errors, over the budget of {budget}")]
    DeviceErrorBudget { count: u64, budget: u64 },
}
