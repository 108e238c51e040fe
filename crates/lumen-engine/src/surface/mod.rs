//! Presentation surface management.
//!
//! This module is responsible for:
//! - choosing the surface configuration from adapter capabilities
//! - (re)configuring the surface after resizes and stale acquisitions
//! - acquiring per-frame textures and releasing them after presentation

mod config;
mod manager;

pub use config::{Extent, SurfaceConfig};
pub use manager::{Acquired, SkipReason, SurfaceFrame, SurfaceManager, SurfaceState};
