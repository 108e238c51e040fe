//! Adapter/device negotiation.
//!
//! This module is responsible for:
//! - requesting a surface-compatible adapter and a device from it
//! - wiring the device's uncaptured-error callback to the log and diagnostics
//! - the GPU initialization parameters shared by the session

mod diagnostics;
mod init;
mod negotiate;

pub use diagnostics::DeviceDiagnostics;
pub use init::GpuInit;
pub use negotiate::{DeviceBundle, describe_adapter, request_adapter, request_device};
