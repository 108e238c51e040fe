//! Window collaborator boundary.
//!
//! The session never owns the platform window. It consumes a `WindowHost`:
//! a non-blocking event source plus the window's current pixel size.
//! `WinitHost` provides one on top of winit's pump-events mode.

mod host;
#[cfg(feature = "winit")]
mod winit_host;

#[cfg(test)]
pub(crate) mod mock;

pub use host::{WindowEvent, WindowHost};
#[cfg(feature = "winit")]
pub use winit_host::{WindowConfig, WinitHost};
