//! The session: every GPU handle plus the frame loop that drives them.

mod config;
mod context;
mod scheduler;

pub use config::SessionConfig;
pub use context::{FrameOutcome, Session};
pub use scheduler::{FrameScheduler, FrameStats, StepOutcome};
