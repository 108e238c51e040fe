//! Frame pacing.
//!
//! One `FramePacer` per frame loop; call `wait()` once at the end of every
//! iteration.

mod pacer;

pub use pacer::{FramePacer, FrameTime};
