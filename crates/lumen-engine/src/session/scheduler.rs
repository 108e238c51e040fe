use crate::backend::Backend;
use crate::error::FrameError;
use crate::surface::SkipReason;
use crate::time::FramePacer;
use crate::window::{WindowEvent, WindowHost};

use super::{FrameOutcome, Session, SessionConfig};

/// Result of one loop iteration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StepOutcome {
    Presented,
    Skipped(SkipReason),
    Quit,
}

/// Frame counts for a finished run.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    pub presented: u64,
    pub skipped: u64,
}

/// The frame loop.
///
/// Each iteration drains window events, renders at most one frame and then
/// paces. It is the only loop in the program; quitting and fatal errors both
/// return from [`FrameScheduler::run`] so the owner can tear the session down.
pub struct FrameScheduler {
    pacer: FramePacer,
    max_device_errors: Option<u64>,
}

impl FrameScheduler {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            pacer: FramePacer::new(config.frame_interval),
            max_device_errors: config.max_device_errors,
        }
    }

    /// One iteration without pacing.
    pub fn step<B, W>(
        &mut self,
        backend: &B,
        session: &mut Session<B>,
        window: &mut W,
    ) -> Result<StepOutcome, FrameError>
    where
        B: Backend,
        W: WindowHost + ?Sized,
    {
        while let Some(event) = window.poll_event() {
            match event {
                WindowEvent::Quit => {
                    log::info!("quit requested");
                    return Ok(StepOutcome::Quit);
                }
                WindowEvent::Resized { width, height } => {
                    log::debug!("window resized to {width}x{height}");
                    session.mark_resized();
                }
                WindowEvent::Other => {}
            }
        }

        if let Some(budget) = self.max_device_errors {
            let count = session.diagnostics().error_count();
            if count > budget {
                log::error!("device error budget exceeded: {count} > {budget}");
                return Err(FrameError::DeviceErrorBudget { count, budget });
            }
        }

        let outcome = session.render_frame(backend, &*window)?;
        Ok(match outcome {
            FrameOutcome::Presented => StepOutcome::Presented,
            FrameOutcome::Skipped(reason) => StepOutcome::Skipped(reason),
        })
    }

    /// Runs until quit or a fatal error, pacing between iterations.
    pub fn run<B, W>(
        &mut self,
        backend: &B,
        session: &mut Session<B>,
        window: &mut W,
    ) -> Result<FrameStats, FrameError>
    where
        B: Backend,
        W: WindowHost + ?Sized,
    {
        let mut stats = FrameStats::default();
        self.pacer.reset();

        loop {
            match self.step(backend, session, window) {
                Ok(StepOutcome::Presented) => stats.presented += 1,
                Ok(StepOutcome::Skipped(_)) => stats.skipped += 1,
                Ok(StepOutcome::Quit) => break,
                Err(e) => {
                    log::error!("frame loop stopped: {e}");
                    return Err(e);
                }
            }

            let time = self.pacer.wait();
            log::trace!("frame {} dt {:?}", time.frame_index, time.dt);
        }

        log::info!(
            "frame loop finished: {} presented, {} skipped",
            stats.presented,
            stats.skipped
        );
        Ok(stats)
    }
}
