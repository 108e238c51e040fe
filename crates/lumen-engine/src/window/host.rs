use crate::surface::Extent;

/// Window/input event as seen by the frame loop.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WindowEvent {
    /// The user or platform asked the application to close.
    Quit,
    /// The window's drawable area changed (physical pixels).
    Resized { width: u32, height: u32 },
    /// Anything the frame loop does not react to.
    Other,
}

/// Event source and size oracle for the window a session renders into.
pub trait WindowHost {
    /// Returns the next pending event without blocking.
    ///
    /// `None` means the queue is drained for this iteration.
    fn poll_event(&mut self) -> Option<WindowEvent>;

    /// Current drawable size in physical pixels.
    fn size(&self) -> Extent;
}
