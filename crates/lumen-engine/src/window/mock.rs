use std::cell::Cell;
use std::collections::VecDeque;

use crate::surface::Extent;

use super::{WindowEvent, WindowHost};

/// Window stand-in with a scripted event queue and a settable size.
pub struct MockWindow {
    events: VecDeque<WindowEvent>,
    size: Cell<Extent>,
    quit_after_cycles: Option<usize>,
}

impl MockWindow {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            events: VecDeque::new(),
            size: Cell::new(Extent::new(width, height)),
            quit_after_cycles: None,
        }
    }

    pub fn push(&mut self, event: WindowEvent) {
        self.events.push_back(event);
    }

    /// Changes the reported size without delivering an event.
    pub fn set_size(&self, width: u32, height: u32) {
        self.size.set(Extent::new(width, height));
    }

    /// Resizes the window and queues the matching event.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.set_size(width, height);
        self.push(WindowEvent::Resized { width, height });
    }

    /// Delivers `Quit` once `cycles` drain cycles have come up empty.
    pub fn quit_after_cycles(&mut self, cycles: usize) {
        self.quit_after_cycles = Some(cycles);
    }
}

impl WindowHost for MockWindow {
    fn poll_event(&mut self) -> Option<WindowEvent> {
        if let Some(event) = self.events.pop_front() {
            return Some(event);
        }

        match self.quit_after_cycles.as_mut() {
            Some(0) => Some(WindowEvent::Quit),
            Some(remaining) => {
                *remaining -= 1;
                None
            }
            None => None,
        }
    }

    fn size(&self) -> Extent {
        self.size.get()
    }
}
