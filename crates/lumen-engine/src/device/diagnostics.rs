use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::backend::DeviceError;

/// Running record of device errors reported after setup.
///
/// Written from the backend's error callback, read by the frame loop and the
/// host. Recording an error never stops the session by itself.
#[derive(Debug, Default)]
pub struct DeviceDiagnostics {
    errors: AtomicU64,
    last: Mutex<Option<DeviceError>>,
}

impl DeviceDiagnostics {
    pub fn error_count(&self) -> u64 {
        self.errors.load(Ordering::Acquire)
    }

    pub fn last_error(&self) -> Option<DeviceError> {
        self.last.lock().clone()
    }

    pub(crate) fn record(&self, error: DeviceError) {
        *self.last.lock() = Some(error);
        self.errors.fetch_add(1, Ordering::AcqRel);
    }
}
