use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Failure to obtain a value from an [`AsyncRequest`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum RequestError {
    /// The completer was dropped before it delivered a value.
    #[error("request callback was dropped without resolving")]
    Abandoned,

    /// `wait_timeout` elapsed before the request resolved.
    #[error("request did not resolve within {0:?}")]
    TimedOut(Duration),
}

enum Slot<T> {
    Pending,
    Ready(T),
    Abandoned,
}

struct Shared<T> {
    slot: Mutex<Slot<T>>,
    ready: Condvar,
}

/// Receiving half of a single-fire completion cell.
///
/// Created immediately before a native asynchronous call together with its
/// [`Completer`]. The completer moves into the backend callback; the request
/// stays with the issuing thread, which blocks in [`AsyncRequest::wait`].
///
/// Both halves are consumed by use, so a request can be completed at most once
/// and awaited at most once.
pub struct AsyncRequest<T> {
    shared: Arc<Shared<T>>,
}

/// Sending half of a single-fire completion cell.
///
/// Dropping a completer without calling [`Completer::complete`] resolves the
/// request as [`RequestError::Abandoned`], so a backend that never fires its
/// callback cannot hang the waiter.
pub struct Completer<T> {
    shared: Option<Arc<Shared<T>>>,
}

impl<T> AsyncRequest<T> {
    /// Creates a pending request and the completer that resolves it.
    pub fn new() -> (AsyncRequest<T>, Completer<T>) {
        let shared = Arc::new(Shared {
            slot: Mutex::new(Slot::Pending),
            ready: Condvar::new(),
        });

        (
            AsyncRequest {
                shared: Arc::clone(&shared),
            },
            Completer {
                shared: Some(shared),
            },
        )
    }

    /// Returns true once the completer delivered a value or was dropped.
    pub fn is_resolved(&self) -> bool {
        !matches!(*self.shared.slot.lock(), Slot::Pending)
    }

    /// Blocks until the request resolves.
    pub fn wait(self) -> Result<T, RequestError> {
        let mut slot = self.shared.slot.lock();
        // Loop guards against spurious wake-ups.
        while matches!(*slot, Slot::Pending) {
            self.shared.ready.wait(&mut slot);
        }
        take(&mut slot)
    }

    /// Blocks until the request resolves or `timeout` elapses.
    pub fn wait_timeout(self, timeout: Duration) -> Result<T, RequestError> {
        let deadline = Instant::now() + timeout;
        let mut slot = self.shared.slot.lock();
        while matches!(*slot, Slot::Pending) {
            if self.shared.ready.wait_until(&mut slot, deadline).timed_out()
                && matches!(*slot, Slot::Pending)
            {
                return Err(RequestError::TimedOut(timeout));
            }
        }
        take(&mut slot)
    }
}

fn take<T>(slot: &mut Slot<T>) -> Result<T, RequestError> {
    match std::mem::replace(slot, Slot::Abandoned) {
        Slot::Ready(value) => Ok(value),
        Slot::Abandoned => Err(RequestError::Abandoned),
        Slot::Pending => unreachable!("take() is only called on a resolved slot"),
    }
}

impl<T> Completer<T> {
    /// Resolves the request with `value` and wakes the waiter.
    pub fn complete(mut self, value: T) {
        if let Some(shared) = self.shared.take() {
            resolve(&shared, Slot::Ready(value));
        }
    }
}

impl<T> Drop for Completer<T> {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.take() {
            resolve(&shared, Slot::Abandoned);
        }
    }
}

fn resolve<T>(shared: &Shared<T>, value: Slot<T>) {
    let mut slot = shared.slot.lock();
    debug_assert!(matches!(*slot, Slot::Pending), "completion cell resolved twice");
    *slot = value;
    drop(slot);
    shared.ready.notify_all();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    // ── resolution ────────────────────────────────────────────────────────

    #[test]
    fn completes_on_same_thread_before_wait() {
        let (request, completer) = AsyncRequest::new();
        completer.complete(7u32);
        assert!(request.is_resolved());
        assert_eq!(request.wait(), Ok(7));
    }

    #[test]
    fn completes_from_another_thread() {
        let (request, completer) = AsyncRequest::new();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            completer.complete("adapter");
        });
        assert_eq!(request.wait(), Ok("adapter"));
        handle.join().unwrap();
    }

    #[test]
    fn wait_does_not_return_before_completion() {
        let (request, completer) = AsyncRequest::new();
        let completed = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&completed);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            flag.store(true, Ordering::SeqCst);
            completer.complete(());
        });

        request.wait().unwrap();
        assert!(completed.load(Ordering::SeqCst));
        handle.join().unwrap();
    }

    // ── failure ───────────────────────────────────────────────────────────

    #[test]
    fn dropped_completer_abandons_request() {
        let (request, completer) = AsyncRequest::<u8>::new();
        drop(completer);
        assert!(request.is_resolved());
        assert_eq!(request.wait(), Err(RequestError::Abandoned));
    }

    #[test]
    fn dropped_completer_on_other_thread_wakes_waiter() {
        let (request, completer) = AsyncRequest::<u8>::new();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            drop(completer);
        });
        assert_eq!(request.wait(), Err(RequestError::Abandoned));
        handle.join().unwrap();
    }

    #[test]
    fn wait_timeout_expires_while_pending() {
        let (request, _completer) = AsyncRequest::<u8>::new();
        let timeout = Duration::from_millis(15);
        assert_eq!(request.wait_timeout(timeout), Err(RequestError::TimedOut(timeout)));
    }

    #[test]
    fn wait_timeout_returns_ready_value() {
        let (request, completer) = AsyncRequest::new();
        completer.complete(3i32);
        assert_eq!(request.wait_timeout(Duration::from_millis(1)), Ok(3));
    }
}
