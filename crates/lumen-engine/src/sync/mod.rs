//! Synchronisation primitives for bridging backend callbacks.
//!
//! The GPU backend reports adapter/device negotiation through completion
//! callbacks. `AsyncRequest` turns such a callback into a value the issuing
//! thread can block on, with exactly-once semantics enforced by ownership.

mod request;

pub use request::{AsyncRequest, Completer, RequestError};
