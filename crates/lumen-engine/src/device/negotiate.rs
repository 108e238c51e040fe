use std::sync::Arc;

use crate::backend::{
    AdapterOptions, AdapterSummary, Backend, BackendFailure, DeviceError, DeviceRequest,
    RequestStatus,
};
use crate::error::{NegotiationError, NegotiationStage};
use crate::sync::AsyncRequest;

use super::DeviceDiagnostics;

/// Device, queue and the diagnostics fed by the device's error callback.
pub struct DeviceBundle<B: Backend> {
    pub device: B::Device,
    pub queue: B::Queue,
    pub diagnostics: Arc<DeviceDiagnostics>,
}

/// Requests an adapter compatible with `surface`, blocking until the backend answers.
pub fn request_adapter<B: Backend>(
    backend: &B,
    surface: &B::Surface,
    options: &AdapterOptions,
) -> Result<B::Adapter, NegotiationError> {
    let (request, completer) = AsyncRequest::new();
    backend.request_adapter(
        surface,
        options,
        Box::new(move |result| completer.complete(result)),
    );

    resolve(NegotiationStage::Adapter, request)
}

/// Requests a device and its queue from `adapter`, blocking until the backend answers.
///
/// On success the device's uncaptured-error callback is installed. It logs
/// each error and records it in the returned diagnostics; it never ends the
/// session.
pub fn request_device<B: Backend>(
    backend: &B,
    adapter: &B::Adapter,
    request: &DeviceRequest,
) -> Result<DeviceBundle<B>, NegotiationError> {
    let (pending, completer) = AsyncRequest::new();
    backend.request_device(
        adapter,
        request,
        Box::new(move |result| completer.complete(result)),
    );

    let (device, queue) = resolve(NegotiationStage::Device, pending)?;

    let diagnostics = Arc::new(DeviceDiagnostics::default());
    let sink = Arc::clone(&diagnostics);
    backend.set_error_handler(
        &device,
        Arc::new(move |error: DeviceError| {
            log::error!("device error ({:?}): {}", error.kind, error.message);
            sink.record(error);
        }),
    );

    Ok(DeviceBundle {
        device,
        queue,
        diagnostics,
    })
}

/// Logs what the negotiated adapter offers.
pub fn describe_adapter(summary: &AdapterSummary) {
    log::info!(
        "adapter: {} ({}, {}), {} features, max texture 2d {}, max buffer {} bytes",
        summary.name,
        summary.backend,
        summary.device_type,
        summary.features.iter().count(),
        summary.limits.max_texture_dimension_2d,
        summary.limits.max_buffer_size,
    );
    log::debug!("adapter features: {:?}", summary.features);
}

fn resolve<T>(
    stage: NegotiationStage,
    request: AsyncRequest<Result<T, BackendFailure>>,
) -> Result<T, NegotiationError> {
    let failure = match request.wait() {
        Ok(Ok(value)) => return Ok(value),
        Ok(Err(failure)) => failure,
        Err(e) => BackendFailure::new(RequestStatus::Unknown, e.to_string()),
    };

    log::error!("{stage} request failed ({:?}): {}", failure.status, failure.message);
    Err(NegotiationError {
        stage,
        status: failure.status,
        message: failure.message,
    })
}
