use crate::backend::{Backend, BufferDesc};
use crate::error::UploadError;

/// A GPU buffer together with the size and usage it was created with.
pub struct GpuBuffer<B: Backend> {
    raw: B::Buffer,
    size: u64,
    usage: wgpu::BufferUsages,
    label: String,
}

impl<B: Backend> GpuBuffer<B> {
    pub fn raw(&self) -> &B::Buffer {
        &self.raw
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn usage(&self) -> wgpu::BufferUsages {
        self.usage
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Creates a buffer of `size` bytes. Contents are undefined until written.
pub fn create_buffer<B: Backend>(
    backend: &B,
    device: &B::Device,
    label: &str,
    size: u64,
    usage: wgpu::BufferUsages,
) -> GpuBuffer<B> {
    let raw = backend.create_buffer(device, &BufferDesc { label, size, usage });
    log::debug!("buffer `{label}` created: {size} bytes, {usage:?}");

    GpuBuffer {
        raw,
        size,
        usage,
        label: label.to_string(),
    }
}

/// Creates a `COPY_DST` buffer sized to `contents` and uploads them.
///
/// Empty contents are rejected; a zero-sized buffer cannot be bound.
pub fn create_buffer_init<B: Backend>(
    backend: &B,
    device: &B::Device,
    queue: &B::Queue,
    label: &str,
    contents: &[u8],
    usage: wgpu::BufferUsages,
) -> Result<GpuBuffer<B>, UploadError> {
    if contents.is_empty() {
        return Err(UploadError::Empty {
            label: label.to_string(),
        });
    }

    let buffer = create_buffer(
        backend,
        device,
        label,
        contents.len() as u64,
        usage | wgpu::BufferUsages::COPY_DST,
    );
    write_buffer(backend, queue, &buffer, 0, contents)?;
    Ok(buffer)
}

/// Queues a write of `data` at `offset`.
///
/// Every check happens before the backend is called: the range must lie
/// inside the buffer, the buffer must allow copies into it, and offset and
/// length must be multiples of [`wgpu::COPY_BUFFER_ALIGNMENT`].
pub fn write_buffer<B: Backend>(
    backend: &B,
    queue: &B::Queue,
    buffer: &GpuBuffer<B>,
    offset: u64,
    data: &[u8],
) -> Result<(), UploadError> {
    let len = data.len() as u64;

    match offset.checked_add(len) {
        Some(end) if end <= buffer.size => {}
        _ => {
            return Err(UploadError::OutOfBounds {
                offset,
                len,
                size: buffer.size,
            });
        }
    }

    if !buffer.usage.contains(wgpu::BufferUsages::COPY_DST) {
        return Err(UploadError::NotCopyDestination {
            label: buffer.label.clone(),
        });
    }

    if offset % wgpu::COPY_BUFFER_ALIGNMENT != 0 || len % wgpu::COPY_BUFFER_ALIGNMENT != 0 {
        return Err(UploadError::Misaligned { offset, len });
    }

    backend.write_buffer(queue, &buffer.raw, offset, data);
    log::trace!("wrote {len} bytes to `{}` at {offset}", buffer.label);
    Ok(())
}

/// Registers a one-shot notification logged once the queue has finished
/// everything submitted so far.
pub fn notify_when_done<B: Backend>(backend: &B, queue: &B::Queue, label: &str) {
    let label = label.to_string();
    backend.on_submitted_work_done(
        queue,
        Box::new(move || log::info!("queue work done: {label}")),
    );
}
