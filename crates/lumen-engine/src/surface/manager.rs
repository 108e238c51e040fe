use crate::backend::{AcquireStatus, Backend};
use crate::error::AcquireError;
use crate::window::WindowHost;

use super::{Extent, SurfaceConfig};

/// Configuration state of the managed surface.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceState {
    /// No configuration has been applied yet. Acquisition is invalid.
    Unconfigured,
    /// The surface matches the last known window size.
    Configured,
    /// The next acquisition must reconfigure first (resize, transient failure,
    /// suboptimal present, or a deferred zero-sized configuration).
    NeedsReconfigure,
}

/// Why an acquisition produced no frame. The frame loop just moves on.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SkipReason {
    /// The retry after reconfiguring was still transient.
    Transient(AcquireStatus),
    /// The window currently has a zero dimension (e.g. minimised).
    ZeroSized,
}

/// Result of a successful call to [`SurfaceManager::acquire_next_frame`].
pub enum Acquired<'s, B: Backend> {
    Frame(SurfaceFrame<'s, B>),
    Skipped(SkipReason),
}

/// Owns the surface, its configuration and the resize/acquire state machine.
///
/// Both resize triggers (a window resize event and a transient acquisition
/// status) end up in [`SurfaceManager::reconfigure`] with the window's size at
/// that instant. A resize event itself only marks the surface; the next
/// acquisition applies it.
pub struct SurfaceManager<B: Backend> {
    surface: B::Surface,
    config: Option<SurfaceConfig>,
    state: SurfaceState,
}

impl<B: Backend> SurfaceManager<B> {
    pub fn new(surface: B::Surface) -> Self {
        Self {
            surface,
            config: None,
            state: SurfaceState::Unconfigured,
        }
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn config(&self) -> Option<&SurfaceConfig> {
        self.config.as_ref()
    }

    pub fn surface(&self) -> &B::Surface {
        &self.surface
    }

    /// Applies `config` to the surface. Valid from any state; idempotent.
    ///
    /// A zero-sized configuration is recorded but not applied (wgpu rejects
    /// it); the surface stays `NeedsReconfigure` until the window has an area.
    pub fn configure(&mut self, backend: &B, device: &B::Device, config: SurfaceConfig) {
        if config.extent().is_empty() {
            log::debug!(
                "surface size {}x{} is empty; configuration deferred",
                config.width,
                config.height
            );
            self.config = Some(config);
            self.state = SurfaceState::NeedsReconfigure;
            return;
        }

        backend.configure_surface(&self.surface, device, &config);
        log::debug!(
            "surface configured: {}x{} {:?} {:?}",
            config.width,
            config.height,
            config.format,
            config.present_mode
        );

        self.config = Some(config);
        self.state = SurfaceState::Configured;
    }

    /// Re-applies the current configuration at `size`.
    ///
    /// This is the only resize path. Does nothing before the first `configure`.
    pub fn reconfigure(&mut self, backend: &B, device: &B::Device, size: Extent) {
        let Some(current) = self.config.as_ref() else {
            return;
        };

        let config = SurfaceConfig {
            width: size.width,
            height: size.height,
            ..current.clone()
        };
        self.configure(backend, device, config);
    }

    /// Records that the window changed size. The next acquisition reconfigures.
    pub fn mark_needs_reconfigure(&mut self) {
        if self.state == SurfaceState::Configured {
            self.state = SurfaceState::NeedsReconfigure;
        }
    }

    /// Acquires the next presentable frame.
    ///
    /// Transient statuses trigger one reconfigure (with `window.size()` read at
    /// that moment) and one retry. Fatal statuses are returned as errors and
    /// the caller must stop rendering.
    ///
    /// The returned frame borrows the manager, so a second acquisition cannot
    /// start before the previous frame has been presented or dropped.
    pub fn acquire_next_frame<W>(
        &mut self,
        backend: &B,
        device: &B::Device,
        window: &W,
    ) -> Result<Acquired<'_, B>, AcquireError>
    where
        W: WindowHost + ?Sized,
    {
        match self.state {
            SurfaceState::Unconfigured => return Err(AcquireError::Unconfigured),
            SurfaceState::NeedsReconfigure => {
                self.reconfigure(backend, device, window.size());
                if self.state != SurfaceState::Configured {
                    return Ok(Acquired::Skipped(SkipReason::ZeroSized));
                }
            }
            SurfaceState::Configured => {}
        }

        let mut retried = false;
        let texture = loop {
            match backend.acquire_texture(&self.surface) {
                Ok(texture) => break texture,
                Err(status) if !status.is_transient() => {
                    log::error!("surface acquisition failed fatally: {status:?}");
                    return Err(AcquireError::Fatal(status));
                }
                Err(status) if retried => {
                    log::warn!("surface still {status:?} after reconfigure; skipping frame");
                    self.state = SurfaceState::NeedsReconfigure;
                    return Ok(Acquired::Skipped(SkipReason::Transient(status)));
                }
                Err(status) => {
                    log::debug!("surface acquisition returned {status:?}; reconfiguring");
                    retried = true;
                    self.state = SurfaceState::NeedsReconfigure;
                    self.reconfigure(backend, device, window.size());
                    if self.state != SurfaceState::Configured {
                        return Ok(Acquired::Skipped(SkipReason::ZeroSized));
                    }
                }
            }
        };

        let view = backend.create_view(&texture);
        Ok(Acquired::Frame(SurfaceFrame {
            view,
            texture,
            state: &mut self.state,
        }))
    }
}

/// One acquired frame: the surface texture and a view over it.
///
/// Short-lived. Present it with [`SurfaceFrame::present`]; dropping it without
/// presenting releases the view and the texture unpresented.
pub struct SurfaceFrame<'s, B: Backend> {
    // Field order is drop order: view before texture.
    view: B::TextureView,
    texture: B::SurfaceTexture,
    state: &'s mut SurfaceState,
}

impl<'s, B: Backend> SurfaceFrame<'s, B> {
    pub fn view(&self) -> &B::TextureView {
        &self.view
    }

    /// Releases the view, then presents the texture.
    ///
    /// A suboptimal texture is still presented; the surface is marked for
    /// reconfiguration so the next acquisition refreshes it.
    pub fn present(self, backend: &B) {
        let SurfaceFrame {
            view,
            texture,
            state,
        } = self;

        if backend.is_suboptimal(&texture) && *state == SurfaceState::Configured {
            log::debug!("surface texture is suboptimal; reconfiguring on next acquire");
            *state = SurfaceState::NeedsReconfigure;
        }

        drop(view);
        backend.present(texture);
    }
}
