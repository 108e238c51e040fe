use crate::device::GpuInit;

/// Size in physical pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// wgpu cannot configure a surface with a zero dimension.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Surface configuration: the presentable size plus the negotiated presentation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
    pub present_mode: wgpu::PresentMode,
    pub alpha_mode: wgpu::CompositeAlphaMode,
    pub usage: wgpu::TextureUsages,

    /// Hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl SurfaceConfig {
    /// Builds the configuration for a surface from its capabilities and the init preferences.
    ///
    /// Returns `None` when the surface reports no formats (incompatible adapter).
    pub fn from_capabilities(
        caps: &wgpu::SurfaceCapabilities,
        init: &GpuInit,
        size: Extent,
    ) -> Option<Self> {
        let format = choose_surface_format(caps, init.prefer_srgb)?;

        Some(Self {
            width: size.width,
            height: size.height,
            format,
            present_mode: choose_present_mode(caps, init.present_mode),
            alpha_mode: choose_alpha_mode(caps, init.alpha_mode),
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        })
    }

    #[inline]
    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }
}

pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if prefer_srgb {
        if let Some(f) = caps.formats.iter().copied().find(|f| f.is_srgb()) {
            return Some(f);
        }
    }

    // The first entry is the surface's preferred format.
    caps.formats.first().copied()
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// FIFO is the only mode every surface must support.
pub(crate) fn choose_present_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: wgpu::PresentMode,
) -> wgpu::PresentMode {
    if caps.present_modes.contains(&requested) {
        requested
    } else {
        log::debug!("present mode {requested:?} unsupported; falling back to Fifo");
        wgpu::PresentMode::Fifo
    }
}
