use anyhow::{Context, Result};

use lumen_engine::backend::WgpuBackend;
use lumen_engine::logging::{LoggingConfig, init_logging};
use lumen_engine::render::Position2;
use lumen_engine::surface::Extent;
use lumen_engine::window::{WindowConfig, WinitHost};
use lumen_engine::{FrameScheduler, Session, SessionConfig};

const VERTICES: [Position2; 6] = [
    Position2::new(-0.5, -0.5),
    Position2::new(0.5, -0.5),
    Position2::new(0.0, 0.5),
    Position2::new(-0.55, -0.5),
    Position2::new(-0.05, 0.5),
    Position2::new(-0.55, 0.5),
];

fn main() {
    init_logging(LoggingConfig::default());

    if let Err(e) = run() {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut host = WinitHost::open(WindowConfig {
        title: "lumen demo".to_string(),
        size: Extent::new(200, 200),
        ..WindowConfig::default()
    })?;

    let config = SessionConfig::new(include_str!("triangle.wgsl"))
        .with_vertices(&VERTICES)
        .with_clear_color(wgpu::Color {
            r: 0.9,
            g: 0.1,
            b: 0.2,
            a: 1.0,
        });

    let backend = WgpuBackend::new(config.gpu.backends);
    let surface = backend
        .create_surface(host.window())
        .context("failed to create surface")?;

    let mut session = Session::start(&backend, surface, &host, &config)
        .context("failed to start rendering session")?;

    let stats = FrameScheduler::new(&config)
        .run(&backend, &mut session, &mut host)
        .context("frame loop failed")?;

    log::info!("exiting after {} frames", stats.presented);
    Ok(())
}
