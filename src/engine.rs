//! The engine: GPU context, frame driver, and the active workload.

use std::time::{Duration, Instant};

use crate::config::{Config, DemoKind};
use crate::driver::{FrameDriver, Workload};
use crate::error::EngineError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::texture::DepthTarget;
use crate::util::frame_pacer::FramePacer;
use crate::workload;

/// How often the smoothed FPS is reported to the log.
const FPS_LOG_INTERVAL: Duration = Duration::from_secs(5);

/// Owns every handle needed to step a workload: the render context, the
/// frame driver, the depth target (when the workload declares one), and the
/// frame pacer implementing the workload's scheduling policy.
pub struct Engine {
    ctx: RenderContext,
    driver: FrameDriver,
    workload: Box<dyn Workload>,
    depth: Option<DepthTarget>,
    pacer: FramePacer,
    last_fps_log: Instant,
}

impl Engine {
    /// Initialize the GPU context and build the selected workload.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Gpu`] if the host lacks the required graphics
    /// capability and [`EngineError::Resource`]/[`EngineError::Config`] if
    /// workload construction fails. All are fatal; nothing is retried.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        demo: DemoKind,
        config: &Config,
    ) -> Result<Self, EngineError> {
        let ctx = RenderContext::new(window, size).await?;
        let workload = workload::build(demo, &ctx, config)?;

        let depth = workload.depth_format().map(|format| {
            DepthTarget::new(&ctx.device, size.0.max(1), size.1.max(1), format)
        });
        let pacer = FramePacer::new(workload.update_interval());

        log::info!("engine ready: {} workload", workload.label());

        Ok(Self {
            ctx,
            driver: FrameDriver::new(),
            workload,
            depth,
            pacer,
            last_fps_log: Instant::now(),
        })
    }

    /// Step the workload if its scheduling policy allows it this frame.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] from surface acquisition; lost or
    /// outdated surfaces should be handled by resizing, other errors are
    /// fatal.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        if !self.pacer.should_step() {
            return Ok(());
        }

        self.driver
            .step(&self.ctx, self.depth.as_ref(), self.workload.as_mut())?;
        self.pacer.end_step();

        if self.last_fps_log.elapsed() >= FPS_LOG_INTERVAL {
            log::debug!(
                "{}: step {} at {:.1} steps/s",
                self.workload.label(),
                self.driver.step_count(),
                self.pacer.fps()
            );
            self.last_fps_log = Instant::now();
        }
        Ok(())
    }

    /// Reconfigure the surface and depth target for a new window size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.ctx.resize(width, height);
        if let Some(depth) = &mut self.depth {
            *depth = DepthTarget::new(
                &self.ctx.device,
                width.max(1),
                height.max(1),
                depth.format,
            );
        }
    }

    /// Steps completed so far.
    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.driver.step_count()
    }

    /// Smoothed steps-per-second rate.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.pacer.fps()
    }
}
