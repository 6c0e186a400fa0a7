//! Per-step orchestration of compute and render passes.
//!
//! One [`FrameDriver::step`] call is a complete, self-contained transition:
//! upload dynamic uniforms, acquire this frame's surface view, record an
//! optional compute pass and a render pass into one encoder, submit, present.
//! The only state carried between steps is the monotonically increasing step
//! counter (and the GPU-resident buffers themselves).

use std::time::{Duration, Instant};

use crate::gpu::render_context::RenderContext;
use crate::gpu::texture::DepthTarget;

/// Per-step timing handed to workloads when recomputing dynamic uniforms.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    /// Seconds since the driver was created.
    pub elapsed: f32,
    /// The step about to be recorded.
    pub step: u64,
}

/// A renderable (and optionally computable) workload driven by the
/// [`FrameDriver`].
///
/// Both demonstration workloads implement this: the cube uses only the render
/// half, the automaton both halves.
pub trait Workload {
    /// Short name used in logs.
    fn label(&self) -> &'static str;

    /// Recompute and upload dynamic uniforms via partial buffer writes.
    /// Called before any pass is recorded; static workloads may do nothing.
    fn prepare(&mut self, ctx: &RenderContext, clock: &FrameClock);

    /// Whether a compute pass should be recorded each step.
    fn has_compute(&self) -> bool {
        false
    }

    /// Record the compute pass: bind the compute pipeline and the bind-group
    /// variant for `step`'s parity, then dispatch.
    fn record_compute(&self, _pass: &mut wgpu::ComputePass<'_>, _step: u64) {}

    /// Record the render pass: bind pipeline, vertex buffer, and the
    /// bind-group variant for `step`'s parity, then draw.
    fn record_render(&self, pass: &mut wgpu::RenderPass<'_>, step: u64);

    /// Depth format required by the render pipeline, if any.
    fn depth_format(&self) -> Option<wgpu::TextureFormat> {
        None
    }

    /// Clear color for the render pass.
    fn clear_color(&self) -> wgpu::Color {
        wgpu::Color::BLACK
    }

    /// Minimum time between steps. Zero (the default) steps on every display
    /// refresh; the automaton overrides this with its fixed cadence. Both are
    /// valid scheduling policies for the same driver contract.
    fn update_interval(&self) -> Duration {
        Duration::ZERO
    }
}

/// Drives one workload, one submission per step.
pub struct FrameDriver {
    step: u64,
    start: Instant,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDriver {
    /// A driver at step zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            step: 0,
            start: Instant::now(),
        }
    }

    /// Steps completed so far.
    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.step
    }

    /// The timing snapshot handed to the workload this step.
    fn clock(&self) -> FrameClock {
        FrameClock {
            elapsed: self.start.elapsed().as_secs_f32(),
            step: self.step,
        }
    }

    /// Execute one discrete simulation/render step.
    ///
    /// The compute pass binds the variant for the pre-increment step parity;
    /// the counter is then incremented and the render pass binds the variant
    /// for the post-increment parity, so rendering visualizes the state the
    /// compute pass just produced. Commands within the single submission
    /// execute in recorded order, which is the only synchronization the
    /// alternating-buffer scheme needs.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the presentation surface cannot
    /// provide a texture this frame; no commands are submitted in that case.
    pub fn step(
        &mut self,
        ctx: &RenderContext,
        depth: Option<&DepthTarget>,
        workload: &mut dyn Workload,
    ) -> Result<(), wgpu::SurfaceError> {
        let clock = self.clock();
        workload.prepare(ctx, &clock);

        // The color view is valid for this frame only.
        let frame = ctx.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = ctx.create_encoder();

        if workload.has_compute() {
            let mut pass =
                encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                    label: Some("Simulation Pass"),
                    timestamp_writes: None,
                });
            workload.record_compute(&mut pass, self.step);
            drop(pass);
        }

        // Current/next roles swap here for the frame's render half.
        self.step += 1;

        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Render Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(
                                    workload.clear_color(),
                                ),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: depth
                        .map(DepthTarget::attachment),
                    ..Default::default()
                });
            workload.record_render(&mut pass, self.step);
        }

        ctx.submit(encoder);
        frame.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_starts_at_step_zero() {
        let driver = FrameDriver::new();
        assert_eq!(driver.step_count(), 0);
    }

    #[test]
    fn clock_carries_the_current_step_and_monotonic_elapsed() {
        let mut driver = FrameDriver::new();
        let first = driver.clock();
        assert_eq!(first.step, driver.step_count());

        driver.step += 1;
        let second = driver.clock();
        assert_eq!(second.step, 1);
        assert!(second.elapsed >= first.elapsed);
    }
}
