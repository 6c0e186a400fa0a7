//! Demonstration workloads instantiating the shared engine abstractions.

use crate::config::{Config, DemoKind};
use crate::driver::Workload;
use crate::error::EngineError;
use crate::gpu::render_context::RenderContext;

/// Rotating textured cube with depth testing.
pub mod cube;
/// Double-buffered cellular automaton.
pub mod life;

/// Construct the workload selected by `kind`.
///
/// # Errors
///
/// Returns [`EngineError`] if resource validation fails during construction.
pub fn build(
    kind: DemoKind,
    ctx: &RenderContext,
    config: &Config,
) -> Result<Box<dyn Workload>, EngineError> {
    match kind {
        DemoKind::Cube => Ok(Box::new(cube::CubeWorkload::new(ctx)?)),
        DemoKind::Life => {
            Ok(Box::new(life::LifeWorkload::new(ctx, config)?))
        }
    }
}
