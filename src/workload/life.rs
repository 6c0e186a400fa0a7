//! Double-buffered cellular automaton: compute pass per step, render pass
//! visualizing the generation the compute pass just produced.

use std::time::Duration;

use crate::config::Config;
use crate::driver::{FrameClock, Workload};
use crate::error::EngineError;
use crate::gpu::pipeline::{
    self, storage_entry, uniform_entry, RenderPipelineDesc,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::resource::{self, VertexLayout};
use crate::sim::grid::{self, GridParameters};
use crate::sim::ping_pong::BindGroupSet;

/// Workgroup dimension the shipped compute shader declares.
const DEFAULT_WORKGROUP_SIZE: u32 = 8;

// One cell quad with a small gap to its neighbors, stride 8 bytes.
#[rustfmt::skip]
const QUAD_VERTICES: [[f32; 2]; 6] = [
    [-0.8, -0.8],
    [ 0.8, -0.8],
    [ 0.8,  0.8],
    [-0.8, -0.8],
    [ 0.8,  0.8],
    [-0.8,  0.8],
];

/// Compute shader source with the workgroup size rewritten to `size`.
fn step_shader_source(size: u32) -> String {
    let source = include_str!("../../shaders/life_step.wgsl");
    if size == DEFAULT_WORKGROUP_SIZE {
        source.to_owned()
    } else {
        source.replace(
            "@workgroup_size(8, 8)",
            &format!("@workgroup_size({size}, {size})"),
        )
    }
}

/// The automaton workload.
///
/// Holds the shared bind-group layout's two pipelines, the quad geometry, the
/// grid uniform, and the ping-pong [`BindGroupSet`]. All resources are built
/// once; per step the only selection is which bind-group variant each pass
/// binds.
pub struct LifeWorkload {
    render_pipeline: wgpu::RenderPipeline,
    compute_pipeline: wgpu::ComputePipeline,
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    bind_groups: BindGroupSet,
    dispatch: (u32, u32),
    instance_count: u32,
    interval: Duration,
    // Bound through the bind groups; kept alive with the workload.
    _uniform_buffer: wgpu::Buffer,
}

impl LifeWorkload {
    /// Build all automaton resources: quad geometry, grid uniform, seeded
    /// cell state, the shared layout, and both pipelines.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Resource`] on any declared-size mismatch and
    /// [`EngineError::Config`] for out-of-range parameters.
    pub fn new(
        ctx: &RenderContext,
        config: &Config,
    ) -> Result<Self, EngineError> {
        config.validate()?;

        let grid = GridParameters::square(config.grid_size);
        let dispatch = grid.dispatch_extent(config.workgroup_size);

        let layout = VertexLayout::new(
            "Cell Vertex Layout",
            8,
            vec![wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 0,
                shader_location: 0,
            }],
        )?;
        let (vertex_buffer, vertex_count) = layout.upload(
            &ctx.device,
            "Cell Vertex Buffer",
            bytemuck::cast_slice(&QUAD_VERTICES),
        )?;

        let uniform_data = grid.uniform_data();
        let uniform_buffer = resource::init_buffer(
            &ctx.device,
            "Grid Uniform",
            std::mem::size_of_val(&uniform_data) as u64,
            bytemuck::cast_slice(&uniform_data),
            wgpu::BufferUsages::UNIFORM,
        )?;

        // Slot 0: grid uniform for every stage. Slot 1: the current
        // generation, read by vertex and compute. Slot 2: the next
        // generation, written by compute only.
        let bind_group_layout = ctx.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Cell Bind Group Layout"),
                entries: &[
                    uniform_entry(
                        0,
                        wgpu::ShaderStages::VERTEX
                            | wgpu::ShaderStages::FRAGMENT
                            | wgpu::ShaderStages::COMPUTE,
                    ),
                    storage_entry(
                        1,
                        wgpu::ShaderStages::VERTEX
                            | wgpu::ShaderStages::COMPUTE,
                        true,
                    ),
                    storage_entry(2, wgpu::ShaderStages::COMPUTE, false),
                ],
            },
        );

        let initial_state = grid::seed_cells(
            grid,
            config.alive_probability,
            &mut rand::rng(),
        );
        let bind_groups = BindGroupSet::new(
            &ctx.device,
            &bind_group_layout,
            &uniform_buffer,
            grid,
            &initial_state,
        )?;

        let render_shader = ctx
            .device
            .create_shader_module(wgpu::include_wgsl!(
                "../../shaders/life.wgsl"
            ));
        let render_pipeline = pipeline::create_render_pipeline(
            &ctx.device,
            &RenderPipelineDesc {
                label: "Cell Render",
                shader: &render_shader,
                format: ctx.format(),
                vertex_layout: Some(&layout),
                depth_format: None,
            },
            &bind_group_layout,
        );

        let compute_pipeline = pipeline::create_compute_pipeline(
            &ctx.device,
            "Cell Step",
            &step_shader_source(config.workgroup_size),
            "cs_main",
            &bind_group_layout,
        );

        log::debug!(
            "life workload ready: {}x{} grid, dispatch {:?}",
            grid.width(),
            grid.height(),
            dispatch
        );

        Ok(Self {
            render_pipeline,
            compute_pipeline,
            vertex_buffer,
            vertex_count,
            bind_groups,
            dispatch,
            // Lossless: validate() caps grid_size so the count fits u32.
            instance_count: grid.cell_count() as u32,
            interval: config.update_interval(),
            _uniform_buffer: uniform_buffer,
        })
    }
}

impl Workload for LifeWorkload {
    fn label(&self) -> &'static str {
        "life"
    }

    fn prepare(&mut self, _ctx: &RenderContext, _clock: &FrameClock) {
        // Grid parameters are immutable; nothing to upload per step.
    }

    fn has_compute(&self) -> bool {
        true
    }

    fn record_compute(&self, pass: &mut wgpu::ComputePass<'_>, step: u64) {
        pass.set_pipeline(&self.compute_pipeline);
        pass.set_bind_group(0, self.bind_groups.select(step), &[]);
        pass.dispatch_workgroups(self.dispatch.0, self.dispatch.1, 1);
    }

    fn record_render(&self, pass: &mut wgpu::RenderPass<'_>, step: u64) {
        pass.set_pipeline(&self.render_pipeline);
        pass.set_bind_group(0, self.bind_groups.select(step), &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(0..self.vertex_count, 0..self.instance_count);
    }

    fn clear_color(&self) -> wgpu::Color {
        wgpu::Color {
            r: 0.0,
            g: 0.0,
            b: 0.4,
            a: 1.0,
        }
    }

    fn update_interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_payload_is_six_two_float_vertices() {
        let bytes: &[u8] = bytemuck::cast_slice(&QUAD_VERTICES);
        assert_eq!(bytes.len(), 6 * 8);
    }

    #[test]
    fn default_workgroup_leaves_shader_untouched() {
        let source = step_shader_source(8);
        assert!(source.contains("@workgroup_size(8, 8)"));
    }

    #[test]
    fn configured_workgroup_rewrites_the_literal() {
        let source = step_shader_source(16);
        assert!(source.contains("@workgroup_size(16, 16)"));
        assert!(!source.contains("@workgroup_size(8, 8)"));
    }
}
