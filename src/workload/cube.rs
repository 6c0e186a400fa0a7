//! Rotating textured cube rendered with a depth-tested graphics pipeline.

use glam::{Mat4, Vec3};

use crate::driver::{FrameClock, Workload};
use crate::error::EngineError;
use crate::gpu::pipeline::{
    self, sampler_entry, texture_entry, uniform_entry, RenderPipelineDesc,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::resource::{self, VertexLayout};

/// 24-bit depth as declared by the render pipeline.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

/// Rotation speed in radians per second.
const ANGULAR_VELOCITY: f32 = 0.8;

/// Checkerboard texture edge length and cells per edge.
const TEXTURE_SIZE: u32 = 256;
const TEXTURE_CELLS: u32 = 8;

/// Byte size of the 4x4 transform uniform.
const TRANSFORM_BYTES: u64 = 64;

// Unit cube as 36 vertices: position (xyzw) + uv, stride 24 bytes.
// Each face winds counter-clockwise viewed from outside, matching the
// pipeline's back-face culling.
#[rustfmt::skip]
const CUBE_VERTICES: [[f32; 6]; 36] = [
    // +Z
    [-1.0, -1.0,  1.0, 1.0,  0.0, 1.0],
    [ 1.0, -1.0,  1.0, 1.0,  1.0, 1.0],
    [ 1.0,  1.0,  1.0, 1.0,  1.0, 0.0],
    [-1.0, -1.0,  1.0, 1.0,  0.0, 1.0],
    [ 1.0,  1.0,  1.0, 1.0,  1.0, 0.0],
    [-1.0,  1.0,  1.0, 1.0,  0.0, 0.0],
    // -Z
    [ 1.0, -1.0, -1.0, 1.0,  0.0, 1.0],
    [-1.0, -1.0, -1.0, 1.0,  1.0, 1.0],
    [-1.0,  1.0, -1.0, 1.0,  1.0, 0.0],
    [ 1.0, -1.0, -1.0, 1.0,  0.0, 1.0],
    [-1.0,  1.0, -1.0, 1.0,  1.0, 0.0],
    [ 1.0,  1.0, -1.0, 1.0,  0.0, 0.0],
    // +X
    [ 1.0, -1.0,  1.0, 1.0,  0.0, 1.0],
    [ 1.0, -1.0, -1.0, 1.0,  1.0, 1.0],
    [ 1.0,  1.0, -1.0, 1.0,  1.0, 0.0],
    [ 1.0, -1.0,  1.0, 1.0,  0.0, 1.0],
    [ 1.0,  1.0, -1.0, 1.0,  1.0, 0.0],
    [ 1.0,  1.0,  1.0, 1.0,  0.0, 0.0],
    // -X
    [-1.0, -1.0, -1.0, 1.0,  0.0, 1.0],
    [-1.0, -1.0,  1.0, 1.0,  1.0, 1.0],
    [-1.0,  1.0,  1.0, 1.0,  1.0, 0.0],
    [-1.0, -1.0, -1.0, 1.0,  0.0, 1.0],
    [-1.0,  1.0,  1.0, 1.0,  1.0, 0.0],
    [-1.0,  1.0, -1.0, 1.0,  0.0, 0.0],
    // +Y
    [-1.0,  1.0,  1.0, 1.0,  0.0, 1.0],
    [ 1.0,  1.0,  1.0, 1.0,  1.0, 1.0],
    [ 1.0,  1.0, -1.0, 1.0,  1.0, 0.0],
    [-1.0,  1.0,  1.0, 1.0,  0.0, 1.0],
    [ 1.0,  1.0, -1.0, 1.0,  1.0, 0.0],
    [-1.0,  1.0, -1.0, 1.0,  0.0, 0.0],
    // -Y
    [-1.0, -1.0, -1.0, 1.0,  0.0, 1.0],
    [ 1.0, -1.0, -1.0, 1.0,  1.0, 1.0],
    [ 1.0, -1.0,  1.0, 1.0,  1.0, 0.0],
    [-1.0, -1.0, -1.0, 1.0,  0.0, 1.0],
    [ 1.0, -1.0,  1.0, 1.0,  1.0, 0.0],
    [-1.0, -1.0,  1.0, 1.0,  0.0, 0.0],
];

/// Model-view-projection matrix for the given elapsed time and aspect ratio.
///
/// Pure in its inputs, so the animation is real-time when fed wall-clock
/// elapsed seconds and reproducible when fed a fixed value.
#[must_use]
pub fn transform_at(elapsed: f32, aspect: f32) -> Mat4 {
    let projection =
        Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, aspect, 0.1, 100.0);
    let view = Mat4::look_at_rh(
        Vec3::new(0.0, 0.0, 6.0),
        Vec3::ZERO,
        Vec3::Y,
    );
    let angle = elapsed * ANGULAR_VELOCITY;
    let model =
        Mat4::from_rotation_y(angle) * Mat4::from_rotation_x(angle * 0.6);
    projection * view * model
}

/// The cube workload: static geometry, per-frame transform uniform, depth
/// testing. No compute stage.
pub struct CubeWorkload {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    transform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    // Bound through the bind group; kept alive with the workload.
    _texture: wgpu::Texture,
}

impl CubeWorkload {
    /// Build all cube resources against the given context.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Resource`] if the vertex payload does not match
    /// its declared layout.
    pub fn new(ctx: &RenderContext) -> Result<Self, EngineError> {
        let layout = VertexLayout::new(
            "Cube Vertex Layout",
            24,
            vec![
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 16,
                    shader_location: 1,
                },
            ],
        )?;

        let (vertex_buffer, vertex_count) = layout.upload(
            &ctx.device,
            "Cube Vertex Buffer",
            bytemuck::cast_slice(&CUBE_VERTICES),
        )?;

        // Written every frame via a partial update; never reallocated.
        let transform_buffer = resource::empty_buffer(
            &ctx.device,
            "Cube Transform",
            TRANSFORM_BYTES,
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );

        let (texture, texture_view) = resource::checkerboard_texture(
            &ctx.device,
            &ctx.queue,
            TEXTURE_SIZE,
            TEXTURE_CELLS,
        );

        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Cube Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let bind_group_layout = ctx.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Cube Bind Group Layout"),
                entries: &[
                    uniform_entry(0, wgpu::ShaderStages::VERTEX),
                    texture_entry(1),
                    sampler_entry(2),
                ],
            },
        );

        let bind_group =
            ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Cube Bind Group"),
                layout: &bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: transform_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(
                            &texture_view,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(&sampler),
                    },
                ],
            });

        let shader = ctx
            .device
            .create_shader_module(wgpu::include_wgsl!(
                "../../shaders/cube.wgsl"
            ));

        let pipeline = pipeline::create_render_pipeline(
            &ctx.device,
            &RenderPipelineDesc {
                label: "Cube",
                shader: &shader,
                format: ctx.format(),
                vertex_layout: Some(&layout),
                depth_format: Some(DEPTH_FORMAT),
            },
            &bind_group_layout,
        );

        log::debug!("cube workload ready: {vertex_count} vertices");

        Ok(Self {
            pipeline,
            vertex_buffer,
            vertex_count,
            transform_buffer,
            bind_group,
            _texture: texture,
        })
    }
}

impl Workload for CubeWorkload {
    fn label(&self) -> &'static str {
        "cube"
    }

    fn prepare(&mut self, ctx: &RenderContext, clock: &FrameClock) {
        let mvp = transform_at(clock.elapsed, ctx.aspect_ratio());
        ctx.queue.write_buffer(
            &self.transform_buffer,
            0,
            bytemuck::cast_slice(&mvp.to_cols_array()),
        );
    }

    fn record_render(&self, pass: &mut wgpu::RenderPass<'_>, _step: u64) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(0..self.vertex_count, 0..1);
    }

    fn depth_format(&self) -> Option<wgpu::TextureFormat> {
        Some(DEPTH_FORMAT)
    }

    fn clear_color(&self) -> wgpu::Color {
        wgpu::Color {
            r: 0.05,
            g: 0.05,
            b: 0.08,
            a: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_payload_fills_whole_vertices() {
        // 36 vertices * 24 bytes each.
        let bytes: &[u8] = bytemuck::cast_slice(&CUBE_VERTICES);
        assert_eq!(bytes.len(), 36 * 24);
    }

    #[test]
    fn transform_is_deterministic_for_fixed_inputs() {
        let a = transform_at(1.5, 16.0 / 9.0);
        let b = transform_at(1.5, 16.0 / 9.0);
        assert_eq!(a.to_cols_array(), b.to_cols_array());
    }

    #[test]
    fn transform_changes_with_time() {
        let a = transform_at(0.0, 1.0);
        let b = transform_at(1.0, 1.0);
        assert_ne!(a.to_cols_array(), b.to_cols_array());
    }

    #[test]
    fn transform_at_zero_keeps_cube_in_front_of_camera() {
        // The cube center projects inside the clip volume.
        let mvp = transform_at(0.0, 1.0);
        let clip = mvp * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc_z = clip.z / clip.w;
        assert!(ndc_z > 0.0 && ndc_z < 1.0, "ndc_z = {ndc_z}");
    }
}
