//! Render and compute pipeline construction.
//!
//! Both pipeline kinds of a workload share one bind-group layout, so the
//! ping-pong bind groups can be swapped between passes without relayout. The
//! layout-entry helpers mirror the binding tables the shaders declare:
//!
//! | Binding | Type | Visibility |
//! |---------|------|------------|
//! | 0 | Uniform | VERTEX, FRAGMENT, COMPUTE |
//! | 1 | Storage (read) | VERTEX, COMPUTE |
//! | 2 | Storage (read_write) | COMPUTE |

use crate::gpu::resource::VertexLayout;

/// Uniform buffer binding with the given visibility.
#[must_use]
pub fn uniform_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Storage buffer binding; `read_only: false` makes it a read-write binding.
#[must_use]
pub fn storage_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
    read_only: bool,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Fragment-visible, filterable float 2D texture binding.
#[must_use]
pub fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

/// Fragment-visible filtering sampler binding.
#[must_use]
pub fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

/// Fixed-function settings for [`create_render_pipeline`].
pub struct RenderPipelineDesc<'a> {
    /// Debug label prefix for the layout and pipeline.
    pub label: &'a str,
    /// The shader module holding `vs_main` / `fs_main`.
    pub shader: &'a wgpu::ShaderModule,
    /// Color target format (the surface format).
    pub format: wgpu::TextureFormat,
    /// Vertex buffer declaration, or `None` for bufferless vertices.
    pub vertex_layout: Option<&'a VertexLayout>,
    /// Depth attachment format; enables "less" depth testing when set.
    pub depth_format: Option<wgpu::TextureFormat>,
}

/// Create a triangle-list, back-face-culled render pipeline over the given
/// bind-group layout.
#[must_use]
pub fn create_render_pipeline(
    device: &wgpu::Device,
    desc: &RenderPipelineDesc<'_>,
    bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let pipeline_layout =
        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{} Pipeline Layout", desc.label)),
            bind_group_layouts: &[bind_group_layout],
            push_constant_ranges: &[],
        });

    let buffers = desc
        .vertex_layout
        .map(|layout| vec![layout.buffer_layout()])
        .unwrap_or_default();

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{} Pipeline", desc.label)),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: Some("vs_main"),
            buffers: &buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: Some(wgpu::Face::Back),
            ..Default::default()
        },
        depth_stencil: desc.depth_format.map(|format| {
            wgpu::DepthStencilState {
                format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// Create a compute pipeline over the same bind-group layout the render
/// pipeline uses.
///
/// The shader source is passed as text so callers can rewrite build-time
/// constants (workgroup size) before module creation.
#[must_use]
pub fn create_compute_pipeline(
    device: &wgpu::Device,
    label: &str,
    shader_source: &str,
    entry_point: &str,
    bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::ComputePipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{label} Shader")),
        source: wgpu::ShaderSource::Wgsl(shader_source.into()),
    });

    let pipeline_layout =
        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{label} Pipeline Layout")),
            bind_group_layouts: &[bind_group_layout],
            push_constant_ranges: &[],
        });

    device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some(&format!("{label} Pipeline")),
        layout: Some(&pipeline_layout),
        module: &shader,
        entry_point: Some(entry_point),
        compilation_options: Default::default(),
        cache: None,
    })
}
