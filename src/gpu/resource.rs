//! Validated buffer and texture construction from host-side data.
//!
//! Every upload checks the declared byte size against the payload before any
//! GPU allocation happens; a mismatch is a fatal configuration error, never a
//! partial write.

use std::fmt;

use wgpu::util::DeviceExt;

/// Errors raised while building GPU resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// Declared buffer size does not match the uploaded payload length.
    SizeMismatch {
        /// Debug label of the offending buffer.
        label: String,
        /// Byte size the buffer was declared with.
        declared: u64,
        /// Byte length of the payload actually supplied.
        actual: u64,
    },
    /// Vertex payload length is not a whole multiple of the declared stride.
    StrideMisaligned {
        /// Debug label of the offending buffer.
        label: String,
        /// Declared per-vertex stride in bytes.
        stride: u64,
        /// Byte length of the payload.
        len: u64,
    },
    /// A vertex attribute extends past the declared stride.
    AttributeOverflow {
        /// Debug label of the offending layout.
        label: String,
        /// Declared per-vertex stride in bytes.
        stride: u64,
        /// Byte offset one past the end of the offending attribute.
        end: u64,
    },
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch {
                label,
                declared,
                actual,
            } => write!(
                f,
                "buffer '{label}': declared {declared} bytes, payload is {actual} bytes"
            ),
            Self::StrideMisaligned { label, stride, len } => write!(
                f,
                "vertex buffer '{label}': {len} bytes is not a multiple of stride {stride}"
            ),
            Self::AttributeOverflow { label, stride, end } => write!(
                f,
                "vertex layout '{label}': attribute ends at byte {end}, past stride {stride}"
            ),
        }
    }
}

impl std::error::Error for ResourceError {}

/// Validate a declared buffer size against a payload length.
///
/// # Errors
///
/// Returns [`ResourceError::SizeMismatch`] when the two differ.
pub fn check_payload(
    label: &str,
    declared: u64,
    actual: u64,
) -> Result<(), ResourceError> {
    if declared == actual {
        Ok(())
    } else {
        Err(ResourceError::SizeMismatch {
            label: label.to_owned(),
            declared,
            actual,
        })
    }
}

/// Create a buffer initialized from `contents`, after checking the payload
/// against the declared size.
///
/// # Errors
///
/// Returns [`ResourceError::SizeMismatch`] if `contents` is not exactly
/// `declared_size` bytes; nothing is allocated in that case.
pub fn init_buffer(
    device: &wgpu::Device,
    label: &str,
    declared_size: u64,
    contents: &[u8],
    usage: wgpu::BufferUsages,
) -> Result<wgpu::Buffer, ResourceError> {
    check_payload(label, declared_size, contents.len() as u64)?;
    Ok(
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage,
        }),
    )
}

/// Create an uninitialized buffer of the given size.
///
/// Used for write-only targets such as the "next" cell-state buffer, which is
/// produced by the first compute step rather than uploaded.
#[must_use]
pub fn empty_buffer(
    device: &wgpu::Device,
    label: &str,
    size: u64,
    usage: wgpu::BufferUsages,
) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage,
        mapped_at_creation: false,
    })
}

/// Declared byte layout of one vertex buffer.
///
/// Owns the attribute table so the wgpu borrow can be produced on demand, and
/// validates payloads against the stride before upload.
#[derive(Debug, Clone)]
pub struct VertexLayout {
    stride: u64,
    attributes: Vec<wgpu::VertexAttribute>,
}

impl VertexLayout {
    /// Declare a vertex layout with the given stride and attributes.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::AttributeOverflow`] if any attribute's
    /// `offset + format size` exceeds the stride.
    pub fn new(
        label: &str,
        stride: u64,
        attributes: Vec<wgpu::VertexAttribute>,
    ) -> Result<Self, ResourceError> {
        for attr in &attributes {
            let end = attr.offset + attr.format.size();
            if end > stride {
                return Err(ResourceError::AttributeOverflow {
                    label: label.to_owned(),
                    stride,
                    end,
                });
            }
        }
        Ok(Self { stride, attributes })
    }

    /// Per-vertex stride in bytes.
    #[must_use]
    pub fn stride(&self) -> u64 {
        self.stride
    }

    /// Number of vertices a payload of `len` bytes holds.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::StrideMisaligned`] if `len` is not a whole
    /// multiple of the stride.
    pub fn vertex_count(
        &self,
        label: &str,
        len: u64,
    ) -> Result<u32, ResourceError> {
        if len % self.stride == 0 {
            Ok((len / self.stride) as u32)
        } else {
            Err(ResourceError::StrideMisaligned {
                label: label.to_owned(),
                stride: self.stride,
                len,
            })
        }
    }

    /// The wgpu vertex buffer layout borrowing this declaration.
    #[must_use]
    pub fn buffer_layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }

    /// Upload a vertex payload, returning the buffer and its vertex count.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::StrideMisaligned`] if the payload does not
    /// divide evenly into vertices; the buffer is not created in that case.
    pub fn upload(
        &self,
        device: &wgpu::Device,
        label: &str,
        contents: &[u8],
    ) -> Result<(wgpu::Buffer, u32), ResourceError> {
        let count = self.vertex_count(label, contents.len() as u64)?;
        let buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: wgpu::BufferUsages::VERTEX,
            });
        Ok((buffer, count))
    }
}

/// Procedural checkerboard texture for the cube workload.
///
/// Fills an `Rgba8Unorm` texture with a two-tone pattern of `cells` squares
/// per edge and uploads it in one `write_texture` call.
#[must_use]
pub fn checkerboard_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    size: u32,
    cells: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Checkerboard Texture"),
        size: wgpu::Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    let cell = (size / cells.max(1)).max(1);
    let mut data = vec![0u8; (size * size * 4) as usize];
    for y in 0..size {
        for x in 0..size {
            let offset = ((y * size + x) * 4) as usize;
            let shade = if ((x / cell) + (y / cell)) % 2 == 0 {
                230
            } else {
                40
            };
            data[offset] = shade;
            data[offset + 1] = shade;
            data[offset + 2] = shade;
            data[offset + 3] = 255;
        }
    }

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(size * 4),
            rows_per_image: Some(size),
        },
        wgpu::Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float2_layout(stride: u64) -> VertexLayout {
        VertexLayout::new(
            "test",
            stride,
            vec![wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 0,
                shader_location: 0,
            }],
        )
        .unwrap()
    }

    #[test]
    fn payload_must_match_declared_size() {
        assert!(check_payload("cells", 4096, 4096).is_ok());

        let err = check_payload("cells", 4096, 4092).unwrap_err();
        match err {
            ResourceError::SizeMismatch {
                label,
                declared,
                actual,
            } => {
                assert_eq!(label, "cells");
                assert_eq!(declared, 4096);
                assert_eq!(actual, 4092);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn stride_8_float2_accepts_two_floats_per_vertex() {
        let layout = float2_layout(8);
        // 6 vertices * 2 floats * 4 bytes
        assert_eq!(layout.vertex_count("quad", 48).unwrap(), 6);
    }

    #[test]
    fn misaligned_payload_is_rejected() {
        let layout = float2_layout(8);
        let err = layout.vertex_count("quad", 50).unwrap_err();
        assert!(matches!(err, ResourceError::StrideMisaligned { .. }));
    }

    #[test]
    fn attribute_past_stride_is_rejected() {
        // Float32x4 is 16 bytes; cannot fit at offset 0 in an 8-byte stride.
        let err = VertexLayout::new(
            "bad",
            8,
            vec![wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x4,
                offset: 0,
                shader_location: 0,
            }],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ResourceError::AttributeOverflow { stride: 8, end: 16, .. }
        ));
    }

    #[test]
    fn identical_declarations_yield_identical_layouts() {
        let a = float2_layout(8);
        let b = float2_layout(8);
        assert_eq!(a.stride(), b.stride());
        assert_eq!(
            a.buffer_layout().attributes,
            b.buffer_layout().attributes
        );
        assert_eq!(a.vertex_count("q", 48).unwrap(), b.vertex_count("q", 48).unwrap());
    }

    #[test]
    fn size_mismatch_display_names_the_buffer() {
        let err = check_payload("Cell State A", 16, 12).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Cell State A"));
        assert!(msg.contains("16"));
        assert!(msg.contains("12"));
    }
}
