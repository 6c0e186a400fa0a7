//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, validated buffer and texture
//! construction, and shared pipeline/bind-group-layout helpers.

/// Render and compute pipeline construction with a shared layout.
pub mod pipeline;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// Validated buffer/texture creation from host-side data.
pub mod resource;
/// Depth attachment created once and reused across frames.
pub mod texture;
