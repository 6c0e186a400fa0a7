//! Ping-pong bind groups over two alternating storage buffers.
//!
//! Two bind groups are created up front from one layout, with the storage
//! roles swapped between them. Selecting by step parity alternates which
//! physical buffer the compute shader writes, so no pass ever reads a buffer
//! it is concurrently writing.

use crate::gpu::resource::{self, ResourceError};
use crate::sim::grid::GridParameters;

/// Which of the two precomputed bind groups a step uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Buffer 0 bound read-only, buffer 1 bound read-write.
    A,
    /// Buffer 1 bound read-only, buffer 0 bound read-write.
    B,
}

impl Variant {
    /// The variant selected by a step counter: even steps use `A`.
    #[must_use]
    pub fn for_step(step: u64) -> Self {
        if step % 2 == 0 {
            Self::A
        } else {
            Self::B
        }
    }

    /// Index of the buffer this variant binds read-only.
    #[must_use]
    pub fn read_index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }

    /// Index of the buffer this variant binds read-write.
    #[must_use]
    pub fn write_index(self) -> usize {
        match self {
            Self::A => 1,
            Self::B => 0,
        }
    }
}

/// The two cell-state buffers and the two bind groups referencing them.
///
/// Owns the storage buffers exclusively; no other component addresses them
/// directly. The initial population is uploaded only to buffer 0 (the first
/// step's read side) — buffer 1 is written, never read, on the first compute
/// step and is left uninitialized.
pub struct BindGroupSet {
    state: [wgpu::Buffer; 2],
    groups: [wgpu::BindGroup; 2],
}

impl BindGroupSet {
    /// Build both bind groups over the given layout.
    ///
    /// `uniform` is bound at slot 0 in both variants; the two storage buffers
    /// occupy slots 1 (read) and 2 (write) in opposite roles.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::SizeMismatch`] if `initial_state` does not
    /// match the grid's declared state size.
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        uniform: &wgpu::Buffer,
        grid: GridParameters,
        initial_state: &[u32],
    ) -> Result<Self, ResourceError> {
        let size = grid.state_bytes();
        let usage = wgpu::BufferUsages::STORAGE;

        let current = resource::init_buffer(
            device,
            "Cell State A",
            size,
            bytemuck::cast_slice(initial_state),
            usage,
        )?;
        let next = resource::empty_buffer(device, "Cell State B", size, usage);
        let state = [current, next];

        let groups = [Variant::A, Variant::B].map(|variant| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("Cell Bind Group {variant:?}")),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: state[variant.read_index()]
                            .as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: state[variant.write_index()]
                            .as_entire_binding(),
                    },
                ],
            })
        });

        Ok(Self { state, groups })
    }

    /// The bind group for the given step parity.
    #[must_use]
    pub fn select(&self, step: u64) -> &wgpu::BindGroup {
        match Variant::for_step(step) {
            Variant::A => &self.groups[0],
            Variant::B => &self.groups[1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_steps_select_a_odd_steps_select_b() {
        assert_eq!(Variant::for_step(0), Variant::A);
        assert_eq!(Variant::for_step(1), Variant::B);
        assert_eq!(Variant::for_step(2), Variant::A);
        assert_eq!(Variant::for_step(u64::MAX - 1), Variant::A);
        assert_eq!(Variant::for_step(u64::MAX), Variant::B);
    }

    #[test]
    fn read_and_write_never_alias_within_a_variant() {
        for step in 0..8 {
            let variant = Variant::for_step(step);
            assert_ne!(variant.read_index(), variant.write_index());
        }
    }

    #[test]
    fn render_after_increment_reads_what_compute_wrote() {
        // The driver dispatches compute at step n, increments, then renders
        // at step n+1. The render variant's read side must be the compute
        // variant's write side.
        for step in 0..8 {
            let compute = Variant::for_step(step);
            let render = Variant::for_step(step + 1);
            assert_eq!(compute.write_index(), render.read_index());
        }
    }

    #[test]
    fn consecutive_steps_swap_roles_exactly_once() {
        let at_zero = Variant::for_step(0);
        let at_one = Variant::for_step(1);
        assert_eq!(at_zero, Variant::A);
        assert_eq!(at_one, Variant::B);
        assert_ne!(at_zero.write_index(), at_one.write_index());
    }
}
