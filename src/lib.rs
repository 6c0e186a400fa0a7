// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// GPU / graphics allowances — casts are intentional and safe
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::module_name_repetitions)]

//! GPU compute/render orchestration engine built on wgpu.
//!
//! Cellflow drives a retained pipeline of shaders, buffers, and bind groups
//! through a per-frame loop. Two demonstration workloads instantiate the same
//! abstractions:
//!
//! - a rotating textured cube rendered with a depth-tested graphics pipeline
//!   ([`workload::cube`]), and
//! - a cellular automaton that alternates a compute pass (state transition)
//!   with a render pass (visualization) over ping-pong storage buffers
//!   ([`workload::life`]).
//!
//! # Key entry points
//!
//! - [`engine::Engine`] - owns the GPU context and steps a workload
//! - [`viewer::Viewer`] - standalone winit window running a workload
//! - [`config::Config`] - host-configurable parameters (grid size, workgroup
//!   size, update cadence, seeding probability)
//!
//! # Architecture
//!
//! Resources are built once at initialization ([`gpu::resource`]), pipelines
//! and their shared bind-group layout come from [`gpu::pipeline`], the
//! double-buffered bind groups live in [`sim::ping_pong`], and the
//! [`driver::FrameDriver`] records one compute-then-render submission per
//! step. The only state carried across steps is a monotonically increasing
//! step counter; parity of that counter selects which physical storage buffer
//! is read and which is written.

pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod sim;
pub mod util;
pub mod viewer;
pub mod workload;
