//! Simulation state: grid parameters and double-buffered cell storage.

/// Grid dimensions, seeding, and dispatch math.
pub mod grid;
/// Ping-pong bind groups over two alternating storage buffers.
pub mod ping_pong;
