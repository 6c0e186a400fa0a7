//! Small shared utilities.

/// Step cadence gating and smoothed FPS measurement.
pub mod frame_pacer;
