//! Shared primitives: geometry and frame types, the error taxonomy, scalar helpers.

/// Geometry, color and frame-rate types.
pub mod core;
/// `KinescopeError` and `KinescopeResult`.
pub mod error;
/// Scalar helpers (lerp, clamping, color transfer).
pub mod math;
