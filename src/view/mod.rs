//! Camera model.

/// `ViewTransform` and its animatable changes.
pub mod camera;
