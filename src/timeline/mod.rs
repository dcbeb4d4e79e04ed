//! Timelines: atomic animations composed into parallel, sequential and lagged groups.

/// `animate` and `animate_view` builders.
pub mod animate;
/// Atomic animation payloads and their endpoints.
pub mod atomic;
/// The `Timeline` scheduling tree.
pub mod node;
/// Ready-made animations (fades, create, write, indicate, ...).
pub mod presets;
