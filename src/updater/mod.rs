//! Per-frame reactive bindings.

/// `UpdaterRegistry` and callback context.
pub mod registry;
