//! Scene driver and its configuration.

/// JSON-loadable `SceneConfig`.
pub mod config;
/// The frame-stepped `Scene`.
#[allow(clippy::module_inception)]
pub mod scene;
