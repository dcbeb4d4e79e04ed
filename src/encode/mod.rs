//! Frame sinks.
//!
//! Sinks consume composed draw lists in timeline order and are fed by
//! [`crate::Scene::play`] and [`crate::Scene::record`].

/// Frame sink trait and built-in sinks.
pub mod sink;
