//! Scene graph: visual objects in a generational arena, plus the edits and mutators
//! that operate on it.

/// Family alignment for morphing differently shaped subtrees.
pub mod align;
/// `SceneGraph` arena, tree edits and world-space queries.
pub mod arena;
/// Structural edits run by timeline hooks.
pub mod edit;
/// Fluent `ObjectMut` mutators.
pub mod handle;
/// Object handles, per-node state and declarations.
pub mod object;
