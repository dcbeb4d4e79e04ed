//! Frame composition into renderer-facing draw lists.

/// `DrawList` and `compose`.
pub mod draw;
