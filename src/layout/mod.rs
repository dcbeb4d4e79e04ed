//! Markup to object-tree layout.

/// `MarkupLayout` trait and the placeholder `BoxLayout`.
pub mod markup;
