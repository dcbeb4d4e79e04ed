//! Tag-based structural matching between object trees.

/// Unit extraction and pairing.
pub mod structural;
/// Matching transitions built from a pairing.
pub mod transition;
