//! Interpolation: the `Lerp` contract, rate functions and polyline paths.

/// `Lerp` implementations and dynamically typed attributes.
pub mod lerp;
/// Polyline geometry with resampling and trimming.
pub mod path;
/// Easing curves mapping linear progress to eased progress.
pub mod rate;
