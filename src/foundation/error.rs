/// Convenience result type used across kinescope.
pub type KinescopeResult<T> = Result<T, KinescopeError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum KinescopeError {
    /// Invalid user-provided data (config, camera parameters, graph edits).
    #[error("validation error: {0}")]
    Validation(String),

    /// A timeline node that cannot be scheduled (bad duration, empty group, bad lag).
    #[error("malformed timeline: {0}")]
    MalformedTimeline(String),

    /// Start and end states whose attributes cannot be blended.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// A handle that does not (or no longer) name a live object.
    #[error("unknown object: {0}")]
    UnknownObject(String),

    /// Errors while advancing timelines or composing a frame.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// A reactive updater callback failed.
    #[error("updater error: {0}")]
    Updater(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KinescopeError {
    /// Build a [`KinescopeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`KinescopeError::MalformedTimeline`] value.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedTimeline(msg.into())
    }

    /// Build a [`KinescopeError::TypeMismatch`] value.
    pub fn type_mismatch(msg: impl Into<String>) -> Self {
        Self::TypeMismatch(msg.into())
    }

    /// Build a [`KinescopeError::UnknownObject`] value.
    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::UnknownObject(msg.into())
    }

    /// Build a [`KinescopeError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`KinescopeError::Updater`] value.
    pub fn updater(msg: impl Into<String>) -> Self {
        Self::Updater(msg.into())
    }

    /// Build a [`KinescopeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
