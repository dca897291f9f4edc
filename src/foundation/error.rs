/// Convenience result type used across Stagehand.
pub type StagehandResult<T> = Result<T, StagehandError>;

/// Error taxonomy for load-time and construction-time failures.
///
/// Playback itself never fails: see [`crate::TimelineAnimator::play`].
#[derive(thiserror::Error, Debug)]
pub enum StagehandError {
    /// Invalid timeline, command, or document data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StagehandError {
    /// Build a [`StagehandError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StagehandError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for StagehandError {
    fn from(e: serde_json::Error) -> Self {
        Self::serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
