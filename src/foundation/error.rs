/// Convenience result type used across runanime.
pub type RunanimeResult<T> = Result<T, RunanimeError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Nothing in the engine treats these as fatal: decode failures drop one placement from the
/// scene, configuration failures keep the previous scene on screen.
#[derive(thiserror::Error, Debug)]
pub enum RunanimeError {
    /// Malformed or unsupported image source, zero frames, or unreadable file.
    #[error("decode error: {0}")]
    Decode(String),

    /// Malformed or unreadable external configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Invalid caller-provided arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RunanimeError {
    /// Build a [`RunanimeError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`RunanimeError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`RunanimeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Return `true` for [`RunanimeError::Decode`].
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// Return `true` for [`RunanimeError::Config`].
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
