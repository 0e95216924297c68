use thiserror::Error;

/// Boxed error type carried by stage and format failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced anywhere in a codec chain.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A required value or destination was `None`.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A codec or decorator was constructed with missing or invalid settings.
    #[error("configuration error: {0}")]
    Config(String),

    /// The serializer rejected the value or the bytes.
    #[error("{format} format error: {source}")]
    Format {
        format: &'static str,
        #[source]
        source: BoxError,
    },

    /// A leaf collaborator (compressor or cipher) failed.
    #[error("{stage} failed: {source}")]
    Stage {
        stage: String,
        #[source]
        source: BoxError,
    },

    /// The call context was cancelled before the work started.
    #[error("operation cancelled")]
    Cancelled,

    /// The call context deadline passed before the work started.
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

impl CodecError {
    /// Create a stage error with a label and the collaborator's error.
    pub fn stage(stage: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Stage {
            stage: stage.into(),
            source: source.into(),
        }
    }

    /// Create a format error for the named serializer.
    pub fn format(format: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Format {
            format,
            source: source.into(),
        }
    }

    /// Returns `true` for [`CodecError::InvalidInput`].
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Returns `true` for [`CodecError::Config`].
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// The stage label, if this error came from a leaf collaborator.
    pub fn stage_name(&self) -> Option<&str> {
        match self {
            Self::Stage { stage, .. } => Some(stage),
            _ => None,
        }
    }

    /// Downcast the collaborator error of a stage failure.
    pub fn stage_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Self::Stage { source, .. } => source.downcast_ref::<E>(),
            _ => None,
        }
    }
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
