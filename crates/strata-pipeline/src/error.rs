use std::io;
use std::path::PathBuf;

use strata_codec::CodecError;
use thiserror::Error;

/// Errors from loading pipeline configuration or building a chain.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl PipelineError {
    /// Whether this wraps a [`CodecError::Config`].
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Codec(err) if err.is_config())
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
