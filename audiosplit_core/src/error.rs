use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while splitting audio files.
#[derive(Debug, Error)]
pub enum AudioSplitError {
    /// The request cannot be executed as given. Reported before any external
    /// call is made.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Querying the duration of the input failed.
    #[error("failed to probe duration of '{}': {reason}", path.display())]
    Probe { path: PathBuf, reason: String },

    /// The external transcoder failed on a window. Windows before it were
    /// written and are left in place.
    #[error("failed to transcode chunk {}: {reason}", window + 1)]
    Transcode { window: usize, reason: String },

    /// Wrapper around IO errors encountered while preparing the output folder.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The background worker exited without reporting a result.
    #[error("split worker terminated unexpectedly")]
    WorkerLost,
}

impl AudioSplitError {
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn probe<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        Self::Probe {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn transcode<S: Into<String>>(window: usize, reason: S) -> Self {
        Self::Transcode {
            window,
            reason: reason.into(),
        }
    }
}
