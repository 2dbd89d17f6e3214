//! The single error kind surfaced by [`crate::nasa::NasaClient`].
//!
//! Call sites get a fixed human-readable message; the underlying transport
//! or decode error is logged for diagnostics and never exposed to callers.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchError {
    message: &'static str,
}

impl FetchError {
    /// Wraps a lower-level failure, logging it and keeping only the fixed
    /// `message` for callers.
    pub(crate) fn log(message: &'static str, source: &anyhow::Error) -> Self {
        tracing::error!(error = %source, message, "external fetch failed");
        Self { message }
    }

    /// Swaps the fixed message for an entry point's own wording. The
    /// original failure was already logged at the fetch site, so this does
    /// not log again.
    pub(crate) fn relabel(self, message: &'static str) -> Self {
        Self { message }
    }

    pub fn message(&self) -> &'static str {
        self.message
    }
}
