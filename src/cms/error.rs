//! Fetch errors surfaced by the CMS client

use thiserror::Error;

/// A failed fetch against the content service.
///
/// Views turn every variant into their error state; none of these reach the
/// render path as a panic.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("CMS request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("CMS responded with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed CMS response: {0}")]
    Malformed(String),

    #[error("CMS is not configured: {0}")]
    NotConfigured(String),
}

impl FetchError {
    /// Whether the failure happened before a response arrived
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport(_))
    }
}
