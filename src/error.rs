//! Error types for postgate

use thiserror::Error;

/// Errors produced by the postgate library
///
/// Submission outcomes (rejected media, failed uploads) are not errors: the
/// sequencer folds them into a [`SubmissionOutcome`](crate::submit::SubmissionOutcome).
/// These variants cover the collaborators and the synchronous refusals of
/// [`Submitter::begin`](crate::submit::Submitter::begin).
#[derive(Debug, Error)]
pub enum Error {
    /// No usable session could be found
    #[error("authentication error: {0}")]
    Auth(String),

    /// The draft does not belong to the authenticated session
    #[error("draft author does not match the authenticated session")]
    Unauthenticated,

    /// Invalid configuration value
    #[error("configuration error: {0}")]
    Config(String),

    /// Backend answered with a non-success status
    #[error("backend returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Body or reason text
        message: String,
    },

    /// Policy requires an image but none was attached
    #[error("an image is required to share this post")]
    MediaRequired,

    /// A submission is already running for this form
    #[error("a submission is already in progress")]
    SubmissionInFlight,

    /// Attached media could not be read or described
    #[error("invalid media: {0}")]
    InvalidMedia(String),

    /// Transport-level HTTP failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Filesystem failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;
