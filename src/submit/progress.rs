//! Observer trait for interface-agnostic updates
//!
//! This trait allows different interfaces (CLI, web server, etc.) to follow
//! a submission as it moves through its phases.

use crate::submit::SubmissionState;
use crate::types::AuthorId;
use async_trait::async_trait;
use std::fmt;

/// Submission phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Form open, nothing submitted yet
    #[default]
    Idle,
    /// Waiting for the backend to create the post
    CreatingPost,
    /// Streaming the image through the moderation gate
    UploadingMedia,
    /// Post (and image, if any) published
    Succeeded,
    /// Image refused by the moderation gate
    Rejected,
    /// A remote call failed
    Failed,
}

impl Phase {
    /// Whether no further remote call follows this phase
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Rejected | Self::Failed)
    }

    /// Whether a new submission may start from this phase
    pub const fn accepts_submit(self) -> bool {
        matches!(self, Self::Idle) || self.is_terminal()
    }

    /// Whether `next` directly follows this phase within one attempt
    pub const fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::CreatingPost)
                | (
                    Self::CreatingPost,
                    Self::UploadingMedia | Self::Succeeded | Self::Failed
                )
                | (
                    Self::UploadingMedia,
                    Self::Succeeded | Self::Rejected | Self::Failed
                )
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "Idle",
            Self::CreatingPost => "Creating post",
            Self::UploadingMedia => "Uploading image",
            Self::Succeeded => "Shared",
            Self::Rejected => "Rejected",
            Self::Failed => "Failed",
        };
        f.write_str(label)
    }
}

/// Submission observer trait
///
/// Implement this trait to follow a submission.
/// - CLI implementations can print to terminal
/// - Web servers can send SSE or WebSocket messages
#[async_trait]
pub trait SubmissionObserver: Send + Sync {
    /// Called after every state change, with a snapshot of the new state
    async fn on_state(&self, state: &SubmissionState);

    /// Called once a post with an image is published, to show the
    /// author's profile
    async fn on_navigate(&self, author_id: &AuthorId);
}

/// No-op observer for testing or when updates aren't needed
pub struct NoopObserver;

#[async_trait]
impl SubmissionObserver for NoopObserver {
    async fn on_state(&self, _state: &SubmissionState) {}
    async fn on_navigate(&self, _author_id: &AuthorId) {}
}
