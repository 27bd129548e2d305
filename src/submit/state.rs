//! Observable submission state

use crate::submit::Phase;
use crate::types::PostId;

/// The record an interface renders while a submission runs
///
/// Only the [`Submitter`](crate::submit::Submitter) mutates it; observers get
/// snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionState {
    /// Current phase
    pub phase: Phase,
    /// Set once the backend has created the post
    pub post_id: Option<PostId>,
    /// Upload progress, 0-100
    pub progress_percent: u8,
    /// Human-readable description of the phase or terminal reason
    pub status_message: String,
}

impl SubmissionState {
    /// Move to the next phase with a new status message
    pub(crate) fn advance(&mut self, next: Phase, message: impl Into<String>) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "illegal phase transition {:?} -> {next:?}",
            self.phase
        );
        self.phase = next;
        self.status_message = message.into();
    }

    /// Record the id of the created post
    pub(crate) fn record_post(&mut self, post_id: PostId) {
        debug_assert!(self.post_id.is_none(), "post id already recorded");
        self.post_id = Some(post_id);
    }

    /// Record upload progress, keeping the highest value seen
    ///
    /// Returns false outside `UploadingMedia`, where progress is meaningless.
    pub(crate) fn record_progress(&mut self, percent: u8) -> bool {
        if self.phase != Phase::UploadingMedia {
            return false;
        }
        self.progress_percent = self.progress_percent.max(percent.min(100));
        true
    }
}
