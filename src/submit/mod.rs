//! Two-phase submission engine
//!
//! Publishes a post and its optional image:
//! 1. Create post - the backend records the post and returns its id
//! 2. Upload media - the image is streamed to the moderation gate and
//!    linked to the post if accepted

mod adapter;
mod execute;
mod progress;
mod state;

pub use adapter::{PercentSink, ProgressAdapter, ProgressChannel, percent_of};
pub use execute::{
    CHECKING_MEDIA_MESSAGE, CREATING_POST_MESSAGE, FAILURE_MESSAGE, MEDIA_UPLOADED_MESSAGE,
    POST_SHARED_MESSAGE, PendingSubmission, SubmissionFailure, SubmissionOutcome, Submitter,
};
pub use progress::{NoopObserver, Phase, SubmissionObserver};
pub use state::SubmissionState;
