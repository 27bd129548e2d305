//! Submission execution
//!
//! Runs one submission: create the post, then upload and moderate its image.

use crate::config::SubmitPolicy;
use crate::error::{Error, Result};
use crate::moderation::reason_or_default;
use crate::service::PublishService;
use crate::submit::{PercentSink, Phase, ProgressChannel, SubmissionObserver, SubmissionState};
use crate::types::{AttachedMedia, AuthorId, PostDraft, PostId};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Status while the post is being created
pub const CREATING_POST_MESSAGE: &str = "Creating post...";
/// Status while the image goes through the moderation gate
pub const CHECKING_MEDIA_MESSAGE: &str = "Checking image for AI & steganography...";
/// Status after a post without an image was published
pub const POST_SHARED_MESSAGE: &str = "Post shared.";
/// Status after the image was accepted
pub const MEDIA_UPLOADED_MESSAGE: &str = "Image uploaded successfully!";
/// Status after any remote call failed
pub const FAILURE_MESSAGE: &str = "Error sharing post!";

/// Why a submission did not publish
///
/// The three cases are exclusive. In the last two the post already exists
/// without its image; it is not deleted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionFailure {
    /// The post could not be created
    #[error("post creation failed")]
    PostCreationFailed,
    /// The post exists but the image transfer failed
    #[error("image upload failed for post {post_id}")]
    MediaUploadTransportFailed {
        /// The post left without an image
        post_id: PostId,
    },
    /// The post exists but the moderation gate refused the image
    #[error("image rejected: {reason}")]
    MediaRejected {
        /// The post left without an image
        post_id: PostId,
        /// Reason given by the gate
        reason: String,
    },
}

/// Terminal result of one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The post was published
    Published {
        /// Id of the new post
        post_id: PostId,
        /// Whether an image was attached and accepted
        with_media: bool,
    },
    /// The submission ended in a failure phase
    Refused(SubmissionFailure),
    /// The form was closed while the submission ran; its result was dropped
    Discarded,
}

impl SubmissionOutcome {
    /// Whether the post was published
    pub const fn is_published(&self) -> bool {
        matches!(self, Self::Published { .. })
    }
}

struct Slot {
    generation: u64,
    state: SubmissionState,
}

/// Drives submissions for one form
///
/// Holds the single [`SubmissionState`] the form renders. At most one
/// submission runs at a time; [`Submitter::close`] detaches a running one so
/// its eventual result no longer touches the state.
pub struct Submitter {
    service: Arc<dyn PublishService>,
    observer: Arc<dyn SubmissionObserver>,
    author_id: AuthorId,
    policy: SubmitPolicy,
    slot: Mutex<Slot>,
}

impl Submitter {
    /// Create a submitter for an authenticated author
    pub fn new(
        service: Arc<dyn PublishService>,
        observer: Arc<dyn SubmissionObserver>,
        author_id: AuthorId,
        policy: SubmitPolicy,
    ) -> Self {
        Self {
            service,
            observer,
            author_id,
            policy,
            slot: Mutex::new(Slot {
                generation: 0,
                state: SubmissionState::default(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SubmissionState {
        self.lock().state.clone()
    }

    /// Whether a submission is currently running
    pub fn in_flight(&self) -> bool {
        !self.lock().state.phase.accepts_submit()
    }

    /// Close the form
    ///
    /// Resets the state to idle. A submission still in flight keeps its
    /// remote call running, but its result is discarded.
    pub fn close(&self) {
        let mut slot = self.lock();
        slot.generation += 1;
        slot.state = SubmissionState::default();
        debug!(generation = slot.generation, "submission form closed");
    }

    /// Start a submission
    ///
    /// Checks run synchronously and issue no remote calls. On success the
    /// state is already `CreatingPost`, so a second `begin` is refused until
    /// this one reaches a terminal phase.
    pub fn begin(
        &self,
        draft: PostDraft,
        media: Option<AttachedMedia>,
    ) -> Result<PendingSubmission<'_>> {
        if draft.author_id.is_empty() || draft.author_id != self.author_id {
            return Err(Error::Unauthenticated);
        }
        if self.policy.require_media && media.is_none() {
            return Err(Error::MediaRequired);
        }
        if media.as_ref().is_some_and(AttachedMedia::is_empty) {
            return Err(Error::InvalidMedia("image is empty".to_string()));
        }

        let mut slot = self.lock();
        if !slot.state.phase.accepts_submit() {
            return Err(Error::SubmissionInFlight);
        }

        slot.generation += 1;
        slot.state = SubmissionState::default();
        slot.state.advance(Phase::CreatingPost, CREATING_POST_MESSAGE);

        Ok(PendingSubmission {
            submitter: self,
            generation: slot.generation,
            draft,
            media,
        })
    }

    /// Start a submission and run it to its terminal outcome
    pub async fn submit(
        &self,
        draft: PostDraft,
        media: Option<AttachedMedia>,
    ) -> Result<SubmissionOutcome> {
        Ok(self.begin(draft, media)?.run().await)
    }
}

/// A submission that passed its checks and has not run yet
///
/// Dropping it before it reaches a terminal phase releases the form. That
/// covers never calling [`run`](Self::run) as well as dropping the `run`
/// future mid-flight, e.g. on a timeout. The remote calls already issued are
/// not undone and the observer is not notified.
pub struct PendingSubmission<'a> {
    submitter: &'a Submitter,
    generation: u64,
    draft: PostDraft,
    media: Option<AttachedMedia>,
}

impl PendingSubmission<'_> {
    /// Apply a state change if this submission still owns the form
    ///
    /// Observers see the change before this returns. Returns false when the
    /// form was closed or reused in the meantime.
    async fn apply(&self, change: impl FnOnce(&mut SubmissionState) -> bool + Send) -> bool {
        let snapshot = {
            let mut slot = self.submitter.lock();
            if slot.generation != self.generation {
                return false;
            }
            if !change(&mut slot.state) {
                return true;
            }
            slot.state.clone()
        };
        self.submitter.observer.on_state(&snapshot).await;
        true
    }

    /// Run the submission
    ///
    /// Issues `create_post` once and, if it succeeds and an image is
    /// attached, `upload_media` once.
    pub async fn run(mut self) -> SubmissionOutcome {
        let submitter = self.submitter;
        let service = &submitter.service;

        if !self.apply(|_| true).await {
            debug!("form closed before the submission started");
            return SubmissionOutcome::Discarded;
        }

        info!(author = %self.draft.author_id, with_media = self.media.is_some(), "creating post");
        let post_id = match service.create_post(&self.draft).await {
            Ok(post_id) => post_id,
            Err(e) => {
                warn!(error = %e, "post creation failed");
                return self
                    .finish(
                        |state| state.advance(Phase::Failed, FAILURE_MESSAGE),
                        SubmissionOutcome::Refused(SubmissionFailure::PostCreationFailed),
                    )
                    .await;
            }
        };
        debug!(%post_id, "post created");

        let Some(media) = self.media.take() else {
            let id = post_id.clone();
            return self
                .finish(
                    move |state| {
                        state.record_post(id);
                        state.advance(Phase::Succeeded, POST_SHARED_MESSAGE);
                    },
                    SubmissionOutcome::Published {
                        post_id,
                        with_media: false,
                    },
                )
                .await;
        };

        let id = post_id.clone();
        let owned = self
            .apply(move |state| {
                state.record_post(id);
                state.advance(Phase::UploadingMedia, CHECKING_MEDIA_MESSAGE);
                state.progress_percent = 0;
                true
            })
            .await;
        if !owned {
            debug!(%post_id, "form closed before upload, skipping it");
            return SubmissionOutcome::Discarded;
        }

        info!(%post_id, bytes = media.len(), mime = %media.mime_hint, "uploading image");
        let channel = ProgressChannel::new(&self);
        let result = service.upload_media(&post_id, &media, &channel).await;

        match result {
            Err(e) => {
                warn!(error = %e, %post_id, "image upload failed, post left without image");
                self.finish(
                    |state| state.advance(Phase::Failed, FAILURE_MESSAGE),
                    SubmissionOutcome::Refused(SubmissionFailure::MediaUploadTransportFailed {
                        post_id,
                    }),
                )
                .await
            }
            Ok(verdict) if !verdict.accepted => {
                let reason = reason_or_default(verdict.reason.as_deref());
                info!(%post_id, %reason, "image rejected by moderation");
                let message = reason.clone();
                self.finish(
                    move |state| state.advance(Phase::Rejected, message),
                    SubmissionOutcome::Refused(SubmissionFailure::MediaRejected {
                        post_id,
                        reason,
                    }),
                )
                .await
            }
            Ok(_) => {
                info!(%post_id, "image accepted");
                let percent = channel.complete();
                let outcome = self
                    .finish(
                        move |state| {
                            state.advance(Phase::Succeeded, MEDIA_UPLOADED_MESSAGE);
                            state.progress_percent = percent;
                        },
                        SubmissionOutcome::Published {
                            post_id,
                            with_media: true,
                        },
                    )
                    .await;
                if outcome.is_published() {
                    submitter.observer.on_navigate(&self.draft.author_id).await;
                }
                outcome
            }
        }
    }

    async fn finish(
        &self,
        change: impl FnOnce(&mut SubmissionState) + Send,
        outcome: SubmissionOutcome,
    ) -> SubmissionOutcome {
        let owned = self
            .apply(|state| {
                change(state);
                true
            })
            .await;
        if owned {
            outcome
        } else {
            debug!("form closed while submitting, result discarded");
            SubmissionOutcome::Discarded
        }
    }
}

#[async_trait]
impl PercentSink for PendingSubmission<'_> {
    async fn on_percent(&self, percent: u8) {
        self.apply(|state| state.record_progress(percent)).await;
    }
}

impl Drop for PendingSubmission<'_> {
    fn drop(&mut self) {
        let mut slot = self.submitter.lock();
        if slot.generation == self.generation && !slot.state.phase.is_terminal() {
            debug!(phase = %slot.state.phase, "submission dropped unfinished, releasing form");
            slot.state = SubmissionState::default();
        }
    }
}
