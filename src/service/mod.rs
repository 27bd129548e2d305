//! Backend services for posts and media
//!
//! Provides the interface the submission engine drives, independent of the
//! transport behind it.

mod http;

pub use http::HttpPublishService;

use crate::error::Result;
use crate::types::{AttachedMedia, PostDraft, PostId, TransferProgress, UploadVerdict};
use async_trait::async_trait;

/// Receives raw transfer progress while an upload is in flight
///
/// One observer is subscribed per upload call. Reports may arrive out of
/// order; consumers are expected to clamp them.
#[async_trait]
pub trait UploadObserver: Send + Sync {
    /// Called each time the transport has pushed more bytes
    async fn on_transfer(&self, progress: TransferProgress);
}

/// Publish service trait
///
/// Abstracts the two remote calls a submission makes, so the sequencing
/// logic can run against the HTTP backend or a test double.
#[async_trait]
pub trait PublishService: Send + Sync {
    /// Create a post record and return its id
    async fn create_post(&self, draft: &PostDraft) -> Result<PostId>;

    /// Upload media for an existing post and return the moderation verdict
    ///
    /// `Err` means the transfer itself failed; a refusal by the moderation
    /// gate is an `Ok` verdict with `accepted == false`.
    async fn upload_media(
        &self,
        post_id: &PostId,
        media: &AttachedMedia,
        observer: &dyn UploadObserver,
    ) -> Result<UploadVerdict>;
}
