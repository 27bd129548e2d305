//! Test data factories for postgate types
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use postgate::config::SubmitPolicy;
use postgate::submit::Submitter;
use postgate::types::{AttachedMedia, AuthorId, PostDraft, TransferProgress};
use std::sync::Arc;

use super::mock_service::{MockPublishService, RecordingObserver};

/// Author used by the fixtures
pub const AUTHOR: &str = "42";

/// Create a draft by the fixture author
pub fn make_draft(description: &str) -> PostDraft {
    PostDraft {
        author_id: AuthorId::from(AUTHOR),
        description: description.to_string(),
    }
}

/// Create a PNG attachment of `len` bytes
pub fn make_media(len: usize) -> AttachedMedia {
    AttachedMedia::new(vec![0u8; len], "image/png")
}

/// Raw progress reports out of a total of 100 bytes
pub fn percent_script(values: &[u64]) -> Vec<TransferProgress> {
    values
        .iter()
        .map(|&v| TransferProgress::new(v, 100))
        .collect()
}

/// A submitter wired to a mock service and a recording observer
pub struct Harness {
    pub service: Arc<MockPublishService>,
    pub observer: Arc<RecordingObserver>,
    pub submitter: Submitter,
}

impl Harness {
    /// Build a harness with the default policy
    pub fn new(post_id: &str) -> Self {
        Self::with_policy(post_id, SubmitPolicy::default())
    }

    /// Build a harness with an explicit policy
    pub fn with_policy(post_id: &str, policy: SubmitPolicy) -> Self {
        let service = Arc::new(MockPublishService::new(post_id));
        let observer = Arc::new(RecordingObserver::default());
        let submitter = Submitter::new(
            service.clone(),
            observer.clone(),
            AuthorId::from(AUTHOR),
            policy,
        );
        Self {
            service,
            observer,
            submitter,
        }
    }
}
