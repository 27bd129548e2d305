//! Mock publish service for testing
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use postgate::error::{Error, Result};
use postgate::service::{PublishService, UploadObserver};
use postgate::submit::{SubmissionObserver, SubmissionState};
use postgate::types::{AttachedMedia, AuthorId, PostDraft, PostId, TransferProgress, UploadVerdict};
use std::io;
use std::sync::Mutex;
use tokio::sync::Notify;

/// Call record for `upload_media`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCall {
    pub post_id: PostId,
    pub mime_hint: String,
    pub bytes: usize,
}

/// Simple mock publish service for testing
///
/// Features:
/// - Configurable post id and verdict
/// - Scripted raw progress reports during upload
/// - Call tracking for verification
/// - Error injection for failure path testing
/// - Optional gates that hold `create_post` or `upload_media` until released
pub struct MockPublishService {
    post_id: PostId,
    verdict: Mutex<UploadVerdict>,
    progress_script: Mutex<Vec<TransferProgress>>,
    // Call tracking
    create_post_calls: Mutex<Vec<PostDraft>>,
    upload_calls: Mutex<Vec<UploadCall>>,
    // Error injection
    error_on_create_post: Mutex<Option<String>>,
    error_on_upload: Mutex<Option<String>>,
    // Suspension
    hold_create_post: Mutex<bool>,
    create_post_entered: Notify,
    release_create_post: Notify,
    hold_upload_after: Mutex<Option<usize>>,
    upload_entered: Notify,
    release_upload: Notify,
}

impl MockPublishService {
    /// Create a mock that returns `post_id` and accepts every image
    pub fn new(post_id: &str) -> Self {
        Self {
            post_id: PostId::from(post_id),
            verdict: Mutex::new(UploadVerdict::accepted()),
            progress_script: Mutex::new(Vec::new()),
            create_post_calls: Mutex::new(Vec::new()),
            upload_calls: Mutex::new(Vec::new()),
            error_on_create_post: Mutex::new(None),
            error_on_upload: Mutex::new(None),
            hold_create_post: Mutex::new(false),
            create_post_entered: Notify::new(),
            release_create_post: Notify::new(),
            hold_upload_after: Mutex::new(None),
            upload_entered: Notify::new(),
            release_upload: Notify::new(),
        }
    }

    // === Configuration ===

    /// Make `upload_media` return this verdict
    pub fn set_verdict(&self, verdict: UploadVerdict) {
        *self.verdict.lock().unwrap() = verdict;
    }

    /// Raw progress reports emitted, in order, during `upload_media`
    pub fn set_progress_script(&self, script: Vec<TransferProgress>) {
        *self.progress_script.lock().unwrap() = script;
    }

    /// Make `create_post` wait until [`Self::release`] is called
    pub fn hold_create_post(&self) {
        *self.hold_create_post.lock().unwrap() = true;
    }

    /// Wait until `create_post` has been entered
    pub async fn create_post_entered(&self) {
        self.create_post_entered.notified().await;
    }

    /// Let a held `create_post` resolve
    pub fn release(&self) {
        self.release_create_post.notify_one();
    }

    /// Make `upload_media` wait after `reports` scripted progress reports
    /// until [`Self::release_upload`] is called
    pub fn hold_upload_after(&self, reports: usize) {
        *self.hold_upload_after.lock().unwrap() = Some(reports);
    }

    /// Wait until `upload_media` is parked at its gate
    pub async fn upload_entered(&self) {
        self.upload_entered.notified().await;
    }

    /// Let a held `upload_media` continue
    pub fn release_upload(&self) {
        self.release_upload.notify_one();
    }

    // === Error injection methods ===

    /// Make `create_post` return an error
    pub fn fail_create_post(&self, msg: &str) {
        *self.error_on_create_post.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `upload_media` return a transport error
    pub fn fail_upload(&self, msg: &str) {
        *self.error_on_upload.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification methods ===

    /// Get all `create_post` calls
    pub fn get_create_post_calls(&self) -> Vec<PostDraft> {
        self.create_post_calls.lock().unwrap().clone()
    }

    /// Get all `upload_media` calls
    pub fn get_upload_calls(&self) -> Vec<UploadCall> {
        self.upload_calls.lock().unwrap().clone()
    }

    /// Total number of remote calls made
    pub fn total_calls(&self) -> usize {
        self.get_create_post_calls().len() + self.get_upload_calls().len()
    }
}

impl MockPublishService {
    async fn park_upload(&self) {
        self.upload_entered.notify_one();
        self.release_upload.notified().await;
    }
}

#[async_trait]
impl PublishService for MockPublishService {
    async fn create_post(&self, draft: &PostDraft) -> Result<PostId> {
        self.create_post_calls.lock().unwrap().push(draft.clone());

        let hold = *self.hold_create_post.lock().unwrap();
        if hold {
            self.create_post_entered.notify_one();
            self.release_create_post.notified().await;
        }

        // Check for injected error
        if let Some(msg) = self.error_on_create_post.lock().unwrap().as_ref() {
            return Err(Error::Api {
                status: 500,
                message: msg.clone(),
            });
        }

        Ok(self.post_id.clone())
    }

    async fn upload_media(
        &self,
        post_id: &PostId,
        media: &AttachedMedia,
        observer: &dyn UploadObserver,
    ) -> Result<UploadVerdict> {
        self.upload_calls.lock().unwrap().push(UploadCall {
            post_id: post_id.clone(),
            mime_hint: media.mime_hint.clone(),
            bytes: media.len(),
        });

        let script = self.progress_script.lock().unwrap().clone();
        let hold_at = *self.hold_upload_after.lock().unwrap();
        let reports = script.len();
        for (i, progress) in script.into_iter().enumerate() {
            if hold_at == Some(i) {
                self.park_upload().await;
            }
            observer.on_transfer(progress).await;
        }
        if hold_at.is_some_and(|at| at >= reports) {
            self.park_upload().await;
        }

        // Check for injected error
        if let Some(msg) = self.error_on_upload.lock().unwrap().as_ref() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::ConnectionReset,
                msg.clone(),
            )));
        }

        Ok(self.verdict.lock().unwrap().clone())
    }
}

/// Observer that records every snapshot and navigation
#[derive(Default)]
pub struct RecordingObserver {
    states: Mutex<Vec<SubmissionState>>,
    navigations: Mutex<Vec<AuthorId>>,
}

impl RecordingObserver {
    /// All snapshots received, in order
    pub fn states(&self) -> Vec<SubmissionState> {
        self.states.lock().unwrap().clone()
    }

    /// Phases of the received snapshots with consecutive repeats removed
    pub fn phase_path(&self) -> Vec<postgate::submit::Phase> {
        let mut path = self.states().into_iter().map(|s| s.phase).collect::<Vec<_>>();
        path.dedup();
        path
    }

    /// Progress values observed while uploading
    pub fn upload_progress(&self) -> Vec<u8> {
        self.states()
            .into_iter()
            .filter(|s| s.phase == postgate::submit::Phase::UploadingMedia)
            .map(|s| s.progress_percent)
            .collect()
    }

    /// Authors navigated to
    pub fn navigations(&self) -> Vec<AuthorId> {
        self.navigations.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmissionObserver for RecordingObserver {
    async fn on_state(&self, state: &SubmissionState) {
        self.states.lock().unwrap().push(state.clone());
    }

    async fn on_navigate(&self, author_id: &AuthorId) {
        self.navigations.lock().unwrap().push(author_id.clone());
    }
}
