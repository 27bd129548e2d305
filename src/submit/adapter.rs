//! Progress channel between the upload transport and the submission state
//!
//! Raw transfer reports are turned into a percentage that never goes
//! backwards within one upload.

use crate::service::UploadObserver;
use crate::types::TransferProgress;
use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

/// Percentage for a raw report, clamped to 0..=100
///
/// An unknown or zero total yields 0.
pub fn percent_of(progress: TransferProgress) -> u8 {
    match progress.total {
        Some(total) if total > 0 => {
            let done = u128::from(progress.transferred.min(total));
            let pct = done * 100 / u128::from(total);
            u8::try_from(pct).unwrap_or(100)
        }
        _ => 0,
    }
}

/// Monotonic clamp over a sequence of raw reports
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressAdapter {
    last: u8,
}

impl ProgressAdapter {
    /// Start a new upload at 0%
    pub const fn new() -> Self {
        Self { last: 0 }
    }

    /// Fold a raw report in and return the percentage to display
    pub fn observe(&mut self, progress: TransferProgress) -> u8 {
        self.last = self.last.max(percent_of(progress));
        self.last
    }

    /// Mark the upload as complete
    pub const fn complete(&mut self) -> u8 {
        self.last = 100;
        self.last
    }
}

/// Receives clamped percentages
#[async_trait]
pub trait PercentSink: Send + Sync {
    /// Called once per raw report with the clamped percentage
    async fn on_percent(&self, percent: u8);
}

/// [`UploadObserver`] that clamps reports before passing them on
pub struct ProgressChannel<'a> {
    adapter: Mutex<ProgressAdapter>,
    sink: &'a dyn PercentSink,
}

impl<'a> ProgressChannel<'a> {
    /// Subscribe a sink for one upload
    pub fn new(sink: &'a dyn PercentSink) -> Self {
        Self {
            adapter: Mutex::new(ProgressAdapter::new()),
            sink,
        }
    }

    /// Close the upload as accepted and return the final percentage
    ///
    /// Nothing is sent to the sink; the caller folds the value into the
    /// terminal state.
    pub fn complete(&self) -> u8 {
        self.adapter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .complete()
    }
}

#[async_trait]
impl UploadObserver for ProgressChannel<'_> {
    async fn on_transfer(&self, progress: TransferProgress) {
        let percent = self
            .adapter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .observe(progress);
        self.sink.on_percent(percent).await;
    }
}
