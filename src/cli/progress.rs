//! CLI submission observer with styled output and an upload bar

use crate::cli::style::{ARROW, Stream, Stylize, check, cross, hyperlink_url, upload_bar_style};
use anstream::{eprintln, println};
use async_trait::async_trait;
use indicatif::ProgressBar;
use postgate::config::ServiceConfig;
use postgate::submit::{Phase, SubmissionObserver, SubmissionState};
use postgate::types::AuthorId;
use std::sync::{Mutex, PoisonError};

#[derive(Default)]
struct View {
    phase: Phase,
    bar: Option<ProgressBar>,
}

/// CLI observer that prints phase changes and draws upload progress
pub struct CliObserver {
    config: ServiceConfig,
    view: Mutex<View>,
}

impl CliObserver {
    /// Create an observer that links profiles on the given backend
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config,
            view: Mutex::new(View::default()),
        }
    }
}

#[async_trait]
impl SubmissionObserver for CliObserver {
    async fn on_state(&self, state: &SubmissionState) {
        let mut view = self.view.lock().unwrap_or_else(PoisonError::into_inner);

        if view.phase == state.phase {
            if let Some(bar) = &view.bar {
                bar.set_position(u64::from(state.progress_percent));
            }
            return;
        }
        view.phase = state.phase;

        match state.phase {
            Phase::Idle => {}
            Phase::CreatingPost => {
                println!("{}", state.status_message.emphasis());
            }
            Phase::UploadingMedia => {
                if let Some(post_id) = &state.post_id {
                    println!("  {} Created post {}", check(), post_id.accent());
                }
                println!("{}", state.status_message.emphasis());
                let bar = ProgressBar::new(100).with_style(upload_bar_style());
                bar.set_position(u64::from(state.progress_percent));
                view.bar = Some(bar);
            }
            Phase::Succeeded => {
                if let Some(bar) = view.bar.take() {
                    bar.set_position(100);
                    bar.finish_and_clear();
                }
                println!("{} {}", check(), state.status_message.success());
            }
            Phase::Rejected => {
                if let Some(bar) = view.bar.take() {
                    bar.abandon();
                }
                eprintln!("{} {}", cross(), state.status_message.warn());
            }
            Phase::Failed => {
                if let Some(bar) = view.bar.take() {
                    bar.abandon();
                }
                eprintln!("{} {}", cross(), state.status_message.error());
            }
        }
    }

    async fn on_navigate(&self, author_id: &AuthorId) {
        let url = self.config.endpoint(&format!("/profile/{author_id}"));
        println!("  {} {}", ARROW.accent(), hyperlink_url(Stream::Stdout, &url));
    }
}
