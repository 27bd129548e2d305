//! Share command - publish a post with an optional image

use crate::cli::progress::CliObserver;
use crate::cli::style::Stylize;
use anstream::println;
use dialoguer::Confirm;
use postgate::auth::get_session;
use postgate::config::{ServiceConfig, SubmitPolicy};
use postgate::error::{Error, Result};
use postgate::service::HttpPublishService;
use postgate::submit::{SubmissionOutcome, Submitter};
use postgate::types::AttachedMedia;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Options for the share command
#[derive(Debug, Clone, Default)]
pub struct ShareArgs {
    /// Post text
    pub description: String,
    /// Image to attach
    pub image: Option<PathBuf>,
    /// MIME type override for the image
    pub mime: Option<String>,
    /// Refuse to share without an image
    pub require_image: bool,
    /// Skip confirmation prompts
    pub yes: bool,
}

/// Read an image from disk and work out its MIME type
async fn load_media(path: &Path, mime: Option<&str>) -> Result<AttachedMedia> {
    let content = tokio::fs::read(path)
        .await
        .map_err(|e| Error::InvalidMedia(format!("cannot read {}: {e}", path.display())))?;

    let mime_hint = mime.map_or_else(
        || {
            mime_guess::from_path(path)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        },
        String::from,
    );

    if !mime_hint.starts_with("image/") {
        return Err(Error::InvalidMedia(format!(
            "{} is not an image ({mime_hint})",
            path.display()
        )));
    }

    let file_name = path
        .file_name()
        .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());

    debug!(path = %path.display(), %mime_hint, bytes = content.len(), "loaded image");

    Ok(AttachedMedia {
        file_name,
        ..AttachedMedia::new(content, mime_hint)
    })
}

/// Ask before sharing a text-only post, when attached to a terminal
fn confirm_without_image() -> Result<bool> {
    if !std::io::stdin().is_terminal() {
        return Ok(true);
    }
    Confirm::new()
        .with_prompt("Share without an image?")
        .default(true)
        .interact()
        .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))
}

/// Run the share command
///
/// Returns the outcome so the caller can pick an exit status.
pub async fn run_share(config: ServiceConfig, args: ShareArgs) -> Result<SubmissionOutcome> {
    let session = get_session(None)?;

    let media = match args.image.as_deref() {
        Some(path) => Some(load_media(path, args.mime.as_deref()).await?),
        None => None,
    };

    if let Some(media) = &media {
        println!(
            "Sharing post with {} ({}, {} bytes)",
            media.file_name.accent(),
            media.mime_hint.muted(),
            media.len()
        );
    } else if !args.require_image && !args.yes && !confirm_without_image()? {
        println!("{}", "Cancelled".muted());
        return Ok(SubmissionOutcome::Discarded);
    }

    let service = HttpPublishService::new(config.clone(), &session)?;
    let observer = CliObserver::new(config);
    let policy = SubmitPolicy {
        require_media: args.require_image,
    };

    let submitter = Submitter::new(
        Arc::new(service),
        Arc::new(observer),
        session.author_id.clone(),
        policy,
    );

    submitter
        .submit(session.draft(args.description), media)
        .await
}
