//! Core types for postgate

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorId(pub String);

impl AuthorId {
    /// Whether the id carries a value at all
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AuthorId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier of a post created by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub String);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PostId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A post about to be submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    /// Author of the post
    pub author_id: AuthorId,
    /// Post text (may be empty)
    pub description: String,
}

/// The single image attached to a draft
#[derive(Debug, Clone)]
pub struct AttachedMedia {
    /// Raw file content
    pub content: Bytes,
    /// MIME type sent with the upload (e.g. "image/png")
    pub mime_hint: String,
    /// File name sent with the multipart part
    pub file_name: String,
}

impl AttachedMedia {
    /// Create media with the default file name
    pub fn new(content: impl Into<Bytes>, mime_hint: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            mime_hint: mime_hint.into(),
            file_name: "upload".to_string(),
        }
    }

    /// Size of the content in bytes
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Whether the content is empty
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Verdict returned by the moderation gate for an uploaded image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadVerdict {
    /// Whether the image was accepted and linked to the post
    pub accepted: bool,
    /// Rejection reason, only set when `accepted` is false
    pub reason: Option<String>,
}

impl UploadVerdict {
    /// Accepted verdict
    pub const fn accepted() -> Self {
        Self {
            accepted: true,
            reason: None,
        }
    }

    /// Rejected verdict with a reason
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            accepted: false,
            reason: Some(reason.into()),
        }
    }
}

/// Raw transfer progress reported by the upload transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    /// Bytes sent so far
    pub transferred: u64,
    /// Total bytes, if known
    pub total: Option<u64>,
}

impl TransferProgress {
    /// Progress with a known total
    pub const fn new(transferred: u64, total: u64) -> Self {
        Self {
            transferred,
            total: Some(total),
        }
    }

    /// Progress without a known total
    pub const fn unknown_total(transferred: u64) -> Self {
        Self {
            transferred,
            total: None,
        }
    }
}
