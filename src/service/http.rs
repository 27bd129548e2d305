//! HTTP publish service implementation

use crate::auth::Session;
use crate::config::ServiceConfig;
use crate::error::{Error, Result};
use crate::moderation::{rejection_reason, verdict_from_success_body};
use crate::service::{PublishService, UploadObserver};
use crate::types::{AttachedMedia, PostDraft, PostId, TransferProgress, UploadVerdict};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, StatusCode};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::debug;

/// Size of each streamed upload chunk
const CHUNK_SIZE: usize = 16 * 1024;

/// Publish service using reqwest
pub struct HttpPublishService {
    client: Client,
    token: String,
    config: ServiceConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatePostPayload<'a> {
    user_id: serde_json::Value,
    description: &'a str,
}

impl HttpPublishService {
    /// Create a new HTTP service for an authenticated session
    pub fn new(config: ServiceConfig, session: &Session) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            token: session.token.clone(),
            config,
        })
    }
}

/// Numeric user ids go out as JSON numbers, anything else as a string
fn user_id_value(raw: &str) -> serde_json::Value {
    raw.parse::<i64>()
        .map_or_else(|_| serde_json::Value::from(raw), serde_json::Value::from)
}

fn parse_post_id(body: &str) -> Option<PostId> {
    let value = serde_json::from_str::<serde_json::Value>(body.trim()).ok()?;
    let id = match value {
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s,
        serde_json::Value::Object(map) => match map.get("id")? {
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::String(s) => s.clone(),
            _ => return None,
        },
        _ => return None,
    };
    (!id.is_empty()).then_some(PostId(id))
}

fn chunk(content: &Bytes) -> Vec<Bytes> {
    (0..content.len())
        .step_by(CHUNK_SIZE)
        .map(|start| content.slice(start..(start + CHUNK_SIZE).min(content.len())))
        .collect()
}

#[async_trait]
impl PublishService for HttpPublishService {
    async fn create_post(&self, draft: &PostDraft) -> Result<PostId> {
        let url = self.config.endpoint("/api/posts/add");

        let payload = CreatePostPayload {
            user_id: user_id_value(&draft.author_id.0),
            description: &draft.description,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(%status, "create post response");

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        parse_post_id(&body).ok_or_else(|| Error::Api {
            status: status.as_u16(),
            message: format!("unexpected post id in response: {body:?}"),
        })
    }

    async fn upload_media(
        &self,
        post_id: &PostId,
        media: &AttachedMedia,
        observer: &dyn UploadObserver,
    ) -> Result<UploadVerdict> {
        let url = self.config.endpoint("/api/postimages/upload");
        let total = media.content.len() as u64;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sent = 0u64;
        let stream = futures_util::stream::iter(chunk(&media.content)).map(move |piece| {
            sent += piece.len() as u64;
            // Receiver only goes away once the response is in
            let _ = tx.send(TransferProgress::new(sent, total));
            Ok::<Bytes, std::io::Error>(piece)
        });

        let part = Part::stream_with_length(Body::wrap_stream(stream), total)
            .file_name(media.file_name.clone())
            .mime_str(&media.mime_hint)
            .map_err(|e| {
                Error::InvalidMedia(format!("bad MIME type {:?}: {e}", media.mime_hint))
            })?;

        let form = Form::new().text("postId", post_id.0.clone()).part("image", part);

        let request = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .multipart(form)
            .send();
        tokio::pin!(request);

        let response = loop {
            tokio::select! {
                biased;
                Some(progress) = rx.recv() => observer.on_transfer(progress).await,
                result = &mut request => break result?,
            }
        };
        while let Ok(progress) = rx.try_recv() {
            observer.on_transfer(progress).await;
        }

        let status = response.status();
        let body = response.text().await?;
        debug!(%status, post_id = %post_id, "upload response");

        if status.is_success() {
            return Ok(verdict_from_success_body(&body));
        }

        if status == StatusCode::BAD_REQUEST {
            if let Some(reason) = rejection_reason(&body) {
                return Ok(UploadVerdict::rejected(reason));
            }
        }

        Err(Error::Api {
            status: status.as_u16(),
            message: body,
        })
    }
}
