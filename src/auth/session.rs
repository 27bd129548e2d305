//! Session lookup and verification

use crate::auth::AuthSource;
use crate::config::ServiceConfig;
use crate::error::{Error, Result};
use crate::types::{AuthorId, PostDraft};
use reqwest::Client;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable holding the bearer token
pub const TOKEN_ENV: &str = "POSTGATE_TOKEN";

/// Environment variable holding the authenticated user id
pub const USER_ID_ENV: &str = "POSTGATE_USER_ID";

/// An authenticated caller
///
/// Collaborators receive the session explicitly; nothing reads ambient
/// credentials after [`get_session`] returns.
#[derive(Debug, Clone)]
pub struct Session {
    /// Authenticated user
    pub author_id: AuthorId,
    /// Bearer token for backend calls
    pub token: String,
    /// Where the credentials came from
    pub source: AuthSource,
}

impl Session {
    /// Build a draft authored by this session's user
    pub fn draft(&self, description: impl Into<String>) -> PostDraft {
        PostDraft {
            author_id: self.author_id.clone(),
            description: description.into(),
        }
    }
}

#[derive(Deserialize)]
struct SessionFile {
    user_id: serde_json::Value,
    token: String,
}

/// Default location of the session file
pub fn session_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("postgate").join("session.json"))
}

/// Get the current session
///
/// Priority:
/// 1. `POSTGATE_TOKEN` + `POSTGATE_USER_ID` environment variables
/// 2. the session file (`<config dir>/postgate/session.json`, or `path`)
pub fn get_session(path: Option<&Path>) -> Result<Session> {
    if let (Ok(token), Ok(user_id)) = (env::var(TOKEN_ENV), env::var(USER_ID_ENV)) {
        debug!("using session from environment");
        return validate(user_id, token, AuthSource::EnvVar);
    }

    let path = path.map(Path::to_path_buf).or_else(session_file_path);
    if let Some(path) = path.filter(|p| p.exists()) {
        debug!(path = %path.display(), "using session file");
        let raw = std::fs::read_to_string(&path)?;
        let file: SessionFile = serde_json::from_str(&raw)?;
        let user_id = match file.user_id {
            serde_json::Value::String(s) => s,
            serde_json::Value::Number(n) => n.to_string(),
            other => {
                return Err(Error::Auth(format!("session file has an invalid user_id: {other}")));
            }
        };
        return validate(user_id, file.token, AuthSource::SessionFile);
    }

    Err(Error::Auth(format!(
        "No session found. Set {TOKEN_ENV} and {USER_ID_ENV} or run `postgate auth setup`"
    )))
}

fn validate(user_id: String, token: String, source: AuthSource) -> Result<Session> {
    let author_id = AuthorId(user_id.trim().to_string());
    let token = token.trim().to_string();
    if author_id.is_empty() {
        return Err(Error::Auth("session has an empty user id".to_string()));
    }
    if token.is_empty() {
        return Err(Error::Auth("session has an empty token".to_string()));
    }
    Ok(Session {
        author_id,
        token,
        source,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserProfile {
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

/// Test a session against the backend
///
/// Returns a display name for the authenticated user.
pub async fn test_session(config: &ServiceConfig, session: &Session) -> Result<String> {
    let url = config.endpoint(&format!("/api/users/{}", session.author_id));

    let user: UserProfile = Client::builder()
        .timeout(config.timeout)
        .build()?
        .get(&url)
        .bearer_auth(&session.token)
        .send()
        .await?
        .error_for_status()
        .map_err(|e| Error::Auth(format!("Invalid session: {e}")))?
        .json()
        .await?;

    let name = [user.first_name, user.last_name]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    Ok(if name.is_empty() {
        user.email.unwrap_or_else(|| format!("user {}", session.author_id))
    } else {
        name
    })
}
