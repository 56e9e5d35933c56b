//! Typed client for the Scriptoria studio backend.
//!
//! This crate covers the six request contracts the studio front end relies on:
//! - Session identity (`/get_user`, `/set_user`) and restore (`/get_results`)
//! - Full production-package generation (`/generate`)
//! - Per-shot storyboard images (`/generate_shot_image`)
//! - Document export (`/export/{artifact}/{format}`)
//!
//! The backend identifies the caller by a session cookie, so the underlying
//! HTTP client keeps a cookie jar for its whole lifetime.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument, warn};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Generation runs five sequential model calls on the server.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur when talking to the studio backend.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response carrying an `{ "error": ... }` payload.
    #[error("{message}")]
    Service { status: u16, message: String },

    /// Non-2xx response without a usable error payload.
    #[error("Request failed with status {status}")]
    Status { status: u16 },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// The message the server supplied, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Error::Service { message, .. } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }

    /// The server message verbatim, or `fallback` when the server said nothing.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }

    /// HTTP status of the failed response, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Service { status, .. } | Error::Status { status } => Some(*status),
            _ => None,
        }
    }
}

// ============================================================================
// Wire vocabulary
// ============================================================================

/// One of the five deliverables the studio produces from a story prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKey {
    Screenplay,
    Characters,
    SoundDesign,
    ScriptBreakdown,
    ShotList,
}

impl ArtifactKey {
    /// All keys, in presentation order.
    pub const ALL: [ArtifactKey; 5] = [
        ArtifactKey::Screenplay,
        ArtifactKey::Characters,
        ArtifactKey::SoundDesign,
        ArtifactKey::ScriptBreakdown,
        ArtifactKey::ShotList,
    ];

    /// The key as it appears on the wire and in export file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKey::Screenplay => "screenplay",
            ArtifactKey::Characters => "characters",
            ArtifactKey::SoundDesign => "sound_design",
            ArtifactKey::ScriptBreakdown => "script_breakdown",
            ArtifactKey::ShotList => "shot_list",
        }
    }

    /// Position within [`ArtifactKey::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArtifactKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| Error::Config(format!("Unknown artifact: {s}")))
    }
}

/// Document formats the export endpoint can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Txt,
    Pdf,
    Docx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Txt, ExportFormat::Pdf, ExportFormat::Docx];

    /// File extension, also used as the path segment of the export route.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
        }
    }

    /// Upper-case badge shown next to export actions.
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "TXT",
            ExportFormat::Pdf => "PDF",
            ExportFormat::Docx => "DOCX",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "Plain Text",
            ExportFormat::Pdf => "PDF Document",
            ExportFormat::Docx => "Word Document",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportFormat::ALL
            .into_iter()
            .find(|f| f.extension().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::Config(format!("Unknown export format: {s}")))
    }
}

/// Generated text keyed by deliverable.
pub type Artifacts = BTreeMap<ArtifactKey, String>;

/// A storyboard frame returned for one shot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShotImage {
    pub image_url: String,
    /// The prompt the backend derived from the shot description.
    pub image_prompt: String,
}

// ============================================================================
// Client
// ============================================================================

/// Studio backend client.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Create a client for the backend at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        Self::with_timeouts(base_url, DEFAULT_TIMEOUT, CONNECT_TIMEOUT)
    }

    /// Create a client with explicit request and connect timeouts.
    pub fn with_timeouts(
        base_url: impl Into<String>,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, Error> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "Base URL must start with http:// or https://: {base_url}"
            )));
        }

        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the `SCRIPTORIA_URL` environment variable.
    ///
    /// Falls back to a local development server when the variable is unset.
    pub fn from_env() -> Result<Self, Error> {
        let base_url =
            std::env::var("SCRIPTORIA_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Look up the name bound to the current session, if any.
    #[instrument(skip(self))]
    pub async fn get_user(&self) -> Result<Option<String>, Error> {
        let response = self.send(self.http.get(self.url("get_user"))).await?;
        let body: UserResponse = parse_json(response).await?;
        Ok(body.name.filter(|n| !n.trim().is_empty()))
    }

    /// Fetch the artifacts produced earlier in this session.
    #[instrument(skip(self))]
    pub async fn get_results(&self) -> Result<Artifacts, Error> {
        let response = self.send(self.http.get(self.url("get_results"))).await?;
        let raw: BTreeMap<String, String> = parse_json(response).await?;
        Ok(known_artifacts(raw))
    }

    /// Bind a display name to the session. Returns the name the server stored.
    #[instrument(skip(self))]
    pub async fn set_user(&self, name: &str) -> Result<String, Error> {
        let request = self
            .http
            .post(self.url("set_user"))
            .json(&SetUserRequest { name });
        let response = self.send(request).await?;
        let status = response.status().as_u16();
        let body: SetUserResponse = parse_json(response).await?;
        if !body.success {
            return Err(Error::Service {
                status,
                message: body.error.unwrap_or_else(|| "Name was not accepted".to_string()),
            });
        }
        Ok(body.name.unwrap_or_else(|| name.to_string()))
    }

    /// Generate the full production package for a story.
    #[instrument(skip(self, story), fields(story_len = story.len()))]
    pub async fn generate(&self, story: &str) -> Result<Artifacts, Error> {
        let request = self
            .http
            .post(self.url("generate"))
            .json(&GenerateRequest { story });
        let response = self.send(request).await?;
        let body: GenerateResponse = parse_json(response).await?;
        let results = body
            .results
            .ok_or_else(|| Error::Parse("generate response has no results".to_string()))?;
        Ok(known_artifacts(results))
    }

    /// Render a storyboard image for one shot description.
    #[instrument(skip(self, shot_description), fields(len = shot_description.len()))]
    pub async fn generate_shot_image(&self, shot_description: &str) -> Result<ShotImage, Error> {
        let request = self
            .http
            .post(self.url("generate_shot_image"))
            .json(&ShotImageRequest { shot_description });
        let response = self.send(request).await?;
        parse_json(response).await
    }

    /// Render `content` as a document and return its bytes.
    #[instrument(skip(self, content, story), fields(len = content.len()))]
    pub async fn export(
        &self,
        artifact: ArtifactKey,
        format: ExportFormat,
        content: &str,
        story: &str,
    ) -> Result<Vec<u8>, Error> {
        let path = format!("export/{}/{}", artifact.as_str(), format.extension());
        let request = self
            .http
            .post(self.url(&path))
            .json(&ExportRequest { content, story });
        let response = self.send(request).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        debug!(bytes = bytes.len(), "export received");
        Ok(bytes.to_vec())
    }

    /// Send a request and turn non-2xx responses into errors.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, Error> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        warn!(status, "backend returned an error status");
        Err(error_from_body(status, &body))
    }
}

/// Build the error for a failed response from its raw body.
fn error_from_body(status: u16, body: &str) -> Error {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { error: Some(message) }) if !message.trim().is_empty() => {
            Error::Service { status, message }
        }
        _ => Error::Status { status },
    }
}

async fn parse_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, Error> {
    response
        .json()
        .await
        .map_err(|e| Error::Parse(e.to_string()))
}

/// Keep the entries whose key is a known deliverable.
fn known_artifacts(raw: BTreeMap<String, String>) -> Artifacts {
    raw.into_iter()
        .filter_map(|(key, text)| match key.parse::<ArtifactKey>() {
            Ok(key) => Some((key, text)),
            Err(_) => {
                debug!(%key, "ignoring unknown artifact key");
                None
            }
        })
        .collect()
}

// ============================================================================
// Internal wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct SetUserRequest<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    story: &'a str,
}

#[derive(Debug, Serialize)]
struct ShotImageRequest<'a> {
    shot_description: &'a str,
}

#[derive(Debug, Serialize)]
struct ExportRequest<'a> {
    content: &'a str,
    story: &'a str,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SetUserResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    results: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}
