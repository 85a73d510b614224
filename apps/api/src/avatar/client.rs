//! Caller side of the avatar proxy.
//!
//! A generation attempt never fails from the caller's point of view: any
//! problem reaching the proxy or reading its answer degrades to the original
//! photo, carried as a local `data:` URL.

use anyhow::Result;
use reqwest::{multipart, Client};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::avatar::params::DEFAULT_PROMPT;
use crate::avatar::photo::PhotoPayload;

pub const FALLBACK_WARNING: &str =
    "We couldn't generate your AI avatar, so we're using your photo for now.";

#[derive(Debug, Error)]
enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded {status}: {message}")]
    Status { status: u16, message: String },

    #[error("response body is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("response did not include an avatarUrl")]
    MissingAvatarUrl,
}

#[derive(Debug, Deserialize)]
struct AvatarResponseBody {
    #[serde(rename = "avatarUrl")]
    avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Optional prompt/style text sent alongside the photo.
#[derive(Debug, Clone, Default)]
pub struct AvatarOverrides {
    pub prompt: Option<String>,
    pub style: Option<String>,
}

/// Result of one generation attempt. Both variants are displayable.
#[derive(Debug, Clone, PartialEq)]
pub enum AvatarOutcome {
    Resolved(String),
    Fallback { local_url: String, reason: String },
}

impl AvatarOutcome {
    pub fn display_url(&self) -> &str {
        match self {
            AvatarOutcome::Resolved(url) => url,
            AvatarOutcome::Fallback { local_url, .. } => local_url,
        }
    }

    /// Non-blocking message to show next to a fallback avatar.
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            AvatarOutcome::Resolved(_) => None,
            AvatarOutcome::Fallback { .. } => Some(FALLBACK_WARNING),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, AvatarOutcome::Resolved(_))
    }
}

#[derive(Clone)]
pub struct AvatarClient {
    client: Client,
    endpoint: String,
}

impl AvatarClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            endpoint: format!("{}/api/generate-avatar", base_url.trim_end_matches('/')),
        })
    }

    /// Sends exactly one generation request.
    pub async fn request_avatar(
        &self,
        photo: &PhotoPayload,
        overrides: &AvatarOverrides,
    ) -> AvatarOutcome {
        match self.send(photo, overrides).await {
            Ok(url) => {
                info!("Avatar generated: {url}");
                AvatarOutcome::Resolved(url)
            }
            Err(e) => {
                warn!("Avatar generation failed, falling back to original photo: {e}");
                AvatarOutcome::Fallback {
                    local_url: photo.local_preview_url(),
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn send(
        &self,
        photo: &PhotoPayload,
        overrides: &AvatarOverrides,
    ) -> Result<String, ClientError> {
        let part = multipart::Part::bytes(photo.bytes.to_vec())
            .file_name(photo.filename.clone())
            .mime_str(&photo.media_type)?;
        let prompt = overrides.prompt.as_deref().unwrap_or(DEFAULT_PROMPT);
        let mut form = multipart::Form::new()
            .part("image", part)
            .text("prompt", prompt.to_string());
        if let Some(style) = &overrides.style {
            form = form.text("style", style.clone());
        }

        let response = self.client.post(&self.endpoint).multipart(form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: AvatarResponseBody = serde_json::from_str(&body)?;
        parsed
            .avatar_url
            .filter(|url| !url.trim().is_empty())
            .ok_or(ClientError::MissingAvatarUrl)
    }
}

/// One photo's trip through avatar generation. Keeps the original payload so
/// a regenerate reuses it instead of asking for the file again.
///
/// `regenerate` takes `&mut self`, so a single upload can never have two
/// requests outstanding.
pub struct AvatarUpload {
    photo: PhotoPayload,
    overrides: AvatarOverrides,
    outcome: AvatarOutcome,
    attempts: u32,
}

impl AvatarUpload {
    pub async fn start(
        client: &AvatarClient,
        photo: PhotoPayload,
        overrides: AvatarOverrides,
    ) -> Self {
        let outcome = client.request_avatar(&photo, &overrides).await;
        Self {
            photo,
            overrides,
            outcome,
            attempts: 1,
        }
    }

    pub async fn regenerate(&mut self, client: &AvatarClient) -> &AvatarOutcome {
        self.outcome = client.request_avatar(&self.photo, &self.overrides).await;
        self.attempts += 1;
        &self.outcome
    }

    pub fn outcome(&self) -> &AvatarOutcome {
        &self.outcome
    }

    pub fn photo(&self) -> &PhotoPayload {
        &self.photo
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}
