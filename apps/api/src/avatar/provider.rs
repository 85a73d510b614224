//! Hosted-model seam for avatar generation.
//!
//! `AppState` carries an `Arc<dyn AvatarGenerator>`; production wires in
//! `ReplicateClient`, tests swap in canned generators.

use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::avatar::params::{GenerationParams, MODEL, MODEL_VERSION};
use crate::avatar::photo::PhotoPayload;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("REPLICATE_API_TOKEN is not set")]
    MissingToken,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("file upload response carried no file URL")]
    MissingFileReference,

    #[error("prediction {status}: {message}")]
    PredictionFailed { status: String, message: String },

    #[error("prediction did not finish within {0:?}")]
    Timeout(Duration),
}

/// Turns a source photo into raw model output. Shape normalization happens
/// downstream, so implementations return the output untouched.
#[async_trait]
pub trait AvatarGenerator: Send + Sync {
    async fn generate(
        &self,
        photo: &PhotoPayload,
        params: &GenerationParams,
    ) -> Result<Value, ProviderError>;
}

#[derive(Debug, Deserialize)]
struct UploadedFile {
    #[serde(default)]
    urls: FileUrls,
}

#[derive(Debug, Default, Deserialize)]
struct FileUrls {
    get: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    #[serde(default)]
    id: Option<String>,
    status: String,
    #[serde(default)]
    output: Value,
    #[serde(default)]
    error: Value,
    #[serde(default)]
    urls: FileUrls,
}

#[derive(Debug, Deserialize)]
struct ReplicateErrorBody {
    detail: String,
}

/// Replicate HTTP client: file upload followed by a blocking prediction.
#[derive(Clone)]
pub struct ReplicateClient {
    client: Client,
    api_base: String,
    api_token: Option<String>,
    poll_interval: Duration,
    /// Upper bound on polling a started prediction. `None` waits until the
    /// prediction settles.
    poll_timeout: Option<Duration>,
}

impl ReplicateClient {
    pub fn new(
        api_base: String,
        api_token: Option<String>,
        poll_timeout: Option<Duration>,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("agentme/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_token,
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_timeout,
        })
    }

    #[cfg(test)]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn token(&self) -> Result<&str, ProviderError> {
        self.api_token.as_deref().ok_or(ProviderError::MissingToken)
    }

    /// Uploads the photo to Replicate's file store and returns its file URL.
    async fn upload_file(&self, photo: &PhotoPayload) -> Result<String, ProviderError> {
        let token = self.token()?;
        let part = multipart::Part::bytes(photo.bytes.to_vec())
            .file_name(photo.filename.clone())
            .mime_str(&photo.media_type)?;
        let form = multipart::Form::new().part("content", part);

        let response = self
            .client
            .post(format!("{}/files", self.api_base))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        let uploaded: UploadedFile = json_or_api_error(response).await?;

        uploaded
            .urls
            .get
            .filter(|url| !url.trim().is_empty())
            .ok_or(ProviderError::MissingFileReference)
    }

    async fn create_prediction(&self, input: Value) -> Result<Prediction, ProviderError> {
        let token = self.token()?;
        let response = self
            .client
            .post(format!("{}/predictions", self.api_base))
            .bearer_auth(token)
            .header("Prefer", "wait")
            .json(&json!({ "version": MODEL_VERSION, "input": input }))
            .send()
            .await?;
        json_or_api_error(response).await
    }

    /// Follows a still-running prediction until it settles, or until the
    /// optional poll bound runs out.
    async fn wait_for(&self, mut prediction: Prediction) -> Result<Prediction, ProviderError> {
        let started = Instant::now();
        loop {
            if prediction.status == "succeeded" {
                return Ok(prediction);
            }
            if matches!(prediction.status.as_str(), "failed" | "canceled") {
                return Err(ProviderError::PredictionFailed {
                    message: describe_error(&prediction.error),
                    status: prediction.status,
                });
            }

            if let Some(limit) = self.poll_timeout {
                if started.elapsed() >= limit {
                    return Err(ProviderError::Timeout(limit));
                }
            }

            let poll_url = prediction
                .urls
                .get
                .clone()
                .ok_or_else(|| ProviderError::PredictionFailed {
                    status: prediction.status.clone(),
                    message: "prediction is still running but has no poll URL".to_string(),
                })?;

            debug!(
                "Prediction {} is {}, polling again",
                prediction.id.as_deref().unwrap_or("?"),
                prediction.status
            );
            tokio::time::sleep(self.poll_interval).await;

            let response = self
                .client
                .get(&poll_url)
                .bearer_auth(self.token()?)
                .send()
                .await?;
            prediction = json_or_api_error(response).await?;
        }
    }
}

#[async_trait]
impl AvatarGenerator for ReplicateClient {
    async fn generate(
        &self,
        photo: &PhotoPayload,
        params: &GenerationParams,
    ) -> Result<Value, ProviderError> {
        info!("Uploading source photo to Replicate ({} bytes)", photo.bytes.len());
        let file_url = self.upload_file(photo).await?;

        info!("Generating avatar with {MODEL}");
        let prediction = self
            .create_prediction(params.to_model_input(&file_url))
            .await?;
        let prediction = self.wait_for(prediction).await?;

        Ok(prediction.output)
    }
}

async fn json_or_api_error<T: serde::de::DeserializeOwned>(
    response: Response,
) -> Result<T, ProviderError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!("Replicate API returned {status}");
        let message = serde_json::from_str::<ReplicateErrorBody>(&body)
            .map(|e| e.detail)
            .unwrap_or(body);
        return Err(ProviderError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_str(&body)?)
}

fn describe_error(error: &Value) -> String {
    match error {
        Value::Null => "no error detail".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
