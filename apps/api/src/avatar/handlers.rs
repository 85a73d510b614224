//! Axum route handler for the avatar proxy.

use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::{debug, info};

use crate::avatar::normalizer::resolve_avatar_url;
use crate::avatar::params::GenerationParams;
use crate::avatar::photo::PhotoPayload;
use crate::errors::AppError;
use crate::state::AppState;

const NO_IMAGE: &str = "No image file provided";
const RAW_OUTPUT_LOG_LIMIT: usize = 500;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAvatarResponse {
    pub avatar_url: String,
}

/// Fields pulled out of the multipart body. Unknown fields are ignored.
#[derive(Debug, Default)]
struct AvatarForm {
    image: Option<PhotoPayload>,
    prompt: Option<String>,
    style: Option<String>,
}

/// POST /api/generate-avatar
///
/// Relays the uploaded photo to the avatar model and answers with the first
/// usable image URL found in the model output.
pub async fn handle_generate_avatar(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerateAvatarResponse>, AppError> {
    let multipart = multipart.map_err(|_| AppError::Validation(NO_IMAGE.to_string()))?;
    let form = read_form(multipart).await?;

    let photo = form
        .image
        .filter(|photo| !photo.is_empty())
        .ok_or_else(|| AppError::Validation(NO_IMAGE.to_string()))?;
    let params = GenerationParams::with_overrides(form.prompt.as_deref(), form.style.as_deref());

    let output = state
        .avatar_generator
        .generate(&photo, &params)
        .await
        .map_err(|e| AppError::Generation(e.to_string()))?;

    info!("Model output received");
    debug!(
        "Raw model output (truncated): {}",
        truncate(&output.to_string(), RAW_OUTPUT_LOG_LIMIT)
    );

    match resolve_avatar_url(&output) {
        Some(avatar_url) => Ok(Json(GenerateAvatarResponse { avatar_url })),
        None => Err(AppError::UnparseableOutput(output)),
    }
}

async fn read_form(mut multipart: Multipart) -> Result<AvatarForm, AppError> {
    let mut form = AvatarForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let filename = field.file_name().map(str::to_string);
                let media_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read image: {e}")))?;
                form.image = Some(PhotoPayload::new(
                    bytes,
                    media_type.as_deref(),
                    filename.as_deref(),
                ));
            }
            "prompt" | "style" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read {name}: {e}")))?;
                if name == "prompt" {
                    form.prompt = Some(text);
                } else {
                    form.style = Some(text);
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(limit).collect();
    cut.push_str("...");
    cut
}
