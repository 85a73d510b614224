//! Generation parameters sent to the avatar model.
//!
//! Only the prompt and style are caller-controlled. Creativity, guidance and
//! the negative prompt are fixed for every request.

use serde_json::{json, Value};

/// Model owner/name on Replicate.
pub const MODEL: &str = "fofr/face-to-many";
/// Pinned model version. Not configurable per request.
pub const MODEL_VERSION: &str = "cd3f925f7ab21afaef7d45224790eedbb837eeac40d22e8fefe015489ab644aa";

pub const DEFAULT_PROMPT: &str = "professional avatar, cartoon style, friendly, colorful lighting";
pub const DEFAULT_STYLE: &str = "3d rendered avatar";
pub const NEGATIVE_PROMPT: &str = "blurry, low quality, distorted, disfigured";
pub const CREATIVITY: f64 = 0.35;
pub const GUIDANCE: f64 = 8.0;

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub prompt: String,
    pub style: String,
    pub negative_prompt: String,
    pub creativity: f64,
    pub guidance: f64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            style: DEFAULT_STYLE.to_string(),
            negative_prompt: NEGATIVE_PROMPT.to_string(),
            creativity: CREATIVITY,
            guidance: GUIDANCE,
        }
    }
}

impl GenerationParams {
    /// Blank overrides fall back to the defaults.
    pub fn with_overrides(prompt: Option<&str>, style: Option<&str>) -> Self {
        let mut params = Self::default();
        if let Some(prompt) = non_blank(prompt) {
            params.prompt = prompt.to_string();
        }
        if let Some(style) = non_blank(style) {
            params.style = style.to_string();
        }
        params
    }

    /// Builds the model `input` object around an uploaded file reference.
    pub fn to_model_input(&self, image_ref: &str) -> Value {
        json!({
            "image": image_ref,
            "prompt": self.prompt,
            "style": self.style,
            "creativity": self.creativity,
            "guidance": self.guidance,
            "negative_prompt": self.negative_prompt,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_constants() {
        let params = GenerationParams::default();
        assert_eq!(params.prompt, DEFAULT_PROMPT);
        assert_eq!(params.style, DEFAULT_STYLE);
        assert_eq!(params.creativity, 0.35);
        assert_eq!(params.guidance, 8.0);
    }

    #[test]
    fn test_overrides_replace_prompt_and_style_only() {
        let params = GenerationParams::with_overrides(Some("pixel art hero"), Some("8-bit"));
        assert_eq!(params.prompt, "pixel art hero");
        assert_eq!(params.style, "8-bit");
        assert_eq!(params.negative_prompt, NEGATIVE_PROMPT);
        assert_eq!(params.creativity, CREATIVITY);
        assert_eq!(params.guidance, GUIDANCE);
    }

    #[test]
    fn test_blank_overrides_keep_defaults() {
        let params = GenerationParams::with_overrides(Some("   "), None);
        assert_eq!(params, GenerationParams::default());
    }

    #[test]
    fn test_model_input_shape() {
        let input = GenerationParams::default().to_model_input("https://files/abc");
        assert_eq!(input["image"], "https://files/abc");
        assert_eq!(input["style"], DEFAULT_STYLE);
        assert_eq!(input["guidance"], 8.0);
        assert_eq!(input["negative_prompt"], NEGATIVE_PROMPT);
    }
}
