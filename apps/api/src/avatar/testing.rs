//! Canned `AvatarGenerator` for handler and client tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::avatar::params::GenerationParams;
use crate::avatar::photo::PhotoPayload;
use crate::avatar::provider::{AvatarGenerator, ProviderError};

pub struct CannedGenerator {
    reply: Result<Value, String>,
    calls: AtomicUsize,
    last_photo: Mutex<Option<PhotoPayload>>,
    last_params: Mutex<Option<GenerationParams>>,
}

impl CannedGenerator {
    pub fn returning(output: Value) -> Self {
        Self::with_reply(Ok(output))
    }

    pub fn failing(message: &str) -> Self {
        Self::with_reply(Err(message.to_string()))
    }

    fn with_reply(reply: Result<Value, String>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_photo: Mutex::new(None),
            last_params: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_photo(&self) -> Option<PhotoPayload> {
        self.last_photo.lock().unwrap().clone()
    }

    pub fn last_params(&self) -> Option<GenerationParams> {
        self.last_params.lock().unwrap().clone()
    }
}

#[async_trait]
impl AvatarGenerator for CannedGenerator {
    async fn generate(
        &self,
        photo: &PhotoPayload,
        params: &GenerationParams,
    ) -> Result<Value, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_photo.lock().unwrap() = Some(photo.clone());
        *self.last_params.lock().unwrap() = Some(params.clone());

        self.reply.clone().map_err(|message| ProviderError::Api {
            status: 500,
            message,
        })
    }
}
