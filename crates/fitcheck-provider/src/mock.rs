//! Scripted provider for deterministic tests.
//!
//! The real provider is explicitly non-deterministic; every test of the
//! generation engine scripts this mock instead. Outcomes are consumed in
//! FIFO order, one per call, and every received request is recorded so
//! tests can assert on prompts and call counts.

use crate::types::{ImageGenProvider, ProviderRequest, ProviderResponse, ResponsePart};
use async_trait::async_trait;
use fitcheck_utils::{ImagePayload, MediaType, ProviderError};
use std::collections::VecDeque;
use std::sync::Mutex;

/// What the mock saw for one call.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// The instruction text of the call.
    pub prompt: String,
    /// Size of the person payload.
    pub person_bytes: usize,
    /// Size of the garment payload.
    pub garment_bytes: usize,
}

/// Scripted [`ImageGenProvider`] implementation.
#[derive(Default)]
pub struct MockProvider {
    script: Mutex<VecDeque<Result<ProviderResponse, ProviderError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockProvider {
    /// An empty mock; push outcomes before use.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a full response for the next unserved call.
    pub fn push_response(&self, parts: Vec<ResponsePart>) {
        self.script
            .lock()
            .expect("mock script lock")
            .push_back(Ok(ProviderResponse::new(parts)));
    }

    /// Script a single-image response.
    pub fn push_image(&self, bytes: &[u8]) {
        self.push_response(vec![ResponsePart::Image(ImagePayload::new(
            bytes.to_vec(),
            MediaType::Jpeg,
        ))]);
    }

    /// Script a text-only response (a declined generation).
    pub fn push_text_only(&self, text: &str) {
        self.push_response(vec![ResponsePart::Text(text.to_string())]);
    }

    /// Script an error for the next unserved call.
    pub fn push_error(&self, error: ProviderError) {
        self.script
            .lock()
            .expect("mock script lock")
            .push_back(Err(error));
    }

    /// Requests received so far, in call order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("mock request lock").clone()
    }

    /// Number of calls served so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().expect("mock request lock").len()
    }

    /// Number of scripted outcomes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.lock().expect("mock script lock").len()
    }
}

#[async_trait]
impl ImageGenProvider for MockProvider {
    async fn generate(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.requests
            .lock()
            .expect("mock request lock")
            .push(RecordedRequest {
                prompt: request.prompt.clone(),
                person_bytes: request.person.len(),
                garment_bytes: request.garment.len(),
            });

        self.script
            .lock()
            .expect("mock script lock")
            .pop_front()
            .unwrap_or_else(|| {
                Err(ProviderError::Transport(
                    "mock provider script exhausted".to_string(),
                ))
            })
    }
}
