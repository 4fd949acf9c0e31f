//! Mock generation provider for testing
//!
//! Scripted implementation of the GenerationProvider trait for use in unit
//! tests only. It is not available in production builds.

#![cfg(test)]

use super::errors::ProviderError;
use super::{GenerationProvider, GenerationRequest};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Handler = dyn Fn(&GenerationRequest) -> Result<Value, ProviderError> + Send + Sync;

/// What the mock saw for one generate call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub schema_name: String,
    pub system_prompt: String,
    pub user_prompt: String,
}

/// Mock generation provider for testing.
///
/// Responses come either from a FIFO script ([`MockProvider::enqueue`] /
/// [`MockProvider::enqueue_error`]) or from a handler closure that inspects
/// the request; the handler wins when both are set. An exhausted script
/// behaves like a provider that returned no output.
pub struct MockProvider {
    handler: Option<Arc<Handler>>,
    script: Mutex<VecDeque<Result<Value, ProviderError>>>,
    call_history: Mutex<Vec<RecordedCall>>,
    delay: Option<Duration>,
    available: bool,
}

impl MockProvider {
    /// Create a new script-driven mock provider
    pub fn new() -> Self {
        Self {
            handler: None,
            script: Mutex::new(VecDeque::new()),
            call_history: Mutex::new(Vec::new()),
            delay: None,
            available: true,
        }
    }

    /// Create a mock whose responses are computed from the request
    pub fn with_handler<F>(handler: F) -> Self
    where
        F: Fn(&GenerationRequest) -> Result<Value, ProviderError> + Send + Sync + 'static,
    {
        let mut provider = Self::new();
        provider.handler = Some(Arc::new(handler));
        provider
    }

    /// Sleep this long before answering each call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set availability status
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Queue a successful response
    pub fn enqueue(&self, value: Value) {
        self.script.lock().unwrap().push_back(Ok(value));
    }

    /// Queue an error
    pub fn enqueue_error(&self, error: ProviderError) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    /// Every call the mock has served, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.call_history.lock().unwrap().clone()
    }

    /// Calls for one schema name
    pub fn calls_for(&self, schema_name: &str) -> Vec<RecordedCall> {
        self.calls().into_iter().filter(|call| call.schema_name == schema_name).collect()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    async fn generate(&self, request: GenerationRequest) -> Result<Value, ProviderError> {
        self.call_history.lock().unwrap().push(RecordedCall {
            schema_name: request.schema.name.clone(),
            system_prompt: request.system_prompt.clone(),
            user_prompt: request.user_prompt.clone(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(handler) = &self.handler {
            return handler(&request);
        }

        match self.script.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Err(ProviderError::empty("mock")),
        }
    }
}
