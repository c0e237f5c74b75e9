//! A mock remote provider for unit testing purposes.
use super::{ProviderError, RemoteProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// What the mock answers with on every call.
#[derive(Debug, Clone)]
pub(crate) enum TestResponse {
    Reply(String),
    /// Simulates the provider returning an error payload.
    ApiError(String),
}

/// A mock `RemoteProvider` that records how often it was called.
#[derive(Debug)]
pub(crate) struct TestProvider {
    response: TestResponse,
    calls: AtomicUsize,
}

impl TestProvider {
    pub(crate) fn new(response: TestResponse) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteProvider for TestProvider {
    fn name(&self) -> &str {
        "test"
    }

    async fn complete(&self, _message: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            TestResponse::Reply(text) => Ok(text.clone()),
            TestResponse::ApiError(message) => Err(ProviderError::Api {
                status: 500,
                message: message.clone(),
            }),
        }
    }
}
