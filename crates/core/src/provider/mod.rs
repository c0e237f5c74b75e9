pub mod openai;
mod openai_types;
#[cfg(test)]
pub(crate) mod test_provider;

use crate::config::Config;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Remote provider is not configured")]
    NotConfigured,
    #[error("Request to remote provider failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Remote provider returned status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Malformed response from remote provider: {0}")]
    MalformedResponse(String),
}

/// A hosted chat-completion backend answering one message at a time.
#[async_trait]
pub trait RemoteProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn complete(&self, message: &str) -> Result<String, ProviderError>;
}

/// Builds the remote provider if the configuration carries an API key.
#[instrument(skip(config))]
pub fn get_remote_provider(
    config: &Config,
) -> Result<Option<Arc<dyn RemoteProvider>>, ProviderError> {
    match &config.api_key {
        Some(api_key) => {
            let provider = openai::OpenAIProvider::new(api_key.clone(), &config.provider)?;
            debug!(model = %config.provider.model, "Remote provider configured");
            Ok(Some(Arc::new(provider)))
        }
        None => {
            debug!("No API key set, replies stay local");
            Ok(None)
        }
    }
}
