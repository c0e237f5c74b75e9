//! Chooses the backend that answers a message.
//!
//! The remote provider is tried when the caller asks for it, or when remote
//! routing is enabled and a provider is configured. Any remote failure falls
//! back to the local responder, so a reply is always produced.
use crate::config::Config;
use crate::local::local_reply;
use crate::model::Reply;
use crate::provider::{ProviderError, RemoteProvider, get_remote_provider};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

pub struct Responder {
    provider: Option<Arc<dyn RemoteProvider>>,
    remote_enabled: bool,
}

impl Responder {
    pub fn new(provider: Option<Arc<dyn RemoteProvider>>, remote_enabled: bool) -> Self {
        Self {
            provider,
            remote_enabled,
        }
    }

    /// Creates a responder with the provider described by `config`, if any.
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let provider = get_remote_provider(config)?;
        Ok(Self::new(provider, config.use_remote))
    }

    pub fn remote_available(&self) -> bool {
        self.provider.is_some()
    }

    /// Whether a message with the given per-call override goes to the remote provider.
    pub fn should_use_remote(&self, use_remote_override: bool) -> bool {
        use_remote_override || (self.remote_enabled && self.remote_available())
    }

    /// Asks the remote provider for a reply.
    pub async fn call_remote(&self, message: &str) -> Result<String, ProviderError> {
        let provider = self.provider.as_ref().ok_or(ProviderError::NotConfigured)?;
        provider.complete(message).await
    }

    /// Returns a reply for `message`. Never fails.
    #[instrument(skip(self, message), fields(len = message.len()))]
    pub async fn get_reply(&self, message: &str, use_remote_override: bool) -> Reply {
        if !self.should_use_remote(use_remote_override) {
            return Reply::local(local_reply(message));
        }

        match self.call_remote(message).await {
            Ok(text) => {
                debug!("Reply from remote provider");
                Reply::remote(text)
            }
            Err(err) => {
                warn!("Remote provider failed, falling back to local reply: {err}");
                Reply::local(local_reply(message))
            }
        }
    }
}
