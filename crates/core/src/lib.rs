mod assets;
mod provider;
#[cfg(test)]
mod test_utils;

pub mod config;
pub mod local;
pub mod model;
pub mod responder;

pub use crate::assets::get_data_dir;
pub use crate::provider::openai::OpenAIProvider;
pub use crate::provider::{ProviderError, RemoteProvider, get_remote_provider};
