pub mod gemini;

use crate::ai::client::{RemoteCapability, RemoteResult};
use crate::config::AssistantConfig;
use std::sync::Arc;

pub use gemini::GeminiProvider;

/// Build the remote capability described by `config`.
///
/// A missing API key is not an error here: the provider is still built and
/// reports the missing credential per call, so the local rules keep working.
pub fn from_config(config: &AssistantConfig) -> RemoteResult<Arc<dyn RemoteCapability>> {
    if config.api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set; remote replies will be unavailable");
    }
    let provider = GeminiProvider::new(config)?;
    tracing::debug!(model = %config.model, endpoint = %provider.endpoint(), "configured gemini provider");
    Ok(Arc::new(provider))
}
