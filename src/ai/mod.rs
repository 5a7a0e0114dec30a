/// Remote model access for the hospital assistant.
///
/// # Architecture
///
/// - `client` - the [`RemoteCapability`] seam plus request/reply/error types
/// - `extract` - reply text accessors over the remote payload
/// - `providers` - concrete backends (Gemini `generateContent`)
///
/// # Usage
///
/// ```rust,no_run
/// use carechat::ai::{RemoteCapability, RemoteRequest, providers};
/// use carechat::config::AssistantConfig;
/// use carechat::types::ChatMessage;
///
/// # async fn example() -> anyhow::Result<()> {
/// let remote = providers::from_config(&AssistantConfig::from_env())?;
/// let request = RemoteRequest::from_conversation(&[ChatMessage::user("Hello!")], None);
/// let reply = remote.complete(&request).await?;
/// println!("{:?}", reply.text());
/// # Ok(())
/// # }
/// ```
mod client;
pub mod extract;
pub mod providers;

// Re-export main types
pub use client::{
    DOCUMENT_TURN_PREFIX, RemoteCapability, RemoteError, RemoteReply, RemoteRequest,
    RemoteResult, RemoteRole, RemoteTurn,
};
