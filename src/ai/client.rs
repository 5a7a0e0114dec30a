use crate::types::{ChatMessage, Sender};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

// ============================================
// Error Types
// ============================================

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("No API key configured for the remote model")]
    MissingCredential,

    #[error("Request to remote model failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Remote model returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Remote model returned malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Remote model did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Remote model call panicked: {0}")]
    Panicked(String),
}

impl RemoteError {
    /// Errors an operator has to fix; everything else is transient.
    pub fn is_configuration(&self) -> bool {
        match self {
            RemoteError::MissingCredential => true,
            RemoteError::Status { status, .. } => {
                matches!(status.as_u16(), 400 | 401 | 403 | 404)
            }
            _ => false,
        }
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;

// ============================================
// Request / Reply
// ============================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteRole {
    User,
    Model,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RemoteTurn {
    pub role: RemoteRole,
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RemoteRequest {
    pub turns: Vec<RemoteTurn>,
    pub system_instruction: Option<String>,
}

pub const DOCUMENT_TURN_PREFIX: &str = "Attached document excerpt:\n";

impl RemoteRequest {
    /// Reshape the chat history into remote turns. System messages are
    /// folded into the system instruction and the excerpt, if any, becomes
    /// the final user turn.
    pub fn from_conversation(messages: &[ChatMessage], excerpt: Option<&str>) -> Self {
        let mut turns = Vec::with_capacity(messages.len() + 1);
        let mut system_parts = Vec::new();

        for msg in messages.iter().filter(|m| !m.text.trim().is_empty()) {
            match msg.sender {
                Sender::User => turns.push(RemoteTurn {
                    role: RemoteRole::User,
                    text: msg.text.clone(),
                }),
                Sender::Assistant => turns.push(RemoteTurn {
                    role: RemoteRole::Model,
                    text: msg.text.clone(),
                }),
                Sender::System => system_parts.push(msg.text.as_str()),
            }
        }

        if let Some(excerpt) = excerpt.filter(|e| !e.trim().is_empty()) {
            turns.push(RemoteTurn {
                role: RemoteRole::User,
                text: format!("{DOCUMENT_TURN_PREFIX}{excerpt}"),
            });
        }

        Self {
            turns,
            system_instruction: (!system_parts.is_empty()).then(|| system_parts.join("\n\n")),
        }
    }

    pub fn with_system_instruction(mut self, preamble: &str) -> Self {
        self.system_instruction = Some(match self.system_instruction.take() {
            Some(existing) => format!("{preamble}\n\n{existing}"),
            None => preamble.to_string(),
        });
        self
    }
}

/// Parsed JSON body of a successful remote call. Its shape is not fixed;
/// see [`super::extract`].
#[derive(Clone, Debug, PartialEq)]
pub struct RemoteReply {
    pub payload: serde_json::Value,
}

impl RemoteReply {
    pub fn new(payload: serde_json::Value) -> Self {
        Self { payload }
    }

    pub fn text(&self) -> Option<String> {
        super::extract::extract_reply_text(&self.payload)
    }
}

// ============================================
// Capability Trait
// ============================================

#[async_trait]
pub trait RemoteCapability: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, request: &RemoteRequest) -> RemoteResult<RemoteReply>;
}
