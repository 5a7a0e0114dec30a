//! Reply resolution for a chat turn.
//!
//! Order of precedence:
//! 1. no user input: fixed reply, remote untouched
//! 2. local rule table on the latest user text
//! 3. remote model with the full history (and document excerpt)
//! 4. rule table again when the remote reply has no text, then a
//!    rephrase prompt
//!
//! Remote failures of any kind, including a panicking provider, become an
//! unavailability reply. Nothing on this path returns an error to the caller.

use crate::ai::{RemoteCapability, RemoteError, RemoteRequest};
use crate::config::DEFAULT_TIMEOUT_SECS;
use crate::document::truncate_excerpt;
use crate::rules::{RuleTable, available_capabilities};
use crate::types::{ChatMessage, Sender, last_user_text};
use futures::FutureExt;
use std::borrow::Cow;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

pub const NO_INPUT_REPLY: &str = "I didn't receive a message. Please type your question and I'll do my best to help.";
pub const REPHRASE_REPLY: &str = "Sorry, I couldn't process that. Could you please rephrase your question?";

const SYSTEM_PREAMBLE: &str = r#"You are the virtual front-desk assistant of a hospital network.
Help patients with appointments, hospital services, doctors, billing, and general health questions.
Be concise and friendly. Do not diagnose; recommend seeing a doctor for medical concerns.
If something sounds like an emergency, tell the user to call emergency services immediately."#;

pub fn unavailable_reply() -> String {
    format!(
        "I'm having trouble reaching our assistant service right now. I can still help with {}.",
        available_capabilities()
    )
}

/// Which branch produced a reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    NoInput,
    RuleMatched,
    RemoteSucceeded,
    RemoteEmpty { rule_matched: bool },
    RemoteFailed,
}

pub struct Resolver {
    rules: Cow<'static, RuleTable>,
    remote: Arc<dyn RemoteCapability>,
    timeout: Duration,
}

impl Resolver {
    pub fn new(remote: Arc<dyn RemoteCapability>) -> Self {
        Self {
            rules: Cow::Borrowed(RuleTable::hospital_defaults()),
            remote,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_rules(mut self, rules: RuleTable) -> Self {
        self.rules = Cow::Owned(rules);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Rule lookup over every user message, newest first. Used when the
    /// remote reply had no text, so an earlier intent can still be served.
    fn rematch_history(&self, messages: &[ChatMessage]) -> Option<&str> {
        messages
            .iter()
            .rev()
            .filter(|msg| msg.sender == Sender::User)
            .find_map(|msg| self.rules.match_text(&msg.text))
    }

    pub async fn resolve(&self, messages: &[ChatMessage], excerpt: Option<&str>) -> ChatMessage {
        self.resolve_with_outcome(messages, excerpt).await.0
    }

    pub async fn resolve_with_outcome(
        &self,
        messages: &[ChatMessage],
        excerpt: Option<&str>,
    ) -> (ChatMessage, Outcome) {
        let Some(user_text) = last_user_text(messages) else {
            tracing::debug!("no user input to resolve");
            return (ChatMessage::assistant(NO_INPUT_REPLY), Outcome::NoInput);
        };

        if let Some(reply) = self.rules.match_text(user_text) {
            tracing::debug!("answered from local rules");
            return (ChatMessage::assistant(reply), Outcome::RuleMatched);
        }

        let excerpt = excerpt.map(truncate_excerpt);
        let request = RemoteRequest::from_conversation(messages, excerpt.as_deref())
            .with_system_instruction(SYSTEM_PREAMBLE);

        let call = AssertUnwindSafe(self.remote.complete(&request)).catch_unwind();
        let result = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(result)) => result,
            Ok(Err(panic)) => Err(RemoteError::Panicked(panic_message(panic.as_ref()))),
            Err(_) => Err(RemoteError::Timeout(self.timeout)),
        };

        match result {
            Ok(reply) => match reply.text() {
                Some(text) => {
                    tracing::debug!(provider = self.remote.name(), "remote reply received");
                    (ChatMessage::assistant(text), Outcome::RemoteSucceeded)
                }
                None => {
                    tracing::warn!(
                        provider = self.remote.name(),
                        "remote reply contained no text"
                    );
                    match self.rematch_history(messages) {
                        Some(rule) => (
                            ChatMessage::assistant(rule),
                            Outcome::RemoteEmpty { rule_matched: true },
                        ),
                        None => (
                            ChatMessage::assistant(REPHRASE_REPLY),
                            Outcome::RemoteEmpty { rule_matched: false },
                        ),
                    }
                }
            },
            Err(err) => {
                if matches!(err, RemoteError::Panicked(_)) {
                    tracing::error!(provider = self.remote.name(), error = %err, "remote model panicked");
                } else if err.is_configuration() {
                    tracing::error!(provider = self.remote.name(), error = %err, "remote model misconfigured");
                } else {
                    tracing::warn!(provider = self.remote.name(), error = %err, "remote model call failed");
                }
                (ChatMessage::assistant(unavailable_reply()), Outcome::RemoteFailed)
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
