use crate::resolver::{Outcome, Resolver};
use crate::types::{ChatMessage, Conversation};

/// Where a send is in its lifecycle. Every send returns to `Idle`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SendState {
    #[default]
    Idle,
    Sending,
    RuleMatched,
    AwaitingRemote,
    RemoteSucceeded,
    RemoteFailed,
}

/// One open chat window: the conversation plus the resolver answering it.
pub struct ChatSession {
    conversation: Conversation,
    resolver: Resolver,
    state: SendState,
    history: Vec<SendState>,
}

impl ChatSession {
    pub fn new(resolver: Resolver) -> Self {
        Self {
            conversation: Conversation::new(),
            resolver,
            state: SendState::Idle,
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> SendState {
        self.state
    }

    /// States visited during the most recent send. `send` holds the session
    /// mutably until it finishes, so this is the only record of the
    /// intermediate states.
    pub fn last_transitions(&self) -> &[SendState] {
        &self.history
    }

    /// Typing indicator. `send` finishes before control returns, so this is
    /// false whenever the caller can look; see `last_transitions`.
    pub fn is_responding(&self) -> bool {
        matches!(self.state, SendState::Sending | SendState::AwaitingRemote)
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        self.conversation.messages()
    }

    pub fn attach_document(&mut self, excerpt: String) {
        self.conversation.attach_document(excerpt);
    }

    pub fn detach_document(&mut self) -> Option<String> {
        self.conversation.detach_document()
    }

    pub fn document(&self) -> Option<&str> {
        self.conversation.document()
    }

    /// Append `text` as a user message and the resolved reply after it.
    /// Blank input is ignored and returns `None`.
    pub async fn send(&mut self, text: &str) -> Option<ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.history.clear();
        self.transition(SendState::Sending);
        self.conversation.push(ChatMessage::user(text));

        let (reply, outcome) = self
            .resolver
            .resolve_with_outcome(self.conversation.messages(), self.conversation.document())
            .await;

        match outcome {
            Outcome::NoInput | Outcome::RuleMatched => self.transition(SendState::RuleMatched),
            Outcome::RemoteSucceeded | Outcome::RemoteEmpty { .. } => {
                self.transition(SendState::AwaitingRemote);
                self.transition(SendState::RemoteSucceeded);
            }
            Outcome::RemoteFailed => {
                self.transition(SendState::AwaitingRemote);
                self.transition(SendState::RemoteFailed);
            }
        }
        tracing::debug!(?outcome, messages = self.conversation.len() + 1, "send resolved");

        self.conversation.push(reply.clone());
        self.transition(SendState::Idle);
        Some(reply)
    }

    fn transition(&mut self, next: SendState) {
        self.state = next;
        self.history.push(next);
    }
}
