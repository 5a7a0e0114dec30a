use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:zero]:[minute padding:zero] [period case:upper]");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
    System,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub timestamp: Option<OffsetDateTime>,
}

impl ChatMessage {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp: Some(OffsetDateTime::now_utc()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, text)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Sender::System, text)
    }

    /// Timestamp rendered in the local offset, e.g. `09:41 AM`.
    pub fn display_time(&self) -> Option<String> {
        let mut datetime = self.timestamp?;
        if let Ok(offset) = UtcOffset::current_local_offset() {
            datetime = datetime.to_offset(offset);
        }
        datetime.format(MESSAGE_TIME_FORMAT).ok()
    }
}

/// Messages exchanged in one chat session, plus the document the user
/// attached (if any). Messages can only be appended.
#[derive(Clone, Debug, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    document: Option<String>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last_user_text(&self) -> Option<&str> {
        last_user_text(&self.messages)
    }

    pub fn attach_document(&mut self, excerpt: String) {
        self.document = Some(excerpt);
    }

    pub fn detach_document(&mut self) -> Option<String> {
        self.document.take()
    }

    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }
}

/// Text of the most recent user-authored message that is not blank.
pub fn last_user_text(messages: &[ChatMessage]) -> Option<&str> {
    messages
        .iter()
        .rev()
        .filter(|msg| msg.sender == Sender::User)
        .map(|msg| msg.text.as_str())
        .find(|text| !text.trim().is_empty())
}
