//! Transport-neutral view of an incoming chat message.

use std::fmt;

use super::session::SessionKey;

/// Opaque reference to a file already stored by the chat platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef(pub String);

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who sent the message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub id: u64,
    /// Display name as the user set it (unescaped)
    pub full_name: String,
    /// Ready-to-send HTML mention of the user
    pub mention: String,
}

/// Content kinds the bot understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Photo { file: FileRef, caption: Option<String> },
    Voice { file: FileRef, caption: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ContentKind {
    Text,
    Photo,
    Voice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub chat_id: i64,
    pub sender: Sender,
    pub content: Content,
}

impl IncomingMessage {
    pub fn key(&self) -> SessionKey {
        SessionKey::new(self.chat_id, self.sender.id)
    }

    /// Message text; `None` for photo and voice messages
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn kind(&self) -> ContentKind {
        match self.content {
            Content::Text(_) => ContentKind::Text,
            Content::Photo { .. } => ContentKind::Photo,
            Content::Voice { .. } => ContentKind::Voice,
        }
    }
}
