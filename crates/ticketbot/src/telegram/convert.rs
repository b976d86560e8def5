//! teloxide `Message` → [`IncomingMessage`]

use teloxide::types::{Message, User};
use teloxide::utils::html;

use crate::ticket::{Content, FileRef, IncomingMessage, Sender};

/// HTML mention linking to the user's profile
pub fn user_mention(user: &User) -> String {
    format!("<a href=\"tg://user?id={}\">{}</a>", user.id.0, html::escape(&user.full_name()))
}

impl From<&User> for Sender {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            full_name: user.full_name(),
            mention: user_mention(user),
        }
    }
}

/// Converts a Telegram message; `None` for anonymous senders and content
/// kinds the ticket flow does not handle (stickers, documents, ...).
pub fn incoming_from_message(msg: &Message) -> Option<IncomingMessage> {
    let sender = Sender::from(msg.from.as_ref()?);

    let content = if let Some(text) = msg.text() {
        Content::Text(text.to_string())
    } else if let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) {
        // Sizes are ordered smallest first
        Content::Photo {
            file: FileRef(photo.file.id.0.clone()),
            caption: msg.caption().map(str::to_string),
        }
    } else if let Some(voice) = msg.voice() {
        Content::Voice {
            file: FileRef(voice.file.id.0.clone()),
            caption: msg.caption().map(str::to_string),
        }
    } else {
        return None;
    };

    Some(IncomingMessage {
        chat_id: msg.chat.id.0,
        sender,
        content,
    })
}
