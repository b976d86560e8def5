//! Outgoing replies produced by the ticket flow.

use super::message::FileRef;
use super::subjects::PREDEFINED_SUBJECTS;

/// Label of the button that starts the form
pub const CREATE_TICKET: &str = "Create a ticket";

/// Label of the button offered next to the description prompt
pub const CANCEL: &str = "Cancel";

pub const WELCOME_TEXT: &str = "Hello, welcome to the bot! Please use one of the buttons below";
pub const SELECT_SUBJECT_TEXT: &str = "Please select the subject of the ticket:";
pub const INVALID_SUBJECT_TEXT: &str = "Please select a valid subject from the provided options.";
pub const CANCELLED_TEXT: &str = "Ticket creation cancelled.";
pub const HELP_TEXT: &str = "To open a ticket press \"Create a ticket\", pick a subject, then send the \
description as text, a photo, a voice message or a link. Use /cancel to abandon a ticket in progress.";

/// Reply keyboard shown under the message input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// One button per row, only for the addressed user
    Choices(Vec<String>),
    /// A single persistent row
    Single(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Message {
        text: String,
        keyboard: Option<Keyboard>,
        html: bool,
    },
    /// Re-send an already uploaded photo
    Photo(FileRef),
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply::Message {
            text: text.into(),
            keyboard: None,
            html: false,
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Reply::Message {
            text: text.into(),
            keyboard: Some(keyboard),
            html: false,
        }
    }

    pub fn welcome() -> Self {
        Self::with_keyboard(WELCOME_TEXT, Keyboard::Single(CREATE_TICKET.to_string()))
    }

    pub fn subject_choices() -> Self {
        Self::with_keyboard(
            SELECT_SUBJECT_TEXT,
            Keyboard::Choices(PREDEFINED_SUBJECTS.iter().map(|s| s.to_string()).collect()),
        )
    }

    pub fn description_prompt(subject: &str) -> Self {
        Self::with_keyboard(
            format!("Subject: {}\n\nPlease enter the description of the ticket:", subject),
            Keyboard::Choices(vec![CANCEL.to_string()]),
        )
    }

    /// Message body, if this is a text reply
    pub fn body(&self) -> Option<&str> {
        match self {
            Reply::Message { text, .. } => Some(text),
            Reply::Photo(_) => None,
        }
    }
}
