//! The finished ticket handed to the responder.

use teloxide::utils::html;

use super::message::{FileRef, Sender};

/// Placeholder shown when a photo or voice message carries no caption
pub const NO_CAPTION: &str = "No caption";

/// Placeholder subject for tickets completed without choosing one
pub const NO_SUBJECT: &str = "No Subject";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Description {
    Text(String),
    Photo { caption: Option<String>, photo: FileRef },
    Voice { caption: Option<String> },
    Link(String),
}

impl Description {
    /// Human-readable description line, unescaped
    pub fn summary(&self) -> String {
        match self {
            Description::Text(text) => text.clone(),
            Description::Photo { caption, .. } => caption.clone().unwrap_or_else(|| NO_CAPTION.to_string()),
            Description::Voice { caption } => format!(
                "Voice message for description: {}",
                caption.as_deref().unwrap_or(NO_CAPTION)
            ),
            Description::Link(text) => format!("Link - {}", text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketRecord {
    pub subject: String,
    pub description: Description,
    pub submitter: Sender,
    /// Photos re-sent after the summary, in order
    pub attachments: Vec<FileRef>,
}

impl TicketRecord {
    pub fn new(
        subject: Option<String>,
        description: Description,
        submitter: Sender,
        subject_photo: Option<FileRef>,
    ) -> Self {
        let mut attachments: Vec<FileRef> = subject_photo.into_iter().collect();
        if let Description::Photo { photo, .. } = &description {
            attachments.push(photo.clone());
        }

        Self {
            subject: subject.unwrap_or_else(|| NO_SUBJECT.to_string()),
            description,
            submitter,
            attachments,
        }
    }

    /// HTML summary; user-provided text is escaped, the mention is already HTML.
    pub fn to_html(&self) -> String {
        format!(
            "Ticket created!\n\nSubject: {}\nDescription: {}\n\nCreated by: {} ({})",
            html::escape(&self.subject),
            html::escape(&self.description.summary()),
            html::escape(&self.submitter.full_name),
            self.submitter.mention,
        )
    }
}
