//! Ticket form transitions.
//!
//! `Idle → AwaitingSubject → AwaitingDescription → Idle`. Every function
//! takes the current session by value and returns the session to store
//! together with the replies to deliver; nothing here performs I/O.

use super::message::{Content, IncomingMessage};
use super::record::{Description, TicketRecord};
use super::reply::{Keyboard, Reply, CANCELLED_TEXT, CREATE_TICKET, HELP_TEXT, INVALID_SUBJECT_TEXT};
use super::router::Route;
use super::session::Session;
use super::subjects::parse_subject;
use crate::telegram::bot::Command;

/// Result of applying one route to a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub session: Session,
    pub replies: Vec<Reply>,
    /// Set when the form was completed
    pub ticket: Option<TicketRecord>,
}

impl Transition {
    fn reply(session: Session, reply: Reply) -> Self {
        Self {
            session,
            replies: vec![reply],
            ticket: None,
        }
    }

    fn complete(record: TicketRecord) -> Self {
        let mut replies = vec![Reply::Message {
            text: record.to_html(),
            keyboard: Some(Keyboard::Single(CREATE_TICKET.to_string())),
            html: true,
        }];
        replies.extend(record.attachments.iter().cloned().map(Reply::Photo));

        Self {
            session: Session::default(),
            replies,
            ticket: Some(record),
        }
    }
}

/// Applies `route` to `session`; `Route::Ignore` leaves it untouched.
pub fn apply(route: &Route, session: Session, msg: &IncomingMessage) -> Transition {
    match route {
        Route::Command(command) => handle_command(command),
        Route::Mention => Transition::reply(session, Reply::welcome()),
        Route::StartTicket => start_ticket(),
        Route::AcceptSubject => accept_subject(session, msg),
        Route::AcceptDescription => accept_description(session, msg),
        Route::AcceptVoiceDescription => accept_voice_description(session, msg),
        Route::AcceptLinkDescription => accept_link_description(session, msg),
        Route::Ignore => Transition {
            session,
            replies: Vec::new(),
            ticket: None,
        },
    }
}

fn handle_command(command: &Command) -> Transition {
    match command {
        Command::Start => Transition::reply(Session::default(), Reply::welcome()),
        Command::Help => Transition {
            session: Session::default(),
            replies: vec![Reply::text(HELP_TEXT), Reply::welcome()],
            ticket: None,
        },
        Command::Cancel => Transition {
            session: Session::default(),
            replies: vec![Reply::text(CANCELLED_TEXT), Reply::welcome()],
            ticket: None,
        },
    }
}

/// Any state → AwaitingSubject
pub fn start_ticket() -> Transition {
    Transition::reply(Session::awaiting_subject(), Reply::subject_choices())
}

/// AwaitingSubject → AwaitingDescription on an exact subject match
pub fn accept_subject(session: Session, msg: &IncomingMessage) -> Transition {
    match parse_subject(msg.text().unwrap_or_default()) {
        Ok(subject) => {
            let prompt = Reply::description_prompt(&subject);
            Transition::reply(Session::awaiting_description(subject), prompt)
        }
        Err(e) => {
            log::info!("Rejected subject from {}: {}", msg.key(), e);
            Transition::reply(session, Reply::text(INVALID_SUBJECT_TEXT))
        }
    }
}

/// AwaitingDescription → Idle for text and photo content
pub fn accept_description(session: Session, msg: &IncomingMessage) -> Transition {
    let description = match &msg.content {
        Content::Text(text) => Description::Text(text.clone()),
        Content::Photo { file, caption } => Description::Photo {
            caption: caption.clone(),
            photo: file.clone(),
        },
        Content::Voice { caption, .. } => Description::Voice {
            caption: caption.clone(),
        },
    };
    finish(session, description, msg)
}

/// AwaitingDescription → Idle for voice content; the audio itself is not forwarded
pub fn accept_voice_description(session: Session, msg: &IncomingMessage) -> Transition {
    let caption = match &msg.content {
        Content::Voice { caption, .. } | Content::Photo { caption, .. } => caption.clone(),
        Content::Text(_) => None,
    };
    finish(session, Description::Voice { caption }, msg)
}

/// Any state → Idle, description is the literal message text
pub fn accept_link_description(session: Session, msg: &IncomingMessage) -> Transition {
    let link = msg.text().unwrap_or_default().to_string();
    finish(session, Description::Link(link), msg)
}

fn finish(session: Session, description: Description, msg: &IncomingMessage) -> Transition {
    let record = TicketRecord::new(session.subject, description, msg.sender.clone(), session.subject_photo);
    log::info!(
        "Ticket created by {} (subject: {}, kind: {})",
        msg.key(),
        record.subject,
        msg.kind()
    );
    Transition::complete(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::message::{FileRef, Sender};
    use crate::ticket::record::{NO_CAPTION, NO_SUBJECT};
    use crate::ticket::reply::SELECT_SUBJECT_TEXT;
    use crate::ticket::session::SessionState;
    use crate::ticket::subjects::PREDEFINED_SUBJECTS;
    use pretty_assertions::assert_eq;

    fn msg(content: Content) -> IncomingMessage {
        IncomingMessage {
            chat_id: 100,
            sender: Sender {
                id: 5,
                full_name: "Test User".to_string(),
                mention: "<a href=\"tg://user?id=5\">Test User</a>".to_string(),
            },
            content,
        }
    }

    fn text(s: &str) -> IncomingMessage {
        msg(Content::Text(s.to_string()))
    }

    #[test]
    fn test_start_ticket_offers_all_subjects() {
        let t = apply(&Route::StartTicket, Session::awaiting_description("Other"), &text("Create a ticket"));
        assert_eq!(t.session, Session::awaiting_subject());
        assert_eq!(
            t.replies,
            vec![Reply::Message {
                text: SELECT_SUBJECT_TEXT.to_string(),
                keyboard: Some(Keyboard::Choices(
                    PREDEFINED_SUBJECTS.iter().map(|s| s.to_string()).collect()
                )),
                html: false,
            }]
        );
    }

    #[test]
    fn test_invalid_subject_is_idempotent() {
        let mut session = Session::awaiting_subject();
        for _ in 0..3 {
            let t = apply(&Route::AcceptSubject, session, &text("Nonsense"));
            assert_eq!(t.replies, vec![Reply::text(INVALID_SUBJECT_TEXT)]);
            assert!(t.ticket.is_none());
            session = t.session;
        }
        assert_eq!(session, Session::awaiting_subject());
    }

    #[test]
    fn test_subject_from_photo_is_rejected() {
        let photo = msg(Content::Photo {
            file: FileRef("p".into()),
            caption: Some("Other".into()),
        });
        let t = apply(&Route::AcceptSubject, Session::awaiting_subject(), &photo);
        assert_eq!(t.session.state, SessionState::AwaitingSubject);
    }

    #[test]
    fn test_valid_subject_moves_to_description() {
        let t = apply(&Route::AcceptSubject, Session::awaiting_subject(), &text("Billing Inquiry"));
        assert_eq!(t.session, Session::awaiting_description("Billing Inquiry"));
        assert!(t.session.is_consistent());
        assert_eq!(t.replies, vec![Reply::description_prompt("Billing Inquiry")]);
        assert_eq!(
            t.replies[0].body(),
            Some("Subject: Billing Inquiry\n\nPlease enter the description of the ticket:")
        );
    }

    #[test]
    fn test_text_description_completes_ticket() {
        let t = apply(
            &Route::AcceptDescription,
            Session::awaiting_description("Billing Inquiry"),
            &text("My invoice is wrong"),
        );
        let ticket = t.ticket.expect("ticket");
        assert_eq!(ticket.subject, "Billing Inquiry");
        assert_eq!(ticket.description.summary(), "My invoice is wrong");
        assert_eq!(t.session, Session::default());
        assert!(ticket.attachments.is_empty());
        assert_eq!(
            t.replies,
            vec![Reply::Message {
                text: ticket.to_html(),
                keyboard: Some(Keyboard::Single(CREATE_TICKET.to_string())),
                html: true,
            }]
        );
    }

    #[test]
    fn test_photo_without_caption_forwards_photo() {
        let photo = msg(Content::Photo {
            file: FileRef("AgADphoto".into()),
            caption: None,
        });
        let t = apply(&Route::AcceptDescription, Session::awaiting_description("Technical Issue"), &photo);
        let ticket = t.ticket.expect("ticket");
        assert_eq!(ticket.description.summary(), NO_CAPTION);
        assert_eq!(t.replies[1], Reply::Photo(FileRef("AgADphoto".into())));
        assert_eq!(t.session, Session::default());
    }

    #[test]
    fn test_subject_photo_is_sent_first() {
        let mut session = Session::awaiting_description("Technical Issue");
        session.subject_photo = Some(FileRef("subject".into()));
        let photo = msg(Content::Photo {
            file: FileRef("description".into()),
            caption: Some("screenshot".into()),
        });
        let t = apply(&Route::AcceptDescription, session, &photo);
        assert_eq!(t.replies[1], Reply::Photo(FileRef("subject".into())));
        assert_eq!(t.replies[2], Reply::Photo(FileRef("description".into())));
    }

    #[test]
    fn test_voice_description_has_no_attachment() {
        let voice = msg(Content::Voice {
            file: FileRef("voice".into()),
            caption: Some("please call me".into()),
        });
        let t = apply(&Route::AcceptVoiceDescription, Session::awaiting_description("Other"), &voice);
        let ticket = t.ticket.expect("ticket");
        assert_eq!(ticket.description.summary(), "Voice message for description: please call me");
        assert!(ticket.attachments.is_empty());
        assert!(!t.replies.iter().any(|r| matches!(r, Reply::Photo(_))));
        assert_eq!(t.session, Session::default());
    }

    #[test]
    fn test_link_from_idle_uses_placeholder_subject() {
        let t = apply(&Route::AcceptLinkDescription, Session::default(), &text("http://example.com"));
        let ticket = t.ticket.expect("ticket");
        assert_eq!(ticket.subject, NO_SUBJECT);
        assert_eq!(ticket.description.summary(), "Link - http://example.com");
        assert_eq!(t.session, Session::default());
    }

    #[test]
    fn test_every_completion_resets_to_idle() {
        let routes = [
            (Route::AcceptDescription, text("words")),
            (Route::AcceptVoiceDescription, msg(Content::Voice { file: FileRef("v".into()), caption: None })),
            (Route::AcceptLinkDescription, text("https://example.org")),
        ];
        for (route, message) in routes {
            let t = apply(&route, Session::awaiting_description("Feature Request"), &message);
            assert_eq!(t.session, Session::default(), "route {:?}", route);
            assert_eq!(t.ticket.map(|r| r.subject).as_deref(), Some("Feature Request"));
        }
    }

    #[test]
    fn test_commands_reset_session() {
        let t = apply(
            &Route::Command(Command::Start),
            Session::awaiting_description("Other"),
            &text("/start"),
        );
        assert_eq!(t.session, Session::default());
        assert_eq!(t.replies, vec![Reply::welcome()]);

        let t = apply(&Route::Command(Command::Help), Session::awaiting_subject(), &text("/help"));
        assert_eq!(t.session, Session::default());
        assert_eq!(t.replies, vec![Reply::text(HELP_TEXT), Reply::welcome()]);

        let t = apply(&Route::Command(Command::Cancel), Session::awaiting_subject(), &text("/cancel"));
        assert_eq!(t.session, Session::default());
        assert_eq!(t.replies, vec![Reply::text(CANCELLED_TEXT), Reply::welcome()]);
    }

    #[test]
    fn test_mention_keeps_session() {
        let t = apply(&Route::Mention, Session::awaiting_subject(), &text("hi @bot"));
        assert_eq!(t.session, Session::awaiting_subject());
        assert_eq!(t.replies, vec![Reply::welcome()]);
    }

    #[test]
    fn test_ignore_is_a_no_op() {
        let t = apply(&Route::Ignore, Session::awaiting_subject(), &text("whatever"));
        assert_eq!(t.session, Session::awaiting_subject());
        assert!(t.replies.is_empty());
        assert!(t.ticket.is_none());
    }
}
