//! Picks exactly one route for an incoming message.
//!
//! Rules are evaluated top to bottom and the first one that fires wins:
//!
//! 1. bot commands (`/start`, `/help`, `/cancel`)
//! 2. text mentioning the bot's username (re-greets, session untouched)
//! 3. the "Create a ticket" trigger phrase
//! 4. any message while a subject is expected
//! 5. text or photo while a description is expected
//! 6. voice while a description is expected
//! 7. text containing "http" (any state unless [`DescriptionPolicy::Strict`])
//!
//! Nothing matching means the message is ignored.

use teloxide::utils::command::BotCommands;

use super::message::{ContentKind, IncomingMessage};
use super::reply::CREATE_TICKET;
use super::session::{Session, SessionState};
use crate::telegram::bot::{BotIdentity, Command};

/// Substring that marks a text message as a link submission
pub const LINK_MARKER: &str = "http";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Command(Command),
    Mention,
    StartTicket,
    AcceptSubject,
    AcceptDescription,
    AcceptVoiceDescription,
    AcceptLinkDescription,
    Ignore,
}

/// Whether link messages may complete a ticket outside the description step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
pub enum DescriptionPolicy {
    /// A link completes a ticket from any state, even Idle
    #[default]
    Permissive,
    /// Links only count while a description is expected, and then are
    /// recorded as links rather than plain text
    Strict,
}

impl DescriptionPolicy {
    pub fn from_strict_flag(strict: bool) -> Self {
        if strict {
            DescriptionPolicy::Strict
        } else {
            DescriptionPolicy::Permissive
        }
    }
}

type Rule = fn(&Router, &IncomingMessage, &Session) -> Option<Route>;

/// Ordered rule table; see the module docs for the precedence.
const RULES: &[(&str, Rule)] = &[
    ("command", command_rule),
    ("mention", mention_rule),
    ("start_ticket", start_ticket_rule),
    ("subject", subject_rule),
    ("description", description_rule),
    ("voice_description", voice_description_rule),
    ("link", link_rule),
];

#[derive(Debug, Clone)]
pub struct Router {
    identity: BotIdentity,
    policy: DescriptionPolicy,
}

impl Router {
    pub fn new(identity: BotIdentity, policy: DescriptionPolicy) -> Self {
        Self { identity, policy }
    }

    pub fn route(&self, msg: &IncomingMessage, session: &Session) -> Route {
        for (name, rule) in RULES {
            if let Some(route) = rule(self, msg, session) {
                log::debug!("Rule '{}' matched for {} in state {}: {:?}", name, msg.key(), session.state, route);
                return route;
            }
        }
        Route::Ignore
    }
}

fn command_rule(router: &Router, msg: &IncomingMessage, _session: &Session) -> Option<Route> {
    let text = msg.text()?;
    if !text.starts_with('/') {
        return None;
    }
    Command::parse(text, &router.identity.username).ok().map(Route::Command)
}

fn mention_rule(router: &Router, msg: &IncomingMessage, _session: &Session) -> Option<Route> {
    let username = router.identity.username.as_str();
    let text = msg.text()?;
    (!username.is_empty() && text.contains(username)).then_some(Route::Mention)
}

fn start_ticket_rule(_router: &Router, msg: &IncomingMessage, _session: &Session) -> Option<Route> {
    (msg.text()? == CREATE_TICKET).then_some(Route::StartTicket)
}

fn subject_rule(_router: &Router, _msg: &IncomingMessage, session: &Session) -> Option<Route> {
    (session.state == SessionState::AwaitingSubject).then_some(Route::AcceptSubject)
}

fn description_rule(router: &Router, msg: &IncomingMessage, session: &Session) -> Option<Route> {
    if session.state != SessionState::AwaitingDescription {
        return None;
    }
    match msg.kind() {
        ContentKind::Text if router.policy == DescriptionPolicy::Strict && is_link(msg) => {
            Some(Route::AcceptLinkDescription)
        }
        ContentKind::Text | ContentKind::Photo => Some(Route::AcceptDescription),
        ContentKind::Voice => None,
    }
}

fn voice_description_rule(_router: &Router, msg: &IncomingMessage, session: &Session) -> Option<Route> {
    (session.state == SessionState::AwaitingDescription && msg.kind() == ContentKind::Voice)
        .then_some(Route::AcceptVoiceDescription)
}

fn link_rule(router: &Router, msg: &IncomingMessage, _session: &Session) -> Option<Route> {
    // Strict mode already handled links inside the description rule.
    (router.policy == DescriptionPolicy::Permissive && is_link(msg)).then_some(Route::AcceptLinkDescription)
}

fn is_link(msg: &IncomingMessage) -> bool {
    msg.text().is_some_and(|text| text.contains(LINK_MARKER))
}
