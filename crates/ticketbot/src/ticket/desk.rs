//! Runs one incoming message through router, state machine and responder.

use async_trait::async_trait;

use super::machine::{self, Transition};
use super::message::IncomingMessage;
use super::reply::Reply;
use super::router::{Route, Router};
use super::session::SessionStore;
use crate::core::AppResult;

/// Delivers replies back to the chat a message came from
#[async_trait]
pub trait Responder: Send + Sync {
    async fn send(&self, chat_id: i64, reply: &Reply) -> AppResult<()>;
}

/// What happened to a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub route: Route,
    pub transition: Transition,
}

pub struct TicketDesk {
    sessions: SessionStore,
    router: Router,
}

impl TicketDesk {
    pub fn new(router: Router) -> Self {
        Self {
            sessions: SessionStore::new(),
            router,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handles one message while holding that user's session lock.
    ///
    /// The new session state is stored before any reply goes out; a failed
    /// delivery is returned to the caller and never rolls the form back.
    pub async fn handle(&self, msg: &IncomingMessage, responder: &dyn Responder) -> AppResult<Outcome> {
        let key = msg.key();
        let mut session = self.sessions.lock(key).await;

        let route = self.router.route(msg, &session);
        if route == Route::Ignore {
            log::info!(
                "No route for {} message from {} in state {}, ignoring",
                msg.kind(),
                key,
                session.state
            );
        }

        let transition = machine::apply(&route, session.clone(), msg);
        if *session != transition.session {
            log::debug!("Session {}: {} -> {}", key, session.state, transition.session.state);
        }
        *session = transition.session.clone();

        for reply in &transition.replies {
            responder.send(msg.chat_id, reply).await?;
        }

        Ok(Outcome { route, transition })
    }
}
