//! Per-user ticket form progress, kept in memory.
//!
//! Every chat/user pair owns one [`Session`] behind its own async mutex.
//! [`SessionStore::lock`] hands out an owned guard so the whole
//! route → transition → reply cycle for one key runs without interleaving,
//! while different users proceed in parallel.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::message::FileRef;
use super::subjects::is_predefined;

/// Identifies whose form a session belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub chat_id: i64,
    pub user_id: u64,
}

impl SessionKey {
    pub fn new(chat_id: i64, user_id: u64) -> Self {
        Self { chat_id, user_id }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chat_id, self.user_id)
    }
}

/// Where the user is in the ticket form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
pub enum SessionState {
    #[default]
    Idle,
    AwaitingSubject,
    AwaitingDescription,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub state: SessionState,
    pub subject: Option<String>,
    /// Photo attached while choosing the subject. Nothing sets it today;
    /// it is forwarded ahead of the description photo when present.
    pub subject_photo: Option<FileRef>,
}

impl Session {
    pub fn awaiting_subject() -> Self {
        Self {
            state: SessionState::AwaitingSubject,
            ..Self::default()
        }
    }

    pub fn awaiting_description(subject: impl Into<String>) -> Self {
        Self {
            state: SessionState::AwaitingDescription,
            subject: Some(subject.into()),
            subject_photo: None,
        }
    }

    /// `AwaitingDescription` if and only if a predefined subject is stored.
    pub fn is_consistent(&self) -> bool {
        let has_subject = self.subject.as_deref().is_some_and(is_predefined);
        match self.state {
            SessionState::AwaitingDescription => has_subject,
            _ => self.subject.is_none(),
        }
    }
}

/// In-memory session storage keyed by [`SessionKey`]
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<SessionKey, Arc<Mutex<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: SessionKey) -> Arc<Mutex<Session>> {
        // The map shard guard is released before anyone awaits the mutex.
        Arc::clone(self.sessions.entry(key).or_default().value())
    }

    /// Exclusive access to the session for `key`, created Idle if absent.
    pub async fn lock(&self, key: SessionKey) -> OwnedMutexGuard<Session> {
        self.slot(key).lock_owned().await
    }

    /// Snapshot of the session for `key`; Idle if the user was never seen.
    pub async fn get(&self, key: SessionKey) -> Session {
        self.lock(key).await.clone()
    }

    pub async fn set(&self, key: SessionKey, session: Session) {
        *self.lock(key).await = session;
    }

    /// Back to Idle with no subject.
    pub async fn clear(&self, key: SessionKey) {
        *self.lock(key).await = Session::default();
    }

    /// Number of users seen so far
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
