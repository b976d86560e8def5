//! Handler types and dependencies

use std::sync::Arc;

use crate::ticket::TicketDesk;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub desk: Arc<TicketDesk>,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(desk: Arc<TicketDesk>) -> Self {
        Self { desk }
    }
}
