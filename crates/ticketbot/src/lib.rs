//! Ticketbot - Telegram bot that walks users through creating a support ticket
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging
//! - `ticket`: session store, router and the ticket form state machine
//! - `telegram`: teloxide integration (bot setup, message conversion, handlers)

pub mod cli;
pub mod core;
pub mod telegram;
pub mod ticket;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult};
pub use telegram::{schema, HandlerDeps, HandlerError};
pub use ticket::{TicketDesk, TicketRecord};
